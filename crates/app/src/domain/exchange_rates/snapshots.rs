//! Persisted rate snapshot.
//!
//! The last known good rates, used when the provider is unreachable and to
//! fill currencies the provider omitted.

use async_trait::async_trait;
use mockall::automock;
use tracing::debug;

use crate::database::Db;

use super::{Currency, ExchangeRates, ExchangeRatesError, repository::PgExchangeRatesRepository};

#[automock]
#[async_trait]
pub trait RateSnapshotStore: Send + Sync {
    /// Load every persisted rate for a supported currency.
    async fn load_snapshot(&self) -> Result<ExchangeRates, ExchangeRatesError>;

    /// Upsert every rate in `rates`; currencies not present are left alone.
    async fn store_snapshot(&self, rates: &ExchangeRates) -> Result<(), ExchangeRatesError>;
}

#[derive(Debug, Clone)]
pub struct PgRateSnapshotStore {
    db: Db,
    repository: PgExchangeRatesRepository,
}

impl PgRateSnapshotStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgExchangeRatesRepository::new(),
        }
    }
}

#[async_trait]
impl RateSnapshotStore for PgRateSnapshotStore {
    async fn load_snapshot(&self) -> Result<ExchangeRates, ExchangeRatesError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows = self.repository.list_rates(&mut tx).await?;

        tx.commit().await?;

        let rates = rows
            .into_iter()
            .filter_map(|(code, rate)| match code.parse::<Currency>() {
                Ok(currency) => Some((currency, rate)),
                Err(_) => {
                    debug!(currency = %code, "ignoring unsupported persisted rate");

                    None
                }
            })
            .collect();

        Ok(rates)
    }

    async fn store_snapshot(&self, rates: &ExchangeRates) -> Result<(), ExchangeRatesError> {
        let mut tx = self.db.begin_transaction().await?;

        for (currency, rate) in rates.iter() {
            self.repository
                .upsert_rate(&mut tx, currency.code(), rate)
                .await?;
        }

        tx.commit().await?;

        debug!(count = rates.len(), "stored rate snapshot");

        Ok(())
    }
}
