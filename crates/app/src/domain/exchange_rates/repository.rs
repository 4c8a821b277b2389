//! Exchange Rates Repository

use sqlx::{Postgres, Transaction, query, query_as};

const LIST_EXCHANGE_RATES_SQL: &str = include_str!("sql/list_exchange_rates.sql");
const UPSERT_EXCHANGE_RATE_SQL: &str = include_str!("sql/upsert_exchange_rate.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgExchangeRatesRepository;

impl PgExchangeRatesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    #[tracing::instrument(name = "exchange_rates.repository.list_rates", skip(self, tx), err)]
    pub(crate) async fn list_rates(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<(String, f64)>, sqlx::Error> {
        query_as::<Postgres, (String, f64)>(LIST_EXCHANGE_RATES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    #[tracing::instrument(name = "exchange_rates.repository.upsert_rate", skip(self, tx), err)]
    pub(crate) async fn upsert_rate(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        currency: &str,
        rate: f64,
    ) -> Result<(), sqlx::Error> {
        query(UPSERT_EXCHANGE_RATE_SQL)
            .bind(currency)
            .bind(rate)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}
