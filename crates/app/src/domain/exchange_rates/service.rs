//! Exchange rates service.

use std::{collections::BTreeMap, fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use tracing::{debug, error, warn};

use crate::cache::TtlCache;

use super::{
    Conversion, Currency, ExchangeRates,
    conversion::convert_amount,
    provider::{ProviderRate, RateProvider},
    snapshots::RateSnapshotStore,
};

/// Cache key the full rate set is stored under.
pub const RATES_CACHE_KEY: &str = "exchange_rates:v1";

/// Shared in-process cache of rate sets.
pub type RatesCache = TtlCache<&'static str, ExchangeRates>;

/// Base currency used when the configured one is not supported.
pub const FALLBACK_BASE_CURRENCY: Currency = Currency::Usd;

#[derive(Clone)]
pub struct CachedExchangeRatesService {
    provider: Arc<dyn RateProvider>,
    snapshots: Arc<dyn RateSnapshotStore>,
    cache: Arc<RatesCache>,
    base_currency: Currency,
}

impl fmt::Debug for CachedExchangeRatesService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedExchangeRatesService")
            .field("base_currency", &self.base_currency)
            .field("ttl", &self.cache.ttl())
            .finish_non_exhaustive()
    }
}

impl CachedExchangeRatesService {
    /// Build the service; an unsupported `base_currency` falls back to USD.
    #[must_use]
    pub fn new(
        provider: Arc<dyn RateProvider>,
        snapshots: Arc<dyn RateSnapshotStore>,
        cache: Arc<RatesCache>,
        base_currency: &str,
    ) -> Self {
        let base_currency = base_currency.parse().unwrap_or_else(|error| {
            warn!(
                configured = base_currency,
                fallback = %FALLBACK_BASE_CURRENCY,
                %error,
                "invalid base currency configured"
            );

            FALLBACK_BASE_CURRENCY
        });

        Self {
            provider,
            snapshots,
            cache,
            base_currency,
        }
    }

    async fn load_snapshot(&self) -> ExchangeRates {
        self.snapshots.load_snapshot().await.unwrap_or_else(|error| {
            error!(error = ?error, "could not load rate snapshot");

            ExchangeRates::default()
        })
    }
}

#[async_trait]
impl ExchangeRatesService for CachedExchangeRatesService {
    async fn get_rates(&self) -> ExchangeRates {
        self.cache
            .get_or_refresh(RATES_CACHE_KEY, || self.refresh_rates())
            .await
    }

    #[tracing::instrument(name = "exchange_rates.service.refresh_rates", skip(self))]
    async fn refresh_rates(&self) -> ExchangeRates {
        let fetched = self.provider.fetch_rates().await;
        let snapshot = self.load_snapshot().await;

        let entries = match fetched {
            Ok(entries) => entries,
            Err(error) => {
                warn!(error = ?error, "rate provider unavailable, serving persisted snapshot");

                let mut rates = snapshot;
                rates.insert(Currency::PIVOT, 1.0);

                return rates;
            }
        };

        let merged = merge_rates(&entries, &snapshot);

        if let Err(error) = self.snapshots.store_snapshot(&merged).await {
            error!(error = ?error, "could not persist rate snapshot");
        }

        debug!(received = entries.len(), kept = merged.len(), "refreshed exchange rates");

        merged
    }

    fn base_currency(&self) -> Currency {
        self.base_currency
    }
}

/// Supported, non-zero provider rates over the pivot, gaps filled from `snapshot`.
fn merge_rates(entries: &[ProviderRate], snapshot: &ExchangeRates) -> ExchangeRates {
    let mut rates = ExchangeRates::with_pivot();

    for entry in entries {
        let Some(Ok(currency)) = entry.cc.as_deref().map(str::parse::<Currency>) else {
            continue;
        };

        if currency.is_pivot() {
            continue;
        }

        if let Some(rate) = entry.rate.filter(|rate| rate.is_normal()) {
            rates.insert(currency, rate);
        }
    }

    for currency in Currency::SUPPORTED {
        if !rates.contains(currency)
            && let Some(rate) = snapshot.rate(currency)
        {
            rates.insert(currency, rate);
        }
    }

    rates
}

#[automock]
#[async_trait]
pub trait ExchangeRatesService: Send + Sync {
    /// Current rates, served from cache while fresh.
    async fn get_rates(&self) -> ExchangeRates;

    /// Fetch from the provider, merge with the snapshot and persist.
    ///
    /// Never fails: provider problems fall back to the persisted snapshot.
    async fn refresh_rates(&self) -> ExchangeRates;

    /// The currency stored prices are denominated in.
    fn base_currency(&self) -> Currency;
}

/// Conversion helpers available on every [`ExchangeRatesService`].
#[async_trait]
pub trait ExchangeRatesServiceExt: ExchangeRatesService {
    /// Convert a base-currency `amount` into `target`.
    ///
    /// Returns `None` only when `amount` is `None`. When `rates` is omitted
    /// the current rates are fetched, unless no lookup is needed.
    async fn convert(
        &self,
        amount: Option<Decimal>,
        target: Currency,
        rates: Option<&ExchangeRates>,
    ) -> Option<Conversion> {
        let amount = amount?;
        let base = self.base_currency();

        let conversion = match rates {
            Some(rates) => convert_amount(amount, base, target, rates),
            None if target == base => {
                convert_amount(amount, base, target, &ExchangeRates::default())
            }
            None => convert_amount(amount, base, target, &self.get_rates().await),
        };

        Some(conversion)
    }

    /// Rates keyed by every supported code, `None` for missing ones.
    fn format_rates_for_frontend(&self, rates: &ExchangeRates) -> BTreeMap<Currency, Option<f64>> {
        rates.for_frontend()
    }
}

impl<T: ExchangeRatesService + ?Sized> ExchangeRatesServiceExt for T {}
