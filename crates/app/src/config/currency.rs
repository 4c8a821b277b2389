//! Currency Config

use std::time::Duration;

use clap::Args;

use crate::domain::exchange_rates::NBU_EXCHANGE_URL;

/// Currency and exchange rate settings.
#[derive(Debug, Clone, Args)]
pub struct CurrencyConfig {
    /// Currency stored prices are denominated in (UAH, USD, EUR)
    #[arg(long, env = "CURRENCY_BASE", default_value = "USD")]
    pub currency_base: String,

    /// Display currency used when none or an unsupported one is requested
    #[arg(
        long,
        env = "CURRENCY_DEFAULT_DISPLAY",
        default_value = "USD"
    )]
    pub currency_default_display: String,

    /// Exchange rate provider endpoint
    #[arg(long, env = "EXCHANGE_RATES_URL", default_value = NBU_EXCHANGE_URL)]
    pub exchange_rates_url: String,

    /// Provider request timeout in seconds
    #[arg(
        long,
        env = "EXCHANGE_RATES_TIMEOUT_SECONDS",
        default_value_t = 5_u64
    )]
    pub exchange_rates_timeout_seconds: u64,

    /// How long fetched rates are served from cache, in minutes
    #[arg(
        long,
        env = "EXCHANGE_RATES_CACHE_TTL_MINUTES",
        default_value_t = 60_u64
    )]
    pub exchange_rates_cache_ttl_minutes: u64,
}

impl CurrencyConfig {
    #[must_use]
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.exchange_rates_timeout_seconds)
    }

    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.exchange_rates_cache_ttl_minutes.saturating_mul(60))
    }
}
