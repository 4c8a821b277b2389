//! Exchange rate errors.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExchangeRatesError {
    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("rate snapshot storage error")]
    Sql(#[from] sqlx::Error),
}

/// Failures talking to the upstream rate provider.
#[derive(Debug, Error)]
pub enum RateProviderError {
    #[error("rate provider request failed")]
    Http(#[from] reqwest::Error),

    #[error("rate provider responded with status {0}")]
    UnexpectedStatus(StatusCode),
}
