//! Exchange Rates
//!
//! Currency rates relative to the UAH pivot, fetched from an external
//! provider, cached in-process and persisted as a fallback snapshot.

pub mod conversion;
pub mod currency;
pub mod errors;
pub mod provider;
pub mod rates;
mod repository;
pub mod service;
pub mod snapshots;

pub use conversion::{Conversion, ConversionOutcome};
pub use currency::Currency;
pub use errors::{ExchangeRatesError, RateProviderError};
pub use provider::{NBU_EXCHANGE_URL, NbuRateProvider, RateProvider};
pub use rates::ExchangeRates;
pub use service::*;
pub use snapshots::{PgRateSnapshotStore, RateSnapshotStore};
