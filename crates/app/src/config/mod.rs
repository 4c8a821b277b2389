//! Application configuration
//!
//! Every setting can come from a flag or its environment variable; a `.env`
//! file is loaded first when present.

use clap::Args;

pub mod currency;
pub mod db;
pub mod observability;
pub mod storage;

pub use currency::CurrencyConfig;
pub use db::DatabaseConfig;
pub use observability::{LogFormat, LoggingConfig};
pub use storage::StorageConfig;

/// Settings shared by every command.
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Photo storage settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Currency and exchange rate settings.
    #[command(flatten)]
    pub currency: CurrencyConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}
