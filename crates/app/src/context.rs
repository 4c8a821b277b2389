//! App Context

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    assets::{AssetStore, AssetStoreError, LocalAssetStore},
    cache::TtlCache,
    config::AppConfig,
    database::{self, Db},
    domain::{
        cars::{CarPresenter, CarsService, PgCarsService},
        exchange_rates::{
            CachedExchangeRatesService, Currency, ExchangeRatesService, NbuRateProvider,
            PgRateSnapshotStore, RateProviderError, RateSnapshotStore,
        },
        photos::{PhotoLifecycle, ThumbnailRegenerator},
    },
    images::{ImageVariantGenerator, ThumbnailGenerator, ThumbnailSpec},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrations(#[from] sqlx::migrate::MigrateError),

    #[error("failed to open asset storage")]
    Storage(#[from] AssetStoreError),

    #[error("failed to build exchange rate client")]
    RateProvider(#[from] RateProviderError),
}

/// Services wired from configuration, shared behind `Arc`s.
#[derive(Clone)]
pub struct AppContext {
    pub db: Db,
    pub assets: Arc<dyn AssetStore>,
    pub cars: Arc<dyn CarsService>,
    pub exchange_rates: Arc<dyn ExchangeRatesService>,
    pub snapshots: Arc<dyn RateSnapshotStore>,
    pub presenter: CarPresenter,
    pub regenerator: ThumbnailRegenerator,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build the application context.
    ///
    /// # Errors
    ///
    /// Returns an error when the database, the asset root or the HTTP client
    /// cannot be set up.
    pub async fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let pool = database::connect(&config.database.database_url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        let assets: Arc<dyn AssetStore> =
            Arc::new(LocalAssetStore::open(config.storage.assets_root.clone()).await?);

        let thumbnails: Arc<dyn ThumbnailGenerator> = Arc::new(ImageVariantGenerator::new(
            Arc::clone(&assets),
            config.storage.thumbnails_namespace.clone(),
        ));

        let spec = ThumbnailSpec::default();

        let photos = PhotoLifecycle::new(
            Arc::clone(&assets),
            Arc::clone(&thumbnails),
            config.storage.photos_namespace.clone(),
            spec,
        );

        let snapshots: Arc<dyn RateSnapshotStore> = Arc::new(PgRateSnapshotStore::new(db.clone()));

        let provider = NbuRateProvider::new(
            config.currency.exchange_rates_url.clone(),
            config.currency.provider_timeout(),
        )?;

        let exchange_rates: Arc<dyn ExchangeRatesService> =
            Arc::new(CachedExchangeRatesService::new(
                Arc::new(provider),
                Arc::clone(&snapshots),
                Arc::new(TtlCache::new(config.currency.cache_ttl())),
                &config.currency.currency_base,
            ));

        let default_display = match config.currency.currency_default_display.parse::<Currency>() {
            Ok(currency) => currency,
            Err(error) => {
                warn!(
                    %error,
                    fallback = %exchange_rates.base_currency(),
                    "invalid default display currency"
                );

                exchange_rates.base_currency()
            }
        };

        info!(
            base_currency = %exchange_rates.base_currency(),
            default_display = %default_display,
            assets_root = %config.storage.assets_root.display(),
            "application context ready"
        );

        Ok(Self {
            cars: Arc::new(PgCarsService::new(db.clone(), photos)),
            presenter: CarPresenter::new(Arc::clone(&exchange_rates), default_display),
            regenerator: ThumbnailRegenerator::new(
                db.clone(),
                Arc::clone(&assets),
                thumbnails,
                spec,
            ),
            exchange_rates,
            snapshots,
            assets,
            db,
        })
    }

    /// Apply the bundled migrations to the configured database.
    ///
    /// # Errors
    ///
    /// Returns an error when a migration fails.
    pub async fn migrate(&self) -> Result<(), AppInitError> {
        database::migrate(self.db.pool()).await?;

        Ok(())
    }
}
