//! Test context for service-level integration tests.

use std::sync::Arc;

use tempfile::TempDir;

use crate::{
    assets::LocalAssetStore,
    database::Db,
    domain::{
        cars::PgCarsService,
        photos::{PhotoLifecycle, ThumbnailRegenerator},
    },
    images::{ImageVariantGenerator, ThumbnailSpec},
};

use super::db::TestDb;

pub const PHOTOS_NAMESPACE: &str = "cars";
pub const THUMBNAILS_NAMESPACE: &str = "cars/thumbnails";

/// Migrated database, a temporary asset root, and services wired over both.
pub struct TestContext {
    pub db: TestDb,
    pub assets: Arc<LocalAssetStore>,
    pub cars: PgCarsService,
    pub photos: PhotoLifecycle,
    pub regenerator: ThumbnailRegenerator,
    _assets_root: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool.clone());

        let assets_root = TempDir::new().expect("failed to create asset root");
        let assets = Arc::new(
            LocalAssetStore::open(assets_root.path().to_path_buf())
                .await
                .expect("failed to open asset store"),
        );

        let thumbnails = Arc::new(ImageVariantGenerator::new(assets.clone(), THUMBNAILS_NAMESPACE));
        let spec = ThumbnailSpec::default();

        let photos =
            PhotoLifecycle::new(assets.clone(), thumbnails.clone(), PHOTOS_NAMESPACE, spec);

        Self {
            cars: PgCarsService::new(db.clone(), photos.clone()),
            regenerator: ThumbnailRegenerator::new(db, assets.clone(), thumbnails, spec),
            photos,
            assets,
            db: test_db,
            _assets_root: assets_root,
        }
    }
}
