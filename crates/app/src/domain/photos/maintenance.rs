//! Thumbnail regeneration.

use std::{fmt, sync::Arc};

use serde::Serialize;
use tracing::{info, warn};

use crate::{
    assets::AssetStore,
    database::Db,
    images::{ThumbnailGenerator, ThumbnailSpec},
};

use super::{errors::PhotosError, records::PhotoRecord, repository::PgPhotosRepository};

/// Outcome counts of one regeneration run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegenerationReport {
    pub processed: u64,
    pub regenerated: u64,
    pub missing: u64,
    pub failed: u64,
}

/// Rebuilds missing derivatives, or every derivative when forced.
#[derive(Clone)]
pub struct ThumbnailRegenerator {
    db: Db,
    assets: Arc<dyn AssetStore>,
    thumbnails: Arc<dyn ThumbnailGenerator>,
    repository: PgPhotosRepository,
    spec: ThumbnailSpec,
}

impl fmt::Debug for ThumbnailRegenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThumbnailRegenerator")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

enum Regeneration {
    Regenerated,
    Missing,
    Failed,
}

impl ThumbnailRegenerator {
    #[must_use]
    pub fn new(
        db: Db,
        assets: Arc<dyn AssetStore>,
        thumbnails: Arc<dyn ThumbnailGenerator>,
        spec: ThumbnailSpec,
    ) -> Self {
        Self {
            db,
            assets,
            thumbnails,
            repository: PgPhotosRepository::new(),
            spec,
        }
    }

    /// Regenerate derivatives for photos lacking one, or all photos if `force`.
    ///
    /// Each photo is updated in its own transaction so one bad original does
    /// not hold back the rest.
    ///
    /// # Errors
    ///
    /// Returns an error on database failure.
    #[tracing::instrument(name = "photos.maintenance.regenerate", skip(self), err)]
    pub async fn regenerate(&self, force: bool) -> Result<RegenerationReport, PhotosError> {
        let mut tx = self.db.begin_transaction().await?;
        let photos = self
            .repository
            .list_photos_for_regeneration(&mut tx, force)
            .await?;
        tx.commit().await?;

        let mut report = RegenerationReport::default();

        for photo in photos {
            report.processed += 1;

            match self.regenerate_photo(&photo, force).await? {
                Regeneration::Regenerated => report.regenerated += 1,
                Regeneration::Missing => report.missing += 1,
                Regeneration::Failed => report.failed += 1,
            }
        }

        info!(
            processed = report.processed,
            regenerated = report.regenerated,
            missing = report.missing,
            failed = report.failed,
            "thumbnail regeneration finished"
        );

        Ok(report)
    }

    async fn regenerate_photo(
        &self,
        photo: &PhotoRecord,
        force: bool,
    ) -> Result<Regeneration, PhotosError> {
        let source_exists = self
            .assets
            .exists(&photo.photo_path)
            .await
            .unwrap_or_else(|error| {
                warn!(photo_id = %photo.id, error = ?error, "could not check original");

                false
            });

        if !source_exists {
            warn!(photo_id = %photo.id, path = %photo.photo_path, "original is missing");

            return Ok(Regeneration::Missing);
        }

        if force
            && let Some(previous) = photo.thumbnail_path.as_deref()
            && let Err(error) = self.assets.delete(previous).await
        {
            warn!(
                photo_id = %photo.id,
                path = previous,
                error = ?error,
                "could not delete previous thumbnail"
            );
        }

        let thumbnail = self
            .thumbnails
            .create_thumbnail(&photo.photo_path, self.spec)
            .await;

        if thumbnail.is_none() && !force {
            return Ok(Regeneration::Failed);
        }

        let mut tx = self.db.begin_transaction().await?;
        self.repository
            .set_thumbnail_path(&mut tx, photo.id, thumbnail.as_deref())
            .await?;
        tx.commit().await?;

        Ok(if thumbnail.is_some() {
            Regeneration::Regenerated
        } else {
            Regeneration::Failed
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::cars::CarsService,
        test::{
            TestContext,
            helpers::{create_car, upload},
        },
    };

    use super::*;

    #[tokio::test]
    async fn regenerate_skips_photos_with_thumbnails_unless_forced() -> TestResult {
        let ctx = TestContext::new().await;
        let car = create_car(&ctx, vec![upload("a.png")], None).await?;
        let before = car.photos.first().cloned().ok_or("expected photo")?;
        let old_thumbnail = before.thumbnail_path.clone().ok_or("expected thumbnail")?;

        assert_eq!(ctx.regenerator.regenerate(false).await?, RegenerationReport::default());

        let forced = ctx.regenerator.regenerate(true).await?;

        assert_eq!(
            forced,
            RegenerationReport {
                processed: 1,
                regenerated: 1,
                missing: 0,
                failed: 0,
            }
        );

        let after = ctx.cars.get_car(car.id).await?;
        let new_thumbnail = after
            .photos
            .first()
            .and_then(|photo| photo.thumbnail_path.clone())
            .ok_or("expected thumbnail")?;

        assert_ne!(new_thumbnail, old_thumbnail);
        assert!(ctx.assets.exists(&new_thumbnail).await?);
        assert!(!ctx.assets.exists(&old_thumbnail).await?);

        Ok(())
    }

    #[tokio::test]
    async fn regenerate_reports_missing_originals() -> TestResult {
        let ctx = TestContext::new().await;
        let car = create_car(&ctx, vec![upload("a.png")], None).await?;
        let photo = car.photos.first().cloned().ok_or("expected photo")?;

        ctx.assets.delete(&photo.photo_path).await?;

        let report = ctx.regenerator.regenerate(true).await?;

        assert_eq!(report.processed, 1);
        assert_eq!(report.missing, 1);
        assert_eq!(report.regenerated, 0);

        Ok(())
    }
}
