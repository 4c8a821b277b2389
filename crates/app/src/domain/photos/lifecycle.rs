//! Photo lifecycle.
//!
//! Storing, removing and re-ranking the photos of one car. Every operation
//! runs inside the caller's transaction; asset writes do not roll back with
//! it, so an aborted transaction can leave orphaned blobs behind.

use std::{fmt, sync::Arc};

use sqlx::{Postgres, Transaction};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    assets::AssetStore,
    domain::cars::records::CarId,
    images::{ThumbnailGenerator, ThumbnailSpec, original_extension},
};

use super::{
    errors::PhotosError,
    primary::choose_primary,
    records::{PhotoId, PhotoRecord, PhotoUpload},
    repository::PgPhotosRepository,
};

#[derive(Clone)]
pub struct PhotoLifecycle {
    assets: Arc<dyn AssetStore>,
    thumbnails: Arc<dyn ThumbnailGenerator>,
    repository: PgPhotosRepository,
    namespace: String,
    thumbnail_spec: ThumbnailSpec,
}

impl fmt::Debug for PhotoLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhotoLifecycle")
            .field("namespace", &self.namespace)
            .field("thumbnail_spec", &self.thumbnail_spec)
            .finish_non_exhaustive()
    }
}

impl PhotoLifecycle {
    #[must_use]
    pub fn new(
        assets: Arc<dyn AssetStore>,
        thumbnails: Arc<dyn ThumbnailGenerator>,
        namespace: impl Into<String>,
        thumbnail_spec: ThumbnailSpec,
    ) -> Self {
        Self {
            assets,
            thumbnails,
            repository: PgPhotosRepository::new(),
            namespace: namespace.into(),
            thumbnail_spec,
        }
    }

    /// Store `uploads` as new photos of `car`.
    ///
    /// With `primary_index` the photo at that position (clamped to the batch)
    /// is created as primary and the rest are not. Without it every new photo
    /// is created non-primary; [`Self::resolve_primary`] settles the flag
    /// afterwards. Existing photos are left untouched.
    ///
    /// # Errors
    ///
    /// Fails on the first original that cannot be stored or row that cannot be
    /// inserted. A missing derivative is not an error.
    #[tracing::instrument(
        name = "photos.lifecycle.attach",
        skip(self, tx, car, uploads),
        fields(car_id = %car, uploads = uploads.len()),
        err
    )]
    pub async fn attach(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        car: CarId,
        uploads: Vec<PhotoUpload>,
        primary_index: Option<usize>,
    ) -> Result<Vec<PhotoRecord>, PhotosError> {
        let primary_index = primary_index.map(|index| index.min(uploads.len().saturating_sub(1)));

        let mut created = Vec::with_capacity(uploads.len());

        for (index, upload) in uploads.into_iter().enumerate() {
            let key = self.original_key(car, &upload);

            let stored = self.assets.put(&key, &upload.bytes).await?;

            let thumbnail = self
                .thumbnails
                .create_thumbnail(&stored, self.thumbnail_spec)
                .await;

            let photo = self
                .repository
                .create_photo(
                    tx,
                    car,
                    &stored,
                    thumbnail.as_deref(),
                    primary_index == Some(index),
                )
                .await?;

            created.push(photo);
        }

        debug!(created = created.len(), "attached photos");

        Ok(created)
    }

    /// Delete the given photos of `car` together with their blobs.
    ///
    /// Ids that do not belong to `car` are ignored. Returns the number of rows
    /// removed.
    ///
    /// # Errors
    ///
    /// Fails only on database errors; blob deletion problems are logged.
    #[tracing::instrument(
        name = "photos.lifecycle.remove",
        skip(self, tx, car),
        fields(car_id = %car),
        err
    )]
    pub async fn remove(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        car: CarId,
        photos: &[PhotoId],
    ) -> Result<u64, PhotosError> {
        if photos.is_empty() {
            return Ok(0);
        }

        let matching = self.repository.find_car_photos(tx, car, photos).await?;

        let mut removed = 0;

        for photo in matching {
            self.delete_blob(&photo.photo_path).await;

            if let Some(thumbnail) = photo.thumbnail_path.as_deref() {
                self.delete_blob(thumbnail).await;
            }

            removed += self.repository.delete_photo(tx, car, photo.id).await?;
        }

        debug!(removed, "removed photos");

        Ok(removed)
    }

    /// Re-establish a single primary photo for `car` and return it.
    ///
    /// # Errors
    ///
    /// Returns an error on database failure.
    #[tracing::instrument(
        name = "photos.lifecycle.resolve_primary",
        skip(self, tx, car),
        fields(car_id = %car, chosen = tracing::field::Empty),
        err
    )]
    pub async fn resolve_primary(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        car: CarId,
        requested: Option<PhotoId>,
    ) -> Result<Option<PhotoId>, PhotosError> {
        let candidates = self.repository.list_primary_candidates(tx, car).await?;

        let Some(chosen) = choose_primary(&candidates, requested) else {
            return Ok(None);
        };

        tracing::Span::current().record("chosen", chosen.into_i64());

        self.repository.set_primary(tx, car, chosen).await?;

        Ok(Some(chosen))
    }

    /// Remove every photo of `car`.
    ///
    /// # Errors
    ///
    /// Returns an error on database failure.
    pub async fn delete_all(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        car: CarId,
    ) -> Result<u64, PhotosError> {
        let photos: Vec<PhotoId> = self
            .repository
            .list_primary_candidates(tx, car)
            .await?
            .into_iter()
            .map(|candidate| candidate.id)
            .collect();

        self.remove(tx, car, &photos).await
    }

    /// Photos of `car` in display order.
    ///
    /// # Errors
    ///
    /// Returns an error on database failure.
    pub async fn list(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        car: CarId,
    ) -> Result<Vec<PhotoRecord>, PhotosError> {
        Ok(self.repository.list_car_photos(tx, car).await?)
    }

    /// Photos of several cars, grouped by car and in display order within each.
    ///
    /// # Errors
    ///
    /// Returns an error on database failure.
    pub async fn list_for_cars(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cars: &[CarId],
    ) -> Result<Vec<PhotoRecord>, PhotosError> {
        if cars.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self.repository.list_photos_for_cars(tx, cars).await?)
    }

    fn original_key(&self, car: CarId, upload: &PhotoUpload) -> String {
        format!(
            "{}/{car}/{}.{}",
            self.namespace.trim_end_matches('/'),
            Uuid::now_v7(),
            original_extension(&upload.file_name, &upload.bytes),
        )
    }

    async fn delete_blob(&self, key: &str) {
        match self.assets.delete(key).await {
            Ok(true) => {}
            Ok(false) => debug!(key, "blob already gone"),
            Err(error) => warn!(key, error = ?error, "could not delete blob"),
        }
    }
}
