//! Photos Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    domain::cars::records::CarId,
    ids::to_i64s,
};

use super::{
    primary::PrimaryCandidate,
    records::{PhotoId, PhotoRecord},
};

const LIST_CAR_PHOTOS_SQL: &str = include_str!("sql/list_car_photos.sql");
const LIST_PHOTOS_FOR_CARS_SQL: &str = include_str!("sql/list_photos_for_cars.sql");
const FIND_CAR_PHOTOS_SQL: &str = include_str!("sql/find_car_photos.sql");
const LIST_PRIMARY_CANDIDATES_SQL: &str = include_str!("sql/list_primary_candidates.sql");
const CREATE_PHOTO_SQL: &str = include_str!("sql/create_photo.sql");
const DELETE_PHOTO_SQL: &str = include_str!("sql/delete_photo.sql");
const SET_PRIMARY_PHOTO_SQL: &str = include_str!("sql/set_primary_photo.sql");
const LIST_PHOTOS_FOR_REGENERATION_SQL: &str = include_str!("sql/list_photos_for_regeneration.sql");
const SET_THUMBNAIL_PATH_SQL: &str = include_str!("sql/set_thumbnail_path.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPhotosRepository;

impl PgPhotosRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Photos of one car in display order: primary first, then by id.
    pub(crate) async fn list_car_photos(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        car: CarId,
    ) -> Result<Vec<PhotoRecord>, sqlx::Error> {
        query_as::<Postgres, PhotoRecord>(LIST_CAR_PHOTOS_SQL)
            .bind(car.into_i64())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_photos_for_cars(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cars: &[CarId],
    ) -> Result<Vec<PhotoRecord>, sqlx::Error> {
        query_as::<Postgres, PhotoRecord>(LIST_PHOTOS_FOR_CARS_SQL)
            .bind(to_i64s(cars))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn find_car_photos(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        car: CarId,
        photos: &[PhotoId],
    ) -> Result<Vec<PhotoRecord>, sqlx::Error> {
        query_as::<Postgres, PhotoRecord>(FIND_CAR_PHOTOS_SQL)
            .bind(car.into_i64())
            .bind(to_i64s(photos))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_primary_candidates(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        car: CarId,
    ) -> Result<Vec<PrimaryCandidate>, sqlx::Error> {
        let rows: Vec<(i64, bool)> = query_as(LIST_PRIMARY_CANDIDATES_SQL)
            .bind(car.into_i64())
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, is_primary)| PrimaryCandidate {
                id: PhotoId::from_i64(id),
                is_primary,
            })
            .collect())
    }

    #[tracing::instrument(
        name = "photos.repository.create_photo",
        skip(self, tx),
        fields(photo_id = tracing::field::Empty),
        err
    )]
    pub(crate) async fn create_photo(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        car: CarId,
        photo_path: &str,
        thumbnail_path: Option<&str>,
        is_primary: bool,
    ) -> Result<PhotoRecord, sqlx::Error> {
        let photo = query_as::<Postgres, PhotoRecord>(CREATE_PHOTO_SQL)
            .bind(car.into_i64())
            .bind(photo_path)
            .bind(thumbnail_path)
            .bind(is_primary)
            .fetch_one(&mut **tx)
            .await?;

        tracing::Span::current().record("photo_id", photo.id.into_i64());

        Ok(photo)
    }

    pub(crate) async fn delete_photo(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        car: CarId,
        photo: PhotoId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PHOTO_SQL)
            .bind(car.into_i64())
            .bind(photo.into_i64())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Flag `photo` as primary and clear the flag on every other photo of `car`.
    #[tracing::instrument(name = "photos.repository.set_primary", skip(self, tx), err)]
    pub(crate) async fn set_primary(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        car: CarId,
        photo: PhotoId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_PRIMARY_PHOTO_SQL)
            .bind(car.into_i64())
            .bind(photo.into_i64())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn list_photos_for_regeneration(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        force: bool,
    ) -> Result<Vec<PhotoRecord>, sqlx::Error> {
        query_as::<Postgres, PhotoRecord>(LIST_PHOTOS_FOR_REGENERATION_SQL)
            .bind(force)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn set_thumbnail_path(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        photo: PhotoId,
        thumbnail_path: Option<&str>,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_THUMBNAIL_PATH_SQL)
            .bind(photo.into_i64())
            .bind(thumbnail_path)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for PhotoRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: PhotoId::from_i64(row.try_get("id")?),
            car_id: CarId::from_i64(row.try_get("car_id")?),
            photo_path: row.try_get("photo_path")?,
            thumbnail_path: row.try_get("thumbnail_path")?,
            is_primary: row.try_get("is_primary")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
