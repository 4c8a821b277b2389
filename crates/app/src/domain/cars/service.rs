//! Cars service.
//!
//! Creates, updates and deletes a car together with its options and photos
//! inside one transaction.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use sqlx::{Postgres, Transaction};
use tracing::debug;

use crate::{
    database::Db,
    domain::{
        cars::{
            data::{CarUpdate, NewCar},
            errors::CarsServiceError,
            models::{CARS_PER_PAGE, Car, CarPage},
            records::{CarId, CarRecord},
            repository::PgCarsRepository,
        },
        options::{OptionRecord, normalize_options, repository::PgOptionsRepository},
        photos::{PhotoLifecycle, PhotoRecord},
    },
};

#[derive(Debug, Clone)]
pub struct PgCarsService {
    db: Db,
    cars_repository: PgCarsRepository,
    options_repository: PgOptionsRepository,
    photos: PhotoLifecycle,
}

impl PgCarsService {
    #[must_use]
    pub fn new(db: Db, photos: PhotoLifecycle) -> Self {
        Self {
            db,
            cars_repository: PgCarsRepository::new(),
            options_repository: PgOptionsRepository::new(),
            photos,
        }
    }

    /// Make the normalized `names` exactly the options of `car`.
    async fn sync_options(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        car: CarId,
        names: &[String],
    ) -> Result<(), CarsServiceError> {
        if names.is_empty() {
            let detached = self.options_repository.detach_all(tx, car).await?;

            debug!(car_id = %car, detached, "detached all options");

            return Ok(());
        }

        let ids = self.options_repository.sync_options(tx, names).await?;

        let ordered = names
            .iter()
            .map(|name| ids.get(name).copied())
            .collect::<Option<SmallVec<[_; 8]>>>()
            .ok_or(CarsServiceError::InvalidReference)?;

        self.options_repository
            .replace_car_options(tx, car, &ordered)
            .await?;

        Ok(())
    }

    async fn load_cars(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        records: Vec<CarRecord>,
    ) -> Result<Vec<Car>, CarsServiceError> {
        let ids: Vec<CarId> = records.iter().map(|record| record.id).collect();

        let mut photos: FxHashMap<CarId, Vec<PhotoRecord>> = FxHashMap::default();

        for photo in self.photos.list_for_cars(tx, &ids).await? {
            photos.entry(photo.car_id).or_default().push(photo);
        }

        let mut options: FxHashMap<CarId, Vec<OptionRecord>> = FxHashMap::default();

        if !ids.is_empty() {
            for (car, option) in self.options_repository.list_options_for_cars(tx, &ids).await? {
                options.entry(car).or_default().push(option);
            }
        }

        Ok(records
            .into_iter()
            .map(|record| {
                let id = record.id;

                Car::from_parts(
                    record,
                    photos.remove(&id).unwrap_or_default(),
                    options.remove(&id).unwrap_or_default(),
                )
            })
            .collect())
    }

    async fn load_car(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        record: CarRecord,
    ) -> Result<Car, CarsServiceError> {
        self.load_cars(tx, vec![record])
            .await?
            .pop()
            .ok_or(CarsServiceError::NotFound)
    }
}

#[async_trait]
impl CarsService for PgCarsService {
    async fn list_cars(&self, page: u32) -> Result<CarPage, CarsServiceError> {
        let page = page.max(1);
        let offset = i64::from(page - 1) * i64::from(CARS_PER_PAGE);

        let mut tx = self.db.begin_transaction().await?;

        let total = self.cars_repository.count_cars(&mut tx).await?;
        let records = self
            .cars_repository
            .list_cars(&mut tx, i64::from(CARS_PER_PAGE), offset)
            .await?;
        let cars = self.load_cars(&mut tx, records).await?;

        tx.commit().await?;

        Ok(CarPage {
            cars,
            page,
            per_page: CARS_PER_PAGE,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn get_car(&self, car: CarId) -> Result<Car, CarsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.cars_repository.get_car(&mut tx, car).await?;
        let car = self.load_car(&mut tx, record).await?;

        tx.commit().await?;

        Ok(car)
    }

    #[tracing::instrument(
        name = "cars.service.create_car",
        skip(self, car),
        fields(photos = car.photos.len(), car_id = tracing::field::Empty),
        err
    )]
    async fn create_car(&self, car: NewCar) -> Result<Car, CarsServiceError> {
        let NewCar {
            attributes,
            options,
            photos,
            primary_photo_index,
        } = car;

        let mut tx = self.db.begin_transaction().await?;

        let record = self.cars_repository.create_car(&mut tx, &attributes).await?;
        let id = record.id;

        tracing::Span::current().record("car_id", id.into_i64());

        self.sync_options(&mut tx, id, &normalize_options(options))
            .await?;

        self.photos
            .attach(&mut tx, id, photos, Some(primary_photo_index.unwrap_or_default()))
            .await?;

        self.photos.resolve_primary(&mut tx, id, None).await?;

        let created = self.load_car(&mut tx, record).await?;

        tx.commit().await?;

        Ok(created)
    }

    #[tracing::instrument(
        name = "cars.service.update_car",
        skip(self, update),
        fields(
            new_photos = update.new_photos.len(),
            removed_photos = update.removed_photo_ids.len()
        ),
        err
    )]
    async fn update_car(&self, car: CarId, update: CarUpdate) -> Result<Car, CarsServiceError> {
        let CarUpdate {
            attributes,
            options,
            new_photos,
            removed_photo_ids,
            primary_photo_id,
        } = update;

        let mut tx = self.db.begin_transaction().await?;

        let record = self
            .cars_repository
            .update_car(&mut tx, car, &attributes)
            .await?;

        if let Some(options) = options {
            self.sync_options(&mut tx, car, &normalize_options(options))
                .await?;
        }

        self.photos
            .remove(&mut tx, car, &removed_photo_ids)
            .await?;

        self.photos.attach(&mut tx, car, new_photos, None).await?;

        self.photos
            .resolve_primary(&mut tx, car, primary_photo_id)
            .await?;

        let updated = self.load_car(&mut tx, record).await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(name = "cars.service.delete_car", skip(self), err)]
    async fn delete_car(&self, car: CarId) -> Result<(), CarsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        self.photos.delete_all(&mut tx, car).await?;

        let rows_affected = self.cars_repository.delete_car(&mut tx, car).await?;

        if rows_affected == 0 {
            return Err(CarsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn list_available_options(&self) -> Result<Vec<OptionRecord>, CarsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let options = self.options_repository.list_options(&mut tx).await?;

        tx.commit().await?;

        Ok(options)
    }
}

#[automock]
#[async_trait]
pub trait CarsService: Send + Sync {
    /// Retrieve one page of cars, newest first. Pages start at 1.
    async fn list_cars(&self, page: u32) -> Result<CarPage, CarsServiceError>;

    /// Retrieve a single car with its photos and options.
    async fn get_car(&self, car: CarId) -> Result<Car, CarsServiceError>;

    /// Creates a car with its options and photos.
    async fn create_car(&self, car: NewCar) -> Result<Car, CarsServiceError>;

    /// Applies a partial update, option changes and photo changes.
    async fn update_car(&self, car: CarId, update: CarUpdate) -> Result<Car, CarsServiceError>;

    /// Deletes a car, its photos and their stored files.
    async fn delete_car(&self, car: CarId) -> Result<(), CarsServiceError>;

    /// Every known option, by name.
    async fn list_available_options(&self) -> Result<Vec<OptionRecord>, CarsServiceError>;
}
