//! Cars Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use super::{
    data::{CarAttributes, CarAttributesPatch},
    records::{CarId, CarRecord},
};

const CREATE_CAR_SQL: &str = include_str!("sql/create_car.sql");
const GET_CAR_SQL: &str = include_str!("sql/get_car.sql");
const LIST_CARS_SQL: &str = include_str!("sql/list_cars.sql");
const COUNT_CARS_SQL: &str = include_str!("sql/count_cars.sql");
const UPDATE_CAR_SQL: &str = include_str!("sql/update_car.sql");
const DELETE_CAR_SQL: &str = include_str!("sql/delete_car.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCarsRepository;

impl PgCarsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    #[tracing::instrument(
        name = "cars.repository.create_car",
        skip(self, tx, attributes),
        fields(car_id = tracing::field::Empty),
        err
    )]
    pub(crate) async fn create_car(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        attributes: &CarAttributes,
    ) -> Result<CarRecord, sqlx::Error> {
        let car = query_as::<Postgres, CarRecord>(CREATE_CAR_SQL)
            .bind(&attributes.brand)
            .bind(&attributes.model)
            .bind(attributes.year)
            .bind(attributes.price)
            .bind(attributes.description.as_deref())
            .fetch_one(&mut **tx)
            .await?;

        tracing::Span::current().record("car_id", car.id.into_i64());

        Ok(car)
    }

    pub(crate) async fn get_car(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        car: CarId,
    ) -> Result<CarRecord, sqlx::Error> {
        query_as::<Postgres, CarRecord>(GET_CAR_SQL)
            .bind(car.into_i64())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_cars(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CarRecord>, sqlx::Error> {
        query_as::<Postgres, CarRecord>(LIST_CARS_SQL)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_cars(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<i64, sqlx::Error> {
        query_scalar(COUNT_CARS_SQL).fetch_one(&mut **tx).await
    }

    /// Overwrite only the attributes present in `patch`.
    #[tracing::instrument(name = "cars.repository.update_car", skip(self, tx, patch), err)]
    pub(crate) async fn update_car(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        car: CarId,
        patch: &CarAttributesPatch,
    ) -> Result<CarRecord, sqlx::Error> {
        query_as::<Postgres, CarRecord>(UPDATE_CAR_SQL)
            .bind(car.into_i64())
            .bind(patch.brand.as_deref())
            .bind(patch.model.as_deref())
            .bind(patch.year)
            .bind(patch.price)
            .bind(patch.description.is_some())
            .bind(patch.description.clone().flatten())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_car(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        car: CarId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CAR_SQL)
            .bind(car.into_i64())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CarRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: CarId::from_i64(row.try_get("id")?),
            brand: row.try_get("brand")?,
            model: row.try_get("model")?,
            year: row.try_get("year")?,
            price: row.try_get("price")?,
            description: row.try_get("description")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
