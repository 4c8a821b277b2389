//! Options Repository

use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction, query, query_as};

use crate::{domain::cars::records::CarId, ids::to_i64s};

use super::records::{OptionId, OptionRecord};

const INSERT_OPTIONS_SQL: &str = include_str!("sql/insert_options.sql");
const FIND_OPTIONS_BY_NAME_SQL: &str = include_str!("sql/find_options_by_name.sql");
const ATTACH_CAR_OPTIONS_SQL: &str = include_str!("sql/attach_car_options.sql");
const DETACH_CAR_OPTIONS_EXCEPT_SQL: &str = include_str!("sql/detach_car_options_except.sql");
const DETACH_ALL_CAR_OPTIONS_SQL: &str = include_str!("sql/detach_all_car_options.sql");
const LIST_OPTIONS_FOR_CARS_SQL: &str = include_str!("sql/list_options_for_cars.sql");
const LIST_OPTIONS_SQL: &str = include_str!("sql/list_options.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOptionsRepository;

impl PgOptionsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Ensure an option row exists for every name and return their ids.
    ///
    /// The lookup is a separate statement from the insert so that names
    /// committed concurrently, which the insert skips, are still returned.
    #[tracing::instrument(name = "options.repository.sync_options", skip(self, tx), err)]
    pub(crate) async fn sync_options(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        names: &[String],
    ) -> Result<FxHashMap<String, OptionId>, sqlx::Error> {
        query(INSERT_OPTIONS_SQL)
            .bind(names)
            .execute(&mut **tx)
            .await?;

        let rows: Vec<(i64, String)> = query_as(FIND_OPTIONS_BY_NAME_SQL)
            .bind(names)
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| (name, OptionId::from_i64(id)))
            .collect())
    }

    /// Make `options` exactly the option set of `car`.
    #[tracing::instrument(name = "options.repository.replace_car_options", skip(self, tx), err)]
    pub(crate) async fn replace_car_options(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        car: CarId,
        options: &[OptionId],
    ) -> Result<(), sqlx::Error> {
        let ids = to_i64s(options);

        query(DETACH_CAR_OPTIONS_EXCEPT_SQL)
            .bind(car.into_i64())
            .bind(&ids)
            .execute(&mut **tx)
            .await?;

        query(ATTACH_CAR_OPTIONS_SQL)
            .bind(car.into_i64())
            .bind(&ids)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn detach_all(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        car: CarId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DETACH_ALL_CAR_OPTIONS_SQL)
            .bind(car.into_i64())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Options of each car, by name.
    pub(crate) async fn list_options_for_cars(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cars: &[CarId],
    ) -> Result<Vec<(CarId, OptionRecord)>, sqlx::Error> {
        let rows: Vec<(i64, i64, String)> = query_as(LIST_OPTIONS_FOR_CARS_SQL)
            .bind(to_i64s(cars))
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(car, id, name)| {
                (
                    CarId::from_i64(car),
                    OptionRecord {
                        id: OptionId::from_i64(id),
                        name,
                    },
                )
            })
            .collect())
    }

    pub(crate) async fn list_options(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<OptionRecord>, sqlx::Error> {
        let rows: Vec<(i64, String)> = query_as(LIST_OPTIONS_SQL)
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| OptionRecord {
                id: OptionId::from_i64(id),
                name,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestDb;

    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[tokio::test]
    async fn sync_options_returns_ids_for_new_and_existing_names() -> TestResult {
        let db = TestDb::new().await;
        let repository = PgOptionsRepository::new();

        let mut other = db.begin().await;
        let existing = repository
            .sync_options(&mut other, &names(&["Bluetooth"]))
            .await?;
        other.commit().await?;

        let mut tx = db.begin().await;
        let ids = repository
            .sync_options(&mut tx, &names(&["Bluetooth", "MP3", "MP3"]))
            .await?;
        tx.commit().await?;

        assert_eq!(ids.len(), 2, "expected one id per distinct name");
        assert_eq!(ids.get("Bluetooth"), existing.get("Bluetooth"));
        assert!(ids.contains_key("MP3"), "expected the new name to get an id");

        Ok(())
    }
}
