//! Cars service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{assets::AssetStoreError, domain::photos::PhotosError};

#[derive(Debug, Error)]
pub enum CarsServiceError {
    #[error("car already exists")]
    AlreadyExists,

    #[error("car not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("photo storage error")]
    Storage(#[source] AssetStoreError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CarsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<PhotosError> for CarsServiceError {
    fn from(error: PhotosError) -> Self {
        match error {
            PhotosError::Storage(source) => Self::Storage(source),
            PhotosError::Sql(source) => source.into(),
        }
    }
}
