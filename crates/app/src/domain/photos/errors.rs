//! Photo lifecycle errors.

use thiserror::Error;

use crate::assets::AssetStoreError;

#[derive(Debug, Error)]
pub enum PhotosError {
    #[error("photo storage failed")]
    Storage(#[from] AssetStoreError),

    #[error("photo persistence failed")]
    Sql(#[from] sqlx::Error),
}
