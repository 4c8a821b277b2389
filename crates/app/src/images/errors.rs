//! Image variant errors.

use image::ImageError;
use thiserror::Error;
use tokio::task::JoinError;

use crate::assets::AssetStoreError;

#[derive(Debug, Error)]
pub enum ImageVariantError {
    #[error("asset storage failed")]
    Storage(#[from] AssetStoreError),

    #[error("image processing failed")]
    Image(#[from] ImageError),

    #[error("image task did not complete")]
    Task(#[from] JoinError),
}
