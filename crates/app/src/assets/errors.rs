//! Asset store errors.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetStoreError {
    #[error("invalid asset key: {0:?}")]
    InvalidKey(String),

    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("asset storage failed for {key}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },
}

impl AssetStoreError {
    pub(crate) fn io(key: &str, source: io::Error) -> Self {
        Self::Io {
            key: key.to_owned(),
            source,
        }
    }
}
