//! Asset Store
//!
//! Blob storage addressed by relative, `/`-separated keys. Photos and their
//! derivatives live here; rows only carry the keys.

use std::path::PathBuf;

use async_trait::async_trait;
use mockall::automock;

mod errors;
mod local;

pub use errors::AssetStoreError;
pub use local::LocalAssetStore;

#[automock]
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Whether a blob is stored under `key`.
    async fn exists(&self, key: &str) -> Result<bool, AssetStoreError>;

    /// Write `bytes` under `key`, replacing any previous blob, and return the key.
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String, AssetStoreError>;

    /// Delete the blob under `key`.
    ///
    /// Deleting a missing key succeeds and returns `false`.
    async fn delete(&self, key: &str) -> Result<bool, AssetStoreError>;

    /// Read the blob stored under `key`.
    async fn read(&self, key: &str) -> Result<Vec<u8>, AssetStoreError>;

    /// Filesystem location of `key`, for collaborators that decode from disk.
    fn absolute_path(&self, key: &str) -> Result<PathBuf, AssetStoreError>;
}
