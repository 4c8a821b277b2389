//! Local filesystem asset store.

use std::{
    io::ErrorKind,
    path::{Component, Path, PathBuf},
};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};

use super::{AssetStore, AssetStoreError};

/// Stores every key as a file below a root directory.
#[derive(Debug, Clone)]
pub struct LocalAssetStore {
    root: PathBuf,
}

impl LocalAssetStore {
    /// Open (and create if needed) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns an error when the root directory cannot be created.
    pub async fn open(root: PathBuf) -> Result<Self, AssetStoreError> {
        fs::create_dir_all(&root)
            .await
            .map_err(|source| AssetStoreError::io(&root.display().to_string(), source))?;

        info!(path = %root.display(), "asset store initialized");

        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `key` below the root, rejecting anything that could escape it.
    fn resolve(&self, key: &str) -> Result<PathBuf, AssetStoreError> {
        if key.trim().is_empty() {
            return Err(AssetStoreError::InvalidKey(key.to_owned()));
        }

        let mut resolved = self.root.clone();

        for component in Path::new(key).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(AssetStoreError::InvalidKey(key.to_owned()));
                }
            }
        }

        if resolved == self.root {
            return Err(AssetStoreError::InvalidKey(key.to_owned()));
        }

        Ok(resolved)
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn exists(&self, key: &str) -> Result<bool, AssetStoreError> {
        let path = self.resolve(key)?;

        fs::try_exists(&path)
            .await
            .map_err(|source| AssetStoreError::io(key, source))
    }

    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String, AssetStoreError> {
        let path = self.resolve(key)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| AssetStoreError::io(key, source))?;
        }

        fs::write(&path, bytes)
            .await
            .map_err(|source| AssetStoreError::io(key, source))?;

        debug!(key, size = bytes.len(), "stored asset");

        Ok(key.to_owned())
    }

    async fn delete(&self, key: &str) -> Result<bool, AssetStoreError> {
        let path = self.resolve(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key, "deleted asset");

                Ok(true)
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(AssetStoreError::io(key, source)),
        }
    }

    async fn read(&self, key: &str) -> Result<Vec<u8>, AssetStoreError> {
        let path = self.resolve(key)?;

        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(error) if error.kind() == ErrorKind::NotFound => {
                Err(AssetStoreError::NotFound(key.to_owned()))
            }
            Err(source) => Err(AssetStoreError::io(key, source)),
        }
    }

    fn absolute_path(&self, key: &str) -> Result<PathBuf, AssetStoreError> {
        self.resolve(key)
    }
}
