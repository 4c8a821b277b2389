//! Image variants
//!
//! Derived images (thumbnails) generated from stored originals.

use async_trait::async_trait;
use mockall::automock;

mod errors;
mod generator;
mod keys;

pub use errors::ImageVariantError;
pub use generator::ImageVariantGenerator;
pub(crate) use keys::original_extension;

/// Target box and encoder quality for a derivative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailSpec {
    pub width: u32,
    pub height: u32,
    pub quality: u8,
}

impl Default for ThumbnailSpec {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
            quality: 75,
        }
    }
}

#[automock]
#[async_trait]
pub trait ThumbnailGenerator: Send + Sync {
    /// Generate a derivative of `source_key` and return its asset key.
    ///
    /// Returns `None` when the source is missing or any step fails; a missing
    /// derivative is never an error for the caller.
    async fn create_thumbnail(&self, source_key: &str, spec: ThumbnailSpec) -> Option<String>;
}
