//! Storage Config

use std::path::PathBuf;

use clap::Args;

/// Where photos and their thumbnails are kept.
#[derive(Debug, Clone, Args)]
pub struct StorageConfig {
    /// Directory every asset key is resolved under
    #[arg(long, env = "ASSETS_ROOT", default_value = "storage/app/public")]
    pub assets_root: PathBuf,

    /// Key prefix for uploaded originals
    #[arg(long, env = "PHOTOS_NAMESPACE", default_value = "cars")]
    pub photos_namespace: String,

    /// Key prefix for generated thumbnails
    #[arg(
        long,
        env = "THUMBNAILS_NAMESPACE",
        default_value = "cars/thumbnails"
    )]
    pub thumbnails_namespace: String,
}
