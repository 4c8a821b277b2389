//! Cover-fit thumbnail generator.

use std::{io::Cursor, sync::Arc};

use async_trait::async_trait;
use image::{DynamicImage, codecs::jpeg::JpegEncoder, imageops::FilterType};
use tokio::task;
use tracing::{debug, warn};

use crate::assets::AssetStore;

use super::{ImageVariantError, ThumbnailGenerator, ThumbnailSpec, keys::thumbnail_key};

/// Generates derivatives through an [`AssetStore`].
#[derive(Clone)]
pub struct ImageVariantGenerator {
    assets: Arc<dyn AssetStore>,
    namespace: String,
}

impl std::fmt::Debug for ImageVariantGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageVariantGenerator")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl ImageVariantGenerator {
    #[must_use]
    pub fn new(assets: Arc<dyn AssetStore>, namespace: impl Into<String>) -> Self {
        Self {
            assets,
            namespace: namespace.into(),
        }
    }

    async fn generate(
        &self,
        source_key: &str,
        spec: ThumbnailSpec,
    ) -> Result<String, ImageVariantError> {
        let source = self.assets.read(source_key).await?;

        let encoded = task::spawn_blocking(move || render_cover(&source, spec)).await??;

        let key = thumbnail_key(&self.namespace, source_key, spec);

        self.assets.put(&key, &encoded).await?;

        debug!(source_key, thumbnail_key = %key, size = encoded.len(), "stored thumbnail");

        Ok(key)
    }
}

#[async_trait]
impl ThumbnailGenerator for ImageVariantGenerator {
    #[tracing::instrument(
        name = "images.generator.create_thumbnail",
        skip(self),
        fields(width = spec.width, height = spec.height)
    )]
    async fn create_thumbnail(&self, source_key: &str, spec: ThumbnailSpec) -> Option<String> {
        if source_key.trim().is_empty() {
            return None;
        }

        match self.assets.exists(source_key).await {
            Ok(true) => {}
            Ok(false) => return None,
            Err(error) => {
                warn!(source_key, %error, "could not check thumbnail source");

                return None;
            }
        }

        match self.generate(source_key, spec).await {
            Ok(key) => Some(key),
            Err(error) => {
                warn!(source_key, error = ?error, "thumbnail generation failed");

                None
            }
        }
    }
}

/// Scale to cover the target box, crop the overflow centred, re-encode as JPEG.
fn render_cover(source: &[u8], spec: ThumbnailSpec) -> Result<Vec<u8>, ImageVariantError> {
    let decoded = image::load_from_memory(source)?;
    let fitted = decoded.resize_to_fill(spec.width, spec.height, FilterType::Lanczos3);

    let mut encoded = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut encoded, spec.quality);

    DynamicImage::ImageRgb8(fitted.to_rgb8()).write_with_encoder(encoder)?;

    Ok(encoded.into_inner())
}

#[cfg(test)]
mod tests {
    use image::{GenericImageView, ImageBuffer, ImageFormat, Rgb};
    use tempfile::TempDir;
    use testresult::TestResult;

    use crate::assets::{AssetStoreError, LocalAssetStore, MockAssetStore};

    use super::*;

    fn png_bytes(width: u32, height: u32) -> Result<Vec<u8>, image::ImageError> {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_fn(width, height, |x, _| {
            Rgb([u8::try_from(x % 256).unwrap_or(0), 0, 0])
        });

        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png)?;

        Ok(buf.into_inner())
    }

    async fn local_generator()
    -> Result<(ImageVariantGenerator, Arc<LocalAssetStore>, TempDir), AssetStoreError> {
        let dir = TempDir::new().map_err(|source| AssetStoreError::io("tempdir", source))?;
        let store = Arc::new(LocalAssetStore::open(dir.path().to_path_buf()).await?);
        let generator = ImageVariantGenerator::new(store.clone(), "cars/thumbnails");

        Ok((generator, store, dir))
    }

    #[test]
    fn render_cover_produces_exact_box_for_any_aspect_ratio() -> TestResult {
        let spec = ThumbnailSpec::default();

        for (width, height) in [(1200, 300), (300, 1200), (640, 360), (20, 10)] {
            let encoded = render_cover(&png_bytes(width, height)?, spec)?;
            let thumbnail = image::load_from_memory(&encoded)?;

            assert_eq!(thumbnail.dimensions(), (640, 360), "source {width}x{height}");
            assert_eq!(image::guess_format(&encoded)?, ImageFormat::Jpeg);
        }

        Ok(())
    }

    #[tokio::test]
    async fn create_thumbnail_stores_derivative() -> TestResult {
        let (generator, store, _dir) = local_generator().await?;
        store.put("cars/1/Front.png", &png_bytes(800, 800)?).await?;

        let key = generator
            .create_thumbnail(
                "cars/1/Front.png",
                ThumbnailSpec {
                    width: 64,
                    height: 36,
                    quality: 60,
                },
            )
            .await;

        let key = key.unwrap_or_default();

        assert!(!key.is_empty(), "expected a thumbnail key");
        assert!(key.starts_with("cars/thumbnails/front_"), "unexpected key {key}");
        assert!(key.ends_with("/64x36.jpg"), "unexpected key {key}");

        let stored = image::load_from_memory(&store.read(&key).await?)?;

        assert_eq!(stored.dimensions(), (64, 36));

        Ok(())
    }

    #[tokio::test]
    async fn create_thumbnail_returns_none_for_empty_or_missing_source() -> TestResult {
        let (generator, _store, _dir) = local_generator().await?;

        assert!(generator.create_thumbnail("", ThumbnailSpec::default()).await.is_none());
        assert!(
            generator
                .create_thumbnail("cars/1/missing.png", ThumbnailSpec::default())
                .await
                .is_none()
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_thumbnail_swallows_decode_failures() -> TestResult {
        let (generator, store, _dir) = local_generator().await?;
        store.put("cars/1/broken.jpg", b"not an image").await?;

        let key = generator
            .create_thumbnail("cars/1/broken.jpg", ThumbnailSpec::default())
            .await;

        assert!(key.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn create_thumbnail_swallows_storage_failures() -> TestResult {
        let source = png_bytes(100, 100)?;

        let mut assets = MockAssetStore::new();
        assets.expect_exists().returning(|_| Ok(true));
        assets.expect_read().returning(move |_| Ok(source.clone()));
        assets.expect_put().returning(|key, _| {
            Err(AssetStoreError::io(
                key,
                std::io::Error::other("disk full"),
            ))
        });

        let generator = ImageVariantGenerator::new(Arc::new(assets), "cars/thumbnails");

        let key = generator
            .create_thumbnail("cars/1/a.png", ThumbnailSpec::default())
            .await;

        assert!(key.is_none());

        Ok(())
    }
}
