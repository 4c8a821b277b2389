//! Asset key derivation for originals and derivatives.

use std::path::Path;

use rand::{Rng, distributions::Alphanumeric};

use super::ThumbnailSpec;

const SUFFIX_LENGTH: usize = 6;
const FALLBACK_SLUG: &str = "photo";
const FALLBACK_EXTENSION: &str = "bin";
const MAX_EXTENSION_LENGTH: usize = 5;

/// Derivatives are always re-encoded to this format.
pub(super) const THUMBNAIL_EXTENSION: &str = "jpg";

/// Lower-case ASCII slug with single hyphens between alphanumeric runs.
pub(crate) fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }

            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// `{namespace}/{slug}_{suffix}/{width}x{height}.jpg`
pub(super) fn thumbnail_key(namespace: &str, source_key: &str, spec: ThumbnailSpec) -> String {
    let stem = Path::new(source_key)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();

    let mut slug = slugify(stem);

    if slug.is_empty() {
        slug.push_str(FALLBACK_SLUG);
    }

    format!(
        "{}/{slug}_{}/{}x{}.{THUMBNAIL_EXTENSION}",
        namespace.trim_end_matches('/'),
        random_suffix(),
        spec.width,
        spec.height,
    )
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LENGTH)
        .map(char::from)
        .collect()
}

/// File extension for a stored original.
///
/// Prefers the uploaded file name, then sniffs the bytes.
pub(crate) fn original_extension(file_name: &str, bytes: &[u8]) -> String {
    let from_name = Path::new(file_name)
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|extension| {
            !extension.is_empty()
                && extension.len() <= MAX_EXTENSION_LENGTH
                && extension.chars().all(|c| c.is_ascii_alphanumeric())
        });

    from_name
        .or_else(|| {
            image::guess_format(bytes)
                .ok()
                .and_then(|format| format.extensions_str().first())
                .map(|extension| (*extension).to_owned())
        })
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("My Car  Photo_01"), "my-car-photo-01");
        assert_eq!(slugify("--Audi--e-tron--"), "audi-e-tron");
        assert_eq!(slugify("___"), "");
    }

    #[test]
    fn thumbnail_key_follows_layout() {
        let key = thumbnail_key(
            "cars/thumbnails/",
            "cars/12/Front View.JPG",
            ThumbnailSpec::default(),
        );

        let rest = key
            .strip_prefix("cars/thumbnails/front-view_")
            .unwrap_or_default();

        assert_eq!(rest.len(), SUFFIX_LENGTH + "/640x360.jpg".len(), "unexpected key {key}");
        assert!(rest.ends_with("/640x360.jpg"), "unexpected key {key}");
    }

    #[test]
    fn thumbnail_keys_are_unique_per_generation() {
        let spec = ThumbnailSpec::default();

        let first = thumbnail_key("cars/thumbnails", "cars/1/a.jpg", spec);
        let second = thumbnail_key("cars/thumbnails", "cars/1/a.jpg", spec);

        assert_ne!(first, second);
    }

    #[test]
    fn thumbnail_key_falls_back_when_stem_has_no_slug() {
        let key = thumbnail_key("thumbs", "cars/1/___.png", ThumbnailSpec::default());

        assert!(key.starts_with("thumbs/photo_"), "unexpected key {key}");
    }

    #[test]
    fn original_extension_prefers_file_name() {
        assert_eq!(original_extension("Front.JPEG", b""), "jpeg");
    }

    #[test]
    fn original_extension_sniffs_bytes_then_falls_back() {
        let png_magic = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

        assert_eq!(original_extension("upload", &png_magic), "png");
        assert_eq!(original_extension("upload.tar.gz!", b"plain text"), "bin");
    }
}
