//! Upload policy for listing photos.

use ::image::ImageFormat;
use bytes::Bytes;
use uuid::Uuid;

use petfinder_core::config::StorageConfig;
use petfinder_core::error::AppError;
use petfinder_core::result::AppResult;

/// Directory prefix for listing photos.
const KEY_PREFIX: &str = "pets";
/// Longest sanitized file name kept in a key.
const MAX_NAME_LEN: usize = 100;

/// A file received from a multipart form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Client-supplied file name.
    pub file_name: Option<String>,
    /// Declared MIME type.
    pub content_type: String,
    /// File contents.
    pub data: Bytes,
}

/// An upload that passed the policy.
#[derive(Debug, Clone)]
pub struct ValidatedImage {
    /// Storage key, `pets/<32 hex>-<name>`.
    pub key: String,
    /// Canonical MIME type of the detected format.
    pub content_type: &'static str,
    /// File contents.
    pub data: Bytes,
}

/// Type and size rules applied to each uploaded photo.
#[derive(Debug, Clone)]
pub struct ImagePolicy {
    max_bytes: u64,
    allowed_mime_types: Vec<String>,
}

impl ImagePolicy {
    /// Build the policy from storage configuration.
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            max_bytes: config.max_image_bytes,
            allowed_mime_types: config
                .allowed_mime_types
                .iter()
                .map(|m| m.to_lowercase())
                .collect(),
        }
    }

    /// Check an upload and assign it a storage key.
    ///
    /// The declared type must be whitelisted and agree with the file's
    /// magic bytes; anything else is rejected as an invalid file type.
    pub fn validate(&self, upload: ImageUpload) -> AppResult<ValidatedImage> {
        let declared = upload.content_type.trim().to_lowercase();
        if !self.allowed_mime_types.contains(&declared) {
            return Err(AppError::unsupported_media("Invalid file type"));
        }

        if upload.data.len() as u64 > self.max_bytes {
            return Err(AppError::payload_too_large(format!(
                "Image exceeds the maximum size of {} bytes",
                self.max_bytes
            )));
        }
        if upload.data.is_empty() {
            return Err(AppError::validation("Uploaded image is empty"));
        }

        let detected = ::image::guess_format(&upload.data)
            .map_err(|_| AppError::unsupported_media("Invalid file type"))?;
        let canonical = canonical_mime(detected)
            .ok_or_else(|| AppError::unsupported_media("Invalid file type"))?;
        if canonical_declared(&declared) != canonical {
            return Err(AppError::unsupported_media("Invalid file type"));
        }

        let key = object_key(upload.file_name.as_deref(), detected);
        Ok(ValidatedImage {
            key,
            content_type: canonical,
            data: upload.data,
        })
    }
}

/// MIME type for the formats accepted as listing photos.
fn canonical_mime(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Png => Some("image/png"),
        ImageFormat::WebP => Some("image/webp"),
        _ => None,
    }
}

fn canonical_declared(declared: &str) -> &str {
    match declared {
        "image/pjpeg" | "image/jpg" => "image/jpeg",
        other => other,
    }
}

/// Build `pets/<32 hex>-<sanitized name>` for a stored photo.
pub fn object_key(file_name: Option<&str>, format: ImageFormat) -> String {
    let name = file_name.map(sanitize_file_name).unwrap_or_default();
    let name = if name.is_empty() {
        let ext = format.extensions_str().first().copied().unwrap_or("img");
        format!("image.{ext}")
    } else {
        name
    };
    format!("{KEY_PREFIX}/{}-{name}", Uuid::new_v4().simple())
}

/// Keep the base name and replace anything outside `[A-Za-z0-9._-]`.
fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '-');
    trimmed.chars().take(MAX_NAME_LEN).collect()
}

/// Guess the MIME type of a stored object from its key.
pub fn content_type_for_key(key: &str) -> &'static str {
    ImageFormat::from_path(key.to_ascii_lowercase())
        .ok()
        .and_then(canonical_mime)
        .unwrap_or("application/octet-stream")
}

#[cfg(test)]
mod tests {
    use petfinder_core::error::ErrorKind;

    use super::*;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
    const JPEG: &[u8] = b"\xFF\xD8\xFF\xE0\0\x10JFIF\0";
    const GIF: &[u8] = b"GIF89a\x01\0\x01\0";

    fn policy() -> ImagePolicy {
        ImagePolicy::new(&StorageConfig::default())
    }

    fn upload(name: &str, mime: &str, data: &[u8]) -> ImageUpload {
        ImageUpload {
            file_name: Some(name.to_string()),
            content_type: mime.to_string(),
            data: Bytes::copy_from_slice(data),
        }
    }

    #[test]
    fn test_accepts_matching_png() {
        let img = policy().validate(upload("rex.png", "image/png", PNG)).unwrap();
        assert_eq!(img.content_type, "image/png");
        assert!(img.key.starts_with("pets/"));
        assert!(img.key.ends_with("-rex.png"));
        let hash = &img.key["pets/".len().."pets/".len() + 32];
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_pjpeg_is_jpeg() {
        let img = policy().validate(upload("a.jpg", "image/pjpeg", JPEG)).unwrap();
        assert_eq!(img.content_type, "image/jpeg");
    }

    #[test]
    fn test_rejects_unlisted_type() {
        let err = policy().validate(upload("a.gif", "image/gif", GIF)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedMedia);
        assert_eq!(err.message, "Invalid file type");
    }

    #[test]
    fn test_rejects_mismatched_content() {
        let err = policy().validate(upload("a.png", "image/png", GIF)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedMedia);
        let err = policy().validate(upload("a.png", "image/jpeg", PNG)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedMedia);
    }

    #[test]
    fn test_rejects_oversized() {
        let config = StorageConfig {
            max_image_bytes: 8,
            ..StorageConfig::default()
        };
        let err = ImagePolicy::new(&config)
            .validate(upload("a.png", "image/png", PNG))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::PayloadTooLarge);
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\My Dog.JPG"), "My-Dog.JPG");
        assert_eq!(sanitize_file_name("..."), "");
    }

    #[test]
    fn test_object_key_without_name() {
        let key = object_key(None, ImageFormat::WebP);
        assert!(key.ends_with("-image.webp"));
    }

    #[test]
    fn test_content_type_for_key() {
        assert_eq!(content_type_for_key("pets/abc-rex.PNG"), "image/png");
        assert_eq!(content_type_for_key("pets/abc-rex.jpeg"), "image/jpeg");
        assert_eq!(content_type_for_key("pets/abc-notes"), "application/octet-stream");
    }
}
