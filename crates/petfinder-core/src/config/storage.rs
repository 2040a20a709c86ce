//! Image storage configuration.

use serde::{Deserialize, Serialize};

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage provider to use: `"local"` or `"s3"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Maximum size of a single uploaded image in bytes (default 5 MiB).
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,
    /// Maximum number of images attached to one listing.
    #[serde(default = "default_max_images")]
    pub max_images_per_listing: usize,
    /// Accepted image MIME types.
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,
    /// Local filesystem storage configuration.
    #[serde(default)]
    pub local: LocalStorageConfig,
    /// S3-compatible storage configuration.
    #[serde(default)]
    pub s3: S3StorageConfig,
}

impl StorageConfig {
    /// Check whether the given MIME type is accepted for upload.
    pub fn is_allowed_mime(&self, mime: &str) -> bool {
        self.allowed_mime_types
            .iter()
            .any(|m| m.eq_ignore_ascii_case(mime))
    }

    /// Largest multipart body a listing upload can legitimately produce.
    pub fn max_request_bytes(&self) -> usize {
        let images = self.max_image_bytes as usize * self.max_images_per_listing.max(1);
        // Headroom for the text fields and multipart framing.
        images + 1024 * 1024
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            max_image_bytes: default_max_image_bytes(),
            max_images_per_listing: default_max_images(),
            allowed_mime_types: default_allowed_mime_types(),
            local: LocalStorageConfig::default(),
            s3: S3StorageConfig::default(),
        }
    }
}

/// Local filesystem storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Root path for stored images.
    #[serde(default = "default_local_root")]
    pub root_path: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
        }
    }
}

/// S3-compatible object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3StorageConfig {
    /// S3 endpoint URL (for non-AWS services like MinIO or Supabase).
    #[serde(default)]
    pub endpoint: String,
    /// AWS region.
    #[serde(default = "default_region")]
    pub region: String,
    /// S3 bucket name.
    #[serde(default)]
    pub bucket: String,
    /// Access key ID.
    #[serde(default)]
    pub access_key: String,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: String,
    /// Public base URL objects are served from (bucket URL or CDN).
    #[serde(default)]
    pub public_url: String,
    /// Use path-style addressing (required by most S3-compatible services).
    #[serde(default = "default_force_path_style")]
    pub force_path_style: bool,
}

impl Default for S3StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            region: default_region(),
            bucket: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            public_url: String::new(),
            force_path_style: default_force_path_style(),
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_max_image_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_max_images() -> usize {
    5
}

fn default_allowed_mime_types() -> Vec<String> {
    vec![
        "image/jpeg".to_string(),
        "image/pjpeg".to_string(),
        "image/png".to_string(),
        "image/webp".to_string(),
    ]
}

fn default_local_root() -> String {
    "./data/uploads".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_force_path_style() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mime_whitelist() {
        let config = StorageConfig::default();
        assert!(config.is_allowed_mime("image/jpeg"));
        assert!(config.is_allowed_mime("IMAGE/PNG"));
        assert!(config.is_allowed_mime("image/webp"));
        assert!(!config.is_allowed_mime("image/gif"));
        assert!(!config.is_allowed_mime("application/pdf"));
    }

    #[test]
    fn test_max_request_bytes_covers_all_images() {
        let config = StorageConfig::default();
        assert!(config.max_request_bytes() > 5 * 5 * 1024 * 1024);
    }
}
