//! Storage manager: owns the configured provider and builds public URLs.

use std::sync::Arc;

use tracing::{info, warn};

use petfinder_core::config::StorageConfig;
use petfinder_core::error::AppError;
use petfinder_core::result::AppResult;
use petfinder_core::traits::storage::{ByteStream, StorageObjectMeta, StorageProvider};

use crate::providers::LocalStorageProvider;
use crate::upload::ValidatedImage;

/// Path under which the API serves locally stored objects.
pub const LOCAL_UPLOADS_PATH: &str = "/uploads";

/// Central storage manager wrapping the configured provider.
#[derive(Debug, Clone)]
pub struct StorageManager {
    provider: Arc<dyn StorageProvider>,
    /// Base that object keys are appended to when building public URLs.
    public_base: String,
}

impl StorageManager {
    /// Create the manager from configuration.
    ///
    /// `server_base_url` is the API's own public address, used when objects
    /// are served back through `/uploads`.
    pub async fn new(config: &StorageConfig, server_base_url: &str) -> AppResult<Self> {
        match config.provider.to_lowercase().as_str() {
            "local" => {
                info!(root = %config.local.root_path, "Initializing local storage provider");
                let provider = LocalStorageProvider::new(&config.local.root_path).await?;
                Ok(Self::from_provider(
                    Arc::new(provider),
                    format!("{}{LOCAL_UPLOADS_PATH}", server_base_url.trim_end_matches('/')),
                ))
            }
            #[cfg(feature = "s3")]
            "s3" => {
                let provider = crate::providers::S3StorageProvider::new(&config.s3).await?;
                Ok(Self::from_provider(
                    Arc::new(provider),
                    config.s3.public_url.clone(),
                ))
            }
            other => Err(AppError::configuration(format!(
                "Unknown storage provider: '{other}'. Supported: local, s3"
            ))),
        }
    }

    /// Create a manager from an existing provider.
    pub fn from_provider(provider: Arc<dyn StorageProvider>, public_base: impl Into<String>) -> Self {
        let public_base = public_base.into().trim_end_matches('/').to_string();
        Self {
            provider,
            public_base,
        }
    }

    /// The underlying provider.
    pub fn provider(&self) -> &Arc<dyn StorageProvider> {
        &self.provider
    }

    /// Public URL for a stored object.
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base, key.trim_start_matches('/'))
    }

    /// Store a validated image and return its public URL.
    pub async fn store(&self, image: &ValidatedImage) -> AppResult<String> {
        self.provider
            .write(&image.key, image.data.clone(), image.content_type)
            .await?;
        Ok(self.public_url(&image.key))
    }

    /// Delete stored objects, logging failures instead of returning them.
    pub async fn remove_quietly(&self, keys: &[String]) {
        for key in keys {
            if let Err(e) = self.provider.delete(key).await {
                warn!(key = %key, error = %e, "Failed to delete orphaned object");
            }
        }
    }

    /// Open an object for streaming.
    pub async fn open(&self, key: &str) -> AppResult<(StorageObjectMeta, ByteStream)> {
        let meta = self.provider.metadata(key).await?;
        let stream = self.provider.read(key).await?;
        Ok((meta, stream))
    }

    /// Whether the provider is reachable.
    pub async fn health_check(&self) -> bool {
        self.provider.health_check().await.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    async fn local_manager(dir: &std::path::Path) -> StorageManager {
        let provider = LocalStorageProvider::new(dir).await.unwrap();
        StorageManager::from_provider(Arc::new(provider), "http://localhost:3000/uploads/")
    }

    #[tokio::test]
    async fn test_public_url() {
        let dir = tempfile::tempdir().unwrap();
        let manager = local_manager(dir.path()).await;
        assert_eq!(
            manager.public_url("pets/abc-rex.png"),
            "http://localhost:3000/uploads/pets/abc-rex.png"
        );
    }

    #[tokio::test]
    async fn test_store_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let manager = local_manager(dir.path()).await;
        let image = ValidatedImage {
            key: "pets/abc-rex.png".to_string(),
            content_type: "image/png",
            data: Bytes::from_static(b"png"),
        };

        let url = manager.store(&image).await.unwrap();
        assert!(url.ends_with("/uploads/pets/abc-rex.png"));
        assert!(manager.provider().exists(&image.key).await.unwrap());

        manager.remove_quietly(&[image.key.clone()]).await;
        assert!(!manager.provider().exists(&image.key).await.unwrap());
    }

    #[tokio::test]
    async fn test_new_local_uses_server_base() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = StorageConfig::default();
        config.local.root_path = dir.path().to_string_lossy().into_owned();
        let manager = StorageManager::new(&config, "https://api.example.org/").await.unwrap();
        assert_eq!(manager.provider().provider_type(), "local");
        assert_eq!(
            manager.public_url("pets/x.png"),
            "https://api.example.org/uploads/pets/x.png"
        );
    }

    #[tokio::test]
    async fn test_unknown_provider() {
        let config = StorageConfig {
            provider: "ftp".to_string(),
            ..StorageConfig::default()
        };
        assert!(StorageManager::new(&config, "http://x").await.is_err());
    }
}
