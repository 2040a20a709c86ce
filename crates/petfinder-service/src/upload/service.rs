//! Validating, storing and serving listing photos.

use tracing::{debug, info};

use petfinder_core::config::StorageConfig;
use petfinder_core::error::AppError;
use petfinder_core::result::AppResult;
use petfinder_core::traits::storage::ByteStream;
use petfinder_entity::pet::NewPetImage;
use petfinder_storage::upload::content_type_for_key;
use petfinder_storage::{ImagePolicy, ImageUpload, StorageManager, ValidatedImage};

/// A stored object opened for download.
pub struct StoredObject {
    /// MIME type to send back.
    pub content_type: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Object contents.
    pub body: ByteStream,
}

impl std::fmt::Debug for StoredObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredObject")
            .field("content_type", &self.content_type)
            .field("size_bytes", &self.size_bytes)
            .finish()
    }
}

/// Applies the image policy and talks to the storage manager.
#[derive(Debug, Clone)]
pub struct UploadService {
    storage: StorageManager,
    policy: ImagePolicy,
    max_images: usize,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(storage: StorageManager, config: &StorageConfig) -> Self {
        Self {
            storage,
            policy: ImagePolicy::new(config),
            max_images: config.max_images_per_listing,
        }
    }

    /// Check the photos attached to a new listing.
    pub fn validate_all(&self, uploads: Vec<ImageUpload>) -> AppResult<Vec<ValidatedImage>> {
        if uploads.is_empty() {
            return Err(AppError::validation("At least one photo is required"));
        }
        if uploads.len() > self.max_images {
            return Err(AppError::validation(format!(
                "A listing can have at most {} photos",
                self.max_images
            )));
        }
        uploads
            .into_iter()
            .map(|upload| self.policy.validate(upload))
            .collect()
    }

    /// Write every image to storage.
    ///
    /// If any write fails, images already written are removed before the
    /// error is returned.
    pub async fn store_all(&self, images: &[ValidatedImage]) -> AppResult<Vec<NewPetImage>> {
        let mut stored = Vec::with_capacity(images.len());
        for image in images {
            match self.storage.store(image).await {
                Ok(url) => stored.push(NewPetImage {
                    url,
                    storage_key: image.key.clone(),
                }),
                Err(e) => {
                    self.discard(&stored).await;
                    return Err(e);
                }
            }
        }
        info!(count = stored.len(), "Stored listing photos");
        Ok(stored)
    }

    /// Best-effort removal of images whose listing was never recorded.
    pub async fn discard(&self, images: &[NewPetImage]) {
        if images.is_empty() {
            return;
        }
        let keys: Vec<String> = images.iter().map(|i| i.storage_key.clone()).collect();
        debug!(count = keys.len(), "Discarding stored photos");
        self.storage.remove_quietly(&keys).await;
    }

    /// Open a stored object for download.
    pub async fn open(&self, key: &str) -> AppResult<StoredObject> {
        let (meta, body) = self.storage.open(key).await?;
        let content_type = meta
            .mime_type
            .unwrap_or_else(|| content_type_for_key(key).to_string());
        Ok(StoredObject {
            content_type,
            size_bytes: meta.size_bytes,
            body,
        })
    }

    /// Whether the storage backend is reachable.
    pub async fn health_check(&self) -> bool {
        self.storage.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::Bytes;
    use petfinder_core::error::ErrorKind;
    use petfinder_storage::providers::LocalStorageProvider;

    use super::*;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    async fn service(dir: &std::path::Path) -> UploadService {
        let provider = LocalStorageProvider::new(dir).await.unwrap();
        let storage = StorageManager::from_provider(Arc::new(provider), "http://localhost/uploads");
        UploadService::new(storage, &StorageConfig::default())
    }

    fn png(name: &str) -> ImageUpload {
        ImageUpload {
            file_name: Some(name.to_string()),
            content_type: "image/png".to_string(),
            data: Bytes::from_static(PNG),
        }
    }

    #[tokio::test]
    async fn test_requires_at_least_one_photo() {
        let dir = tempfile::tempdir().unwrap();
        let err = service(dir.path()).await.validate_all(vec![]).unwrap_err();
        assert_eq!(err.message, "At least one photo is required");
    }

    #[tokio::test]
    async fn test_rejects_too_many_photos() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = (0..6).map(|i| png(&format!("{i}.png"))).collect();
        let err = service(dir.path()).await.validate_all(uploads).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_store_open_discard() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path()).await;
        let images = service.validate_all(vec![png("rex.png")]).unwrap();
        let stored = service.store_all(&images).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].url.starts_with("http://localhost/uploads/pets/"));

        let object = service.open(&stored[0].storage_key).await.unwrap();
        assert_eq!(object.content_type, "image/png");
        assert_eq!(object.size_bytes, PNG.len() as u64);

        service.discard(&stored).await;
        let err = service.open(&stored[0].storage_key).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
