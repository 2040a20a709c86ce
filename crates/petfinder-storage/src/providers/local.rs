//! Local filesystem storage provider.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::debug;

use petfinder_core::error::{AppError, ErrorKind};
use petfinder_core::result::AppResult;
use petfinder_core::traits::storage::{ByteStream, StorageObjectMeta, StorageProvider};

use crate::upload::content_type_for_key;

/// Local filesystem storage provider.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    /// Root directory for all stored objects.
    root: PathBuf,
}

impl LocalStorageProvider {
    /// Create a new local storage provider rooted at the given path.
    pub async fn new(root_path: impl AsRef<Path>) -> AppResult<Self> {
        let root = root_path.as_ref().to_path_buf();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a key to a path inside the root.
    ///
    /// Keys come from request paths, so anything that could climb out of
    /// the root is treated as a missing object.
    fn resolve(&self, key: &str) -> AppResult<PathBuf> {
        let relative = Path::new(key.trim_start_matches('/'));
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if key.is_empty() || !safe {
            return Err(AppError::not_found(format!("Object not found: {key}")));
        }
        Ok(self.root.join(relative))
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

fn read_error(key: &str, e: std::io::Error) -> AppError {
    if e.kind() == std::io::ErrorKind::NotFound {
        AppError::not_found(format!("Object not found: {key}"))
    } else {
        AppError::with_source(ErrorKind::Storage, format!("Failed to read object: {key}"), e)
    }
}

#[async_trait]
impl StorageProvider for LocalStorageProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn read(&self, key: &str) -> AppResult<ByteStream> {
        let full_path = self.resolve(key)?;
        let file = fs::File::open(&full_path)
            .await
            .map_err(|e| read_error(key, e))?;
        Ok(Box::pin(ReaderStream::new(file)))
    }

    async fn read_bytes(&self, key: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(key)?;
        let data = fs::read(&full_path).await.map_err(|e| read_error(key, e))?;
        Ok(Bytes::from(data))
    }

    async fn write(&self, key: &str, data: Bytes, _content_type: &str) -> AppResult<()> {
        let full_path = self.resolve(key)?;
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write object: {key}"),
                e,
            )
        })?;

        debug!(key, bytes = data.len(), "Wrote object");
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let full_path = self.resolve(key)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete object: {key}"),
                e,
            )),
        }
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let Ok(full_path) = self.resolve(key) else {
            return Ok(false);
        };
        Ok(fs::metadata(&full_path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false))
    }

    async fn metadata(&self, key: &str) -> AppResult<StorageObjectMeta> {
        let full_path = self.resolve(key)?;
        let meta = fs::metadata(&full_path)
            .await
            .map_err(|e| read_error(key, e))?;
        if !meta.is_file() {
            return Err(AppError::not_found(format!("Object not found: {key}")));
        }
        Ok(StorageObjectMeta {
            key: key.to_string(),
            size_bytes: meta.len(),
            mime_type: Some(content_type_for_key(key).to_string()),
            last_modified: meta.modified().ok().map(chrono::DateTime::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::TryStreamExt;
    use petfinder_core::error::ErrorKind;

    use super::*;

    #[tokio::test]
    async fn test_write_read_delete() {
        let dir = tempfile::tempdir().unwrap();
        let provider = LocalStorageProvider::new(dir.path()).await.unwrap();

        provider
            .write("pets/abc-rex.png", Bytes::from_static(b"png"), "image/png")
            .await
            .unwrap();
        assert!(provider.exists("pets/abc-rex.png").await.unwrap());
        assert_eq!(
            provider.read_bytes("pets/abc-rex.png").await.unwrap(),
            Bytes::from_static(b"png")
        );

        let chunks: Vec<Bytes> = provider
            .read("pets/abc-rex.png")
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(chunks.concat(), b"png".to_vec());

        let meta = provider.metadata("pets/abc-rex.png").await.unwrap();
        assert_eq!(meta.size_bytes, 3);
        assert_eq!(meta.mime_type.as_deref(), Some("image/png"));

        provider.delete("pets/abc-rex.png").await.unwrap();
        assert!(!provider.exists("pets/abc-rex.png").await.unwrap());
        provider.delete("pets/abc-rex.png").await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_object_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let provider = LocalStorageProvider::new(dir.path()).await.unwrap();
        let err = provider.read_bytes("pets/nope.png").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("root");
        let provider = LocalStorageProvider::new(&root).await.unwrap();
        std::fs::write(dir.path().join("secret.txt"), b"x").unwrap();

        let err = provider.read_bytes("../secret.txt").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(!provider.exists("pets/../../secret.txt").await.unwrap());
    }
}
