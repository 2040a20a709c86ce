//! Storage provider trait for pluggable image storage backends.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// Metadata about a stored object.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StorageObjectMeta {
    /// Key within the storage provider.
    pub key: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// MIME type (if known).
    pub mime_type: Option<String>,
    /// Last modified timestamp.
    pub last_modified: Option<chrono::DateTime<chrono::Utc>>,
}

/// A byte stream type used for reading object contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Trait for object storage backends.
///
/// Implementations exist for the local filesystem and S3. Keys are
/// slash-separated relative paths such as `pets/<hash>-photo.jpg`.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "s3").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Read an object and return its byte stream.
    async fn read(&self, key: &str) -> AppResult<ByteStream>;

    /// Read an object into memory.
    async fn read_bytes(&self, key: &str) -> AppResult<Bytes>;

    /// Write bytes to the given key, replacing any existing object.
    async fn write(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<()>;

    /// Delete the object at the given key. Missing objects are not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether an object exists at the given key.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Get metadata about an object.
    async fn metadata(&self, key: &str) -> AppResult<StorageObjectMeta>;
}
