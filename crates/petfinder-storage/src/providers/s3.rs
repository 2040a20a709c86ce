//! S3-compatible object storage provider.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream as S3Body;
use bytes::Bytes;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use petfinder_core::config::storage::S3StorageConfig;
use petfinder_core::error::AppError;
use petfinder_core::result::AppResult;
use petfinder_core::traits::storage::{ByteStream, StorageObjectMeta, StorageProvider};

/// S3-compatible storage provider (AWS, MinIO, Supabase storage, ...).
#[derive(Debug, Clone)]
pub struct S3StorageProvider {
    client: Client,
    bucket: String,
}

impl S3StorageProvider {
    /// Create a provider from configuration.
    ///
    /// Explicit keys take precedence; otherwise the default AWS credential
    /// chain (environment, profile, instance role) is used.
    pub async fn new(config: &S3StorageConfig) -> AppResult<Self> {
        if config.bucket.is_empty() {
            return Err(AppError::configuration("storage.s3.bucket is required"));
        }
        info!(
            endpoint = %config.endpoint,
            region = %config.region,
            bucket = %config.bucket,
            "Initializing S3 storage provider"
        );

        let region = Region::new(config.region.clone());
        let mut builder = if config.access_key.is_empty() {
            let shared = aws_config::defaults(BehaviorVersion::latest())
                .region(region)
                .load()
                .await;
            aws_sdk_s3::config::Builder::from(&shared)
        } else {
            let credentials = Credentials::new(
                config.access_key.clone(),
                config.secret_key.clone(),
                None,
                None,
                "petfinder-config",
            );
            aws_sdk_s3::config::Builder::new()
                .behavior_version(BehaviorVersion::latest())
                .region(region)
                .credentials_provider(credentials)
        };
        if !config.endpoint.is_empty() {
            builder = builder.endpoint_url(config.endpoint.clone());
        }
        builder = builder.force_path_style(config.force_path_style);

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
        })
    }

    fn sdk_err(action: &str, key: &str, e: impl std::error::Error) -> AppError {
        AppError::storage(format!(
            "S3 {action} failed for '{key}': {}",
            DisplayErrorContext(e)
        ))
    }
}

#[async_trait]
impl StorageProvider for S3StorageProvider {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn health_check(&self) -> AppResult<bool> {
        match self.client.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => Ok(true),
            Err(e) => {
                debug!(bucket = %self.bucket, error = %DisplayErrorContext(&e), "S3 health check failed");
                Ok(false)
            }
        }
    }

    async fn read(&self, key: &str) -> AppResult<ByteStream> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|s| s.is_no_such_key()) {
                    AppError::not_found(format!("Object not found: {key}"))
                } else {
                    Self::sdk_err("get", key, e)
                }
            })?;
        Ok(Box::pin(ReaderStream::new(output.body.into_async_read())))
    }

    async fn read_bytes(&self, key: &str) -> AppResult<Bytes> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|s| s.is_no_such_key()) {
                    AppError::not_found(format!("Object not found: {key}"))
                } else {
                    Self::sdk_err("get", key, e)
                }
            })?;
        let data = output
            .body
            .collect()
            .await
            .map_err(|e| Self::sdk_err("read body", key, e))?;
        Ok(data.into_bytes())
    }

    async fn write(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<()> {
        let size = data.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(S3Body::from(data))
            .send()
            .await
            .map_err(|e| Self::sdk_err("put", key, e))?;
        debug!(key, bytes = size, "Uploaded object to S3");
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Self::sdk_err("delete", key, e))?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().is_some_and(|s| s.is_not_found()) => Ok(false),
            Err(e) => Err(Self::sdk_err("head", key, e)),
        }
    }

    async fn metadata(&self, key: &str) -> AppResult<StorageObjectMeta> {
        let head = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|s| s.is_not_found()) {
                    AppError::not_found(format!("Object not found: {key}"))
                } else {
                    Self::sdk_err("head", key, e)
                }
            })?;

        Ok(StorageObjectMeta {
            key: key.to_string(),
            size_bytes: head.content_length().unwrap_or(0).max(0) as u64,
            mime_type: head.content_type().map(str::to_string),
            last_modified: head
                .last_modified()
                .and_then(|t| chrono::DateTime::from_timestamp(t.secs(), t.subsec_nanos())),
        })
    }
}
