use crate::traits::{ObjectStorage, StorageError, StorageResult};
use async_trait::async_trait;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path as ObjectPath;
use object_store::signer::Signer;
use object_store::{
    Attribute, AttributeValue, Attributes, ObjectStore, PutMultipartOptions, WriteMultipart,
};
use std::collections::HashMap;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio::sync::RwLock;

/// Size of each chunk read from disk and handed to the multipart writer.
const UPLOAD_CHUNK_BYTES: usize = 8 * 1024 * 1024;
/// Parts allowed in flight before the writer applies backpressure.
const MAX_IN_FLIGHT_PARTS: usize = 4;

/// S3 object storage.
///
/// The bucket is chosen per call, so one client is built lazily per bucket and cached.
pub struct S3Storage {
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
    clients: RwLock<HashMap<String, AmazonS3>>,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub fn new(region: String, endpoint_url: Option<String>) -> Self {
        S3Storage {
            region,
            endpoint_url,
            clients: RwLock::new(HashMap::new()),
        }
    }

    fn build_client(&self, bucket: &str) -> StorageResult<AmazonS3> {
        // Credentials come from the standard AWS_* environment variables.
        let mut builder = AmazonS3Builder::from_env()
            .with_region(self.region.clone())
            .with_bucket_name(bucket.to_string());

        if let Some(ref endpoint) = self.endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))
    }

    async fn client(&self, bucket: &str) -> StorageResult<AmazonS3> {
        if let Some(client) = self.clients.read().await.get(bucket) {
            return Ok(client.clone());
        }

        let mut clients = self.clients.write().await;
        if let Some(client) = clients.get(bucket) {
            return Ok(client.clone());
        }
        let client = self.build_client(bucket)?;
        clients.insert(bucket.to_string(), client.clone());
        tracing::debug!(bucket = %bucket, region = %self.region, "S3 client created");
        Ok(client)
    }

    async fn stream_file(
        store: &AmazonS3,
        location: &ObjectPath,
        source: &Path,
        content_type: &str,
    ) -> StorageResult<u64> {
        let mut file = File::open(source).await?;

        let mut attributes = Attributes::new();
        attributes.insert(
            Attribute::ContentType,
            AttributeValue::from(content_type.to_string()),
        );
        let opts = PutMultipartOptions {
            attributes,
            ..Default::default()
        };

        let upload = store
            .put_multipart_opts(location, opts)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        let mut writer = WriteMultipart::new(upload);

        let mut buf = vec![0u8; UPLOAD_CHUNK_BYTES];
        let mut total: u64 = 0;
        loop {
            let n = match file.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    let _ = writer.abort().await;
                    return Err(StorageError::IoError(e));
                }
            };
            if let Err(e) = writer.wait_for_capacity(MAX_IN_FLIGHT_PARTS).await {
                let _ = writer.abort().await;
                return Err(StorageError::UploadFailed(e.to_string()));
            }
            writer.write(&buf[..n]);
            total += n as u64;
        }

        writer
            .finish()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        Ok(total)
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put_file(
        &self,
        bucket: &str,
        key: &str,
        source: &Path,
        content_type: &str,
    ) -> StorageResult<u64> {
        let store = self.client(bucket).await?;
        let location = ObjectPath::from(key);
        let start = Instant::now();

        let size = Self::stream_file(&store, &location, source, content_type)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                e
            })?;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(size)
    }

    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let store = self.client(bucket).await?;
        let location = ObjectPath::from(key);

        let url = store
            .signed_url(Method::GET, &location, expires_in)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, bucket = %bucket, key = %key, "S3 presign failed");
                StorageError::PresignFailed(e.to_string())
            })?;

        tracing::debug!(
            bucket = %bucket,
            key = %key,
            expires_in_secs = expires_in.as_secs(),
            "Presigned URL generated"
        );

        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> S3Storage {
        std::env::set_var("AWS_ACCESS_KEY_ID", "test-access-key");
        std::env::set_var("AWS_SECRET_ACCESS_KEY", "test-secret-key");
        S3Storage::new(
            "us-east-1".to_string(),
            Some("http://localhost:9000".to_string()),
        )
    }

    #[tokio::test]
    async fn test_presigned_url_embeds_bucket_and_key() {
        let storage = storage();
        let url = storage
            .presigned_get_url("tubely-videos", "landscape/abc.mp4", Duration::from_secs(600))
            .await
            .unwrap();
        assert!(url.starts_with("http://localhost:9000/tubely-videos/landscape/abc.mp4?"));
        assert!(url.contains("X-Amz-Expires=600"));
        assert!(url.contains("X-Amz-Signature="));
    }

    #[tokio::test]
    async fn test_clients_are_cached_per_bucket() {
        let storage = storage();
        storage.client("one").await.unwrap();
        storage.client("two").await.unwrap();
        storage.client("one").await.unwrap();
        assert_eq!(storage.clients.read().await.len(), 2);
    }
}
