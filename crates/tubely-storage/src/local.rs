use crate::traits::{StorageError, StorageResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Public asset storage on the local filesystem.
///
/// Thumbnails are written under `base_path` and served from `base_url`.
#[derive(Clone, Debug)]
pub struct LocalAssetStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalAssetStorage {
    /// Create a new LocalAssetStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for assets (e.g., "./assets")
    /// * `base_url` - Base URL the directory is served from (e.g., "http://localhost:8091/assets")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create assets directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalAssetStorage {
            base_path,
            base_url,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert an asset key to a filesystem path under `base_path`.
    ///
    /// Rejects keys that could escape the assets directory.
    pub fn asset_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') || key.contains('\\') {
            return Err(StorageError::InvalidKey(
                "Asset key contains invalid characters".to_string(),
            ));
        }
        Ok(self.base_path.join(key))
    }

    /// Public URL for an asset key.
    pub fn asset_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    /// Write `data` under `key` and return its public URL.
    pub async fn put(&self, key: &str, data: &[u8]) -> StorageResult<String> {
        let path = self.asset_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            tracing::error!(error = %e, path = %path.display(), "Failed to create asset file");
            StorageError::UploadFailed(format!("Failed to create file: {}", e))
        })?;
        file.write_all(data).await.map_err(|e| {
            tracing::error!(error = %e, path = %path.display(), "Failed to write asset file");
            StorageError::UploadFailed(format!("Failed to write file: {}", e))
        })?;
        file.sync_all().await?;

        tracing::info!(
            key = %key,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Asset stored"
        );

        Ok(self.asset_url(key))
    }
}
