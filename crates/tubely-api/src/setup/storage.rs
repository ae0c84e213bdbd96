//! Storage setup

use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_storage::{LocalAssetStorage, ObjectStorage, S3Storage};

/// Build the private video object store and the public thumbnail store.
pub async fn setup_storage(
    config: &Config,
) -> Result<(Arc<dyn ObjectStorage>, LocalAssetStorage)> {
    let object_storage: Arc<dyn ObjectStorage> = Arc::new(S3Storage::new(
        config.s3_region().to_string(),
        config.s3_endpoint().map(String::from),
    ));
    tracing::info!(
        bucket = %config.s3_bucket(),
        region = %config.s3_region(),
        endpoint = ?config.s3_endpoint(),
        "S3 storage configured"
    );

    let assets = LocalAssetStorage::new(
        config.assets_root().clone(),
        config.assets_base_url().to_string(),
    )
    .await
    .context("Failed to initialize local asset storage")?;
    tracing::info!(
        root = %config.assets_root().display(),
        base_url = %config.assets_base_url(),
        "Local asset storage configured"
    );

    if let Some(dir) = config.upload_temp_dir() {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create upload temp dir {}", dir.display()))?;
    }

    Ok((object_storage, assets))
}
