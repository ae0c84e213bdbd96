//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::PgVideoRepository;
use tubely_processing::{FfmpegRemuxer, FfprobeProber};

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_format())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = if config.is_production() { "production" } else { "development" },
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let (object_storage, assets) = storage::setup_storage(&config).await?;

    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(PgVideoRepository::new(pool)),
        assets,
        object_storage,
        Arc::new(FfprobeProber::new(config.ffprobe_path())),
        Arc::new(FfmpegRemuxer::new(config.ffmpeg_path())),
    ));

    let router = routes::setup_routes(state.clone());

    Ok((state, router))
}
