//! Test helpers: build AppState and router for integration tests.
//!
//! The record store, object store and media tools are in-memory fakes, so these tests
//! need neither Postgres, S3 nor ffmpeg.

#![allow(dead_code)]

pub mod auth;
pub mod fakes;

use axum_test::TestServer;
use chrono::Utc;
use fakes::{FakeProber, FakeRemuxer, InMemoryVideoRepository, MemoryObjectStorage};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tubely_api::setup::routes;
use tubely_api::AppState;
use tubely_core::{Config, PipelineConfig, Video};
use tubely_storage::LocalAssetStorage;
use uuid::Uuid;

pub const TEST_BUCKET: &str = "tubely-test-videos";
pub const ASSETS_BASE_URL: &str = "http://localhost:8091/assets";

/// Test application: server, fakes and owned temp directories.
pub struct TestApp {
    pub server: TestServer,
    pub videos: Arc<InMemoryVideoRepository>,
    pub objects: Arc<MemoryObjectStorage>,
    pub prober: Arc<FakeProber>,
    pub remuxer: Arc<FakeRemuxer>,
    pub assets_dir: TempDir,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Insert a draft video owned by `owner`.
    pub fn seed_video(&self, owner: Uuid) -> Video {
        let created = Utc::now() - chrono::Duration::minutes(5);
        let video = Video {
            id: Uuid::new_v4(),
            user_id: owner,
            title: "Boots demo".to_string(),
            description: "A short clip".to_string(),
            thumbnail_url: None,
            video_url: None,
            created_at: created,
            updated_at: created,
        };
        self.videos.insert(video.clone());
        video
    }

    pub fn upload_dir_entries(&self) -> Vec<String> {
        dir_entries(self.upload_dir.path())
    }

    pub fn asset_entries(&self) -> Vec<String> {
        dir_entries(self.assets_dir.path())
    }
}

pub fn dir_entries(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .expect("Failed to read dir")
        .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect()
}

pub fn test_config(assets_dir: &Path, upload_dir: &Path) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("DATABASE_URL", "postgres://unused/tubely".to_string()),
        ("JWT_SECRET", auth::TEST_JWT_SECRET.to_string()),
        ("S3_BUCKET", TEST_BUCKET.to_string()),
        ("ASSETS_ROOT", assets_dir.display().to_string()),
        ("ASSETS_BASE_URL", ASSETS_BASE_URL.to_string()),
        ("UPLOAD_TEMP_DIR", upload_dir.display().to_string()),
    ]);
    let config = PipelineConfig::from_lookup(|key| vars.get(key).cloned())
        .expect("Failed to build test config");
    config.validate().expect("Test config must be valid");
    Config::new(config)
}

/// Build the full router over in-memory collaborators.
pub async fn setup_test_app() -> TestApp {
    let assets_dir = TempDir::new().expect("Failed to create assets dir");
    let upload_dir = TempDir::new().expect("Failed to create upload dir");
    let config = test_config(assets_dir.path(), upload_dir.path());

    let videos = Arc::new(InMemoryVideoRepository::default());
    let objects = Arc::new(MemoryObjectStorage::default());
    let prober = Arc::new(FakeProber::new(1920, 1080));
    let remuxer = Arc::new(FakeRemuxer::default());

    let assets = LocalAssetStorage::new(assets_dir.path(), ASSETS_BASE_URL.to_string())
        .await
        .expect("Failed to create asset storage");

    let state = Arc::new(AppState::new(
        config,
        videos.clone(),
        assets,
        objects.clone(),
        prober.clone(),
        remuxer.clone(),
    ));

    let app = routes::setup_routes(state);
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        videos,
        objects,
        prober,
        remuxer,
        assets_dir,
        upload_dir,
    }
}
