//! In-memory collaborators for the upload pipeline.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tubely_core::{AppError, Video};
use tubely_db::VideoRepository;
use tubely_processing::{
    processing_path, ContainerRemuxer, MediaProber, ProbeError, RemuxError, VideoGeometry,
};
use tubely_storage::{ObjectStorage, StorageError, StorageResult};
use uuid::Uuid;

// ----- Record store -----

#[derive(Default)]
pub struct InMemoryVideoRepository {
    videos: Mutex<HashMap<Uuid, Video>>,
    pub updates: AtomicUsize,
    pub fail_updates: AtomicBool,
}

impl InMemoryVideoRepository {
    pub fn insert(&self, video: Video) {
        self.videos.lock().unwrap().insert(video.id, video);
    }

    pub fn get(&self, id: Uuid) -> Option<Video> {
        self.videos.lock().unwrap().get(&id).cloned()
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.get(id))
    }

    async fn update_video(&self, video: &Video) -> Result<(), AppError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Internal("record store unavailable".to_string()));
        }
        let mut videos = self.videos.lock().unwrap();
        match videos.get_mut(&video.id) {
            Some(existing) => {
                *existing = video.clone();
                self.updates.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            None => Err(AppError::NotFound("Couldn't find video".to_string())),
        }
    }

    async fn create_video(
        &self,
        user_id: Uuid,
        title: &str,
        description: &str,
    ) -> Result<Video, AppError> {
        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            user_id,
            title: title.to_string(),
            description: description.to_string(),
            thumbnail_url: None,
            video_url: None,
            created_at: now,
            updated_at: now,
        };
        self.insert(video.clone());
        Ok(video)
    }

    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<Video>, AppError> {
        let mut videos: Vec<Video> = self
            .videos
            .lock()
            .unwrap()
            .values()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect();
        videos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(videos)
    }
}

// ----- Object store -----

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Default)]
pub struct MemoryObjectStorage {
    objects: Mutex<Vec<StoredObject>>,
    pub fail_puts: AtomicBool,
}

impl MemoryObjectStorage {
    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn put_file(
        &self,
        bucket: &str,
        key: &str,
        source: &Path,
        content_type: &str,
    ) -> StorageResult<u64> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("connection reset".to_string()));
        }
        let data = tokio::fs::read(source).await?;
        let size = data.len() as u64;
        self.objects.lock().unwrap().push(StoredObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
            content_type: content_type.to_string(),
            data,
        });
        Ok(size)
    }

    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        Ok(format!(
            "https://{}.s3.test/{}?X-Amz-Expires={}&X-Amz-Signature={}",
            bucket,
            key,
            expires_in.as_secs(),
            Uuid::new_v4().simple()
        ))
    }
}

// ----- Media tools -----

pub enum ProbeOutcome {
    Geometry(u32, u32),
    NoVideoStream,
    Failed(&'static str),
}

/// Records what it was asked to probe and answers with a fixed outcome.
pub struct FakeProber {
    outcome: Mutex<ProbeOutcome>,
    /// (path, bytes on disk at probe time)
    pub probed: Mutex<Vec<(PathBuf, Vec<u8>)>>,
}

impl FakeProber {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            outcome: Mutex::new(ProbeOutcome::Geometry(width, height)),
            probed: Mutex::new(Vec::new()),
        }
    }

    pub fn set_outcome(&self, outcome: ProbeOutcome) {
        *self.outcome.lock().unwrap() = outcome;
    }

    pub fn probe_count(&self) -> usize {
        self.probed.lock().unwrap().len()
    }
}

#[async_trait]
impl MediaProber for FakeProber {
    async fn probe(&self, path: &Path) -> Result<VideoGeometry, ProbeError> {
        let bytes = tokio::fs::read(path).await.unwrap_or_default();
        self.probed.lock().unwrap().push((path.to_path_buf(), bytes));

        match *self.outcome.lock().unwrap() {
            ProbeOutcome::Geometry(width, height) => Ok(VideoGeometry {
                width,
                height,
                codec_name: Some("h264".to_string()),
            }),
            ProbeOutcome::NoVideoStream => Err(ProbeError::NoVideoStream(path.to_path_buf())),
            ProbeOutcome::Failed(stderr) => Err(ProbeError::Failed {
                status: Some(1),
                stderr: stderr.to_string(),
            }),
        }
    }
}

/// Writes `FASTSTART` followed by the input bytes to the `.processing` sibling.
#[derive(Default)]
pub struct FakeRemuxer {
    pub fail: AtomicBool,
    pub outputs: Mutex<Vec<PathBuf>>,
}

pub const FASTSTART_MARKER: &[u8] = b"FASTSTART";

#[async_trait]
impl ContainerRemuxer for FakeRemuxer {
    async fn remux_faststart(&self, input: &Path) -> Result<PathBuf, RemuxError> {
        let output = processing_path(input);
        self.outputs.lock().unwrap().push(output.clone());

        if self.fail.load(Ordering::SeqCst) {
            // Leave a partial file behind, as a crashed ffmpeg would.
            let _ = tokio::fs::write(&output, b"partial").await;
            return Err(RemuxError::ProcessFailed {
                status: Some(1),
                stderr: "moov atom not found".to_string(),
            });
        }

        let mut data = FASTSTART_MARKER.to_vec();
        data.extend(tokio::fs::read(input).await.map_err(|e| RemuxError::Spawn {
            program: "fake-remuxer".to_string(),
            source: e,
        })?);
        tokio::fs::write(&output, data)
            .await
            .map_err(|e| RemuxError::Spawn {
                program: "fake-remuxer".to_string(),
                source: e,
            })?;
        Ok(output)
    }
}
