//! Turns stored `"<bucket>,<key>"` references into short-lived download URLs.
//!
//! The signed URL is built per response and never written back to the record store,
//! so a record keeps its durable reference and every read gets a fresh expiry.

use crate::constants::PRESIGN_EXPIRY;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tubely_core::{AppError, Video};
use tubely_storage::{ObjectRef, ObjectStorage};

#[derive(Clone)]
pub struct PresignService {
    storage: Arc<dyn ObjectStorage>,
    expiry: Duration,
}

impl PresignService {
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self {
            storage,
            expiry: PRESIGN_EXPIRY,
        }
    }

    /// Signed GET URL for one object.
    pub async fn presign(&self, reference: &ObjectRef) -> Result<String, AppError> {
        let start = Instant::now();
        let url = self
            .storage
            .presigned_get_url(reference.bucket(), reference.key(), self.expiry)
            .await
            .map_err(|e| AppError::Storage(format!("Couldn't presign video URL: {}", e)))?;

        tracing::debug!(
            bucket = %reference.bucket(),
            key = %reference.key(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Presigned video URL"
        );
        Ok(url)
    }

    /// Return `video` with its stored reference swapped for a signed URL.
    ///
    /// A record with no video attached is returned unchanged. A reference that does not
    /// decode is a server fault, since only this service writes references.
    pub async fn sign_video(&self, mut video: Video) -> Result<Video, AppError> {
        let Some(stored) = video.video_url.as_deref() else {
            return Ok(video);
        };

        let reference = ObjectRef::decode(stored).map_err(|e| {
            tracing::error!(video_id = %video.id, error = %e, "Stored video reference is malformed");
            AppError::CorruptReference(format!("video {}: {}", video.id, e))
        })?;

        video.video_url = Some(self.presign(&reference).await?);
        Ok(video)
    }

    pub async fn sign_videos(&self, videos: Vec<Video>) -> Result<Vec<Video>, AppError> {
        let mut signed = Vec::with_capacity(videos.len());
        for video in videos {
            signed.push(self.sign_video(video).await?);
        }
        Ok(signed)
    }
}
