//! Repository trait abstraction
//!
//! Handlers depend on [`VideoRepository`] rather than a concrete pool, so the upload path
//! can be exercised without a database.

use async_trait::async_trait;
use tubely_core::{AppError, Video};
use uuid::Uuid;

#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Fetch a video by ID
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// Persist the mutable fields of an existing video.
    ///
    /// Returns `AppError::NotFound` if the record no longer exists.
    async fn update_video(&self, video: &Video) -> Result<(), AppError>;

    /// Create a draft video with no thumbnail or media attached
    async fn create_video(
        &self,
        user_id: Uuid,
        title: &str,
        description: &str,
    ) -> Result<Video, AppError>;

    /// All videos owned by a user, newest first
    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<Video>, AppError>;
}
