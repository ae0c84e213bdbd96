pub mod health;
pub mod thumbnail_upload;
pub mod video_create;
pub mod video_get;
pub mod video_upload;

use crate::state::AppState;
use tubely_core::{AppError, Video};
use uuid::Uuid;

/// Fetch a record and check that `user_id` owns it.
///
/// Existence is checked first, so a missing record is `NotFound` even for a
/// caller who would not own it.
pub(crate) async fn load_owned_video(
    state: &AppState,
    video_id: Uuid,
    user_id: Uuid,
) -> Result<Video, AppError> {
    let video = state
        .videos
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

    if !video.is_owned_by(user_id) {
        tracing::debug!(video_id = %video_id, user_id = %user_id, "Caller does not own video");
        return Err(AppError::Unauthorized(
            "You are not the owner of this video".to_string(),
        ));
    }

    Ok(video)
}

/// Persist an upload's record change. A failure leaves the stored object orphaned.
pub(crate) async fn persist_after_upload(
    state: &AppState,
    video: &Video,
    orphan: &str,
) -> Result<(), AppError> {
    let start = std::time::Instant::now();
    if let Err(e) = state.videos.update_video(video).await {
        tracing::warn!(
            video_id = %video.id,
            orphaned_object = %orphan,
            error = %e,
            "Record update failed after upload, stored object is orphaned"
        );
        return Err(e);
    }
    tracing::info!(
        video_id = %video.id,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Video record updated"
    );
    Ok(())
}
