use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::load_owned_video;
use crate::state::AppState;
use crate::utils::upload::parse_video_id;
use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tubely_core::Video;

#[utoipa::path(
    get,
    path = "/api/videos/{videoID}",
    tag = "videos",
    params(("videoID" = String, Path, description = "Video ID (UUID)")),
    responses(
        (status = 200, description = "Video found; video_url is presigned", body = Video),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
)]
#[tracing::instrument(
    skip(state),
    fields(user_id = %auth.user_id, video_id = %video_id, operation = "get_video")
)]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(video_id): Path<String>,
) -> Result<Json<Video>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let video = load_owned_video(&state, video_id, auth.user_id).await?;
    Ok(Json(state.presigner.sign_video(video).await?))
}

#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "videos",
    responses(
        (status = 200, description = "The caller's videos, newest first", body = Vec<Video>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
)]
#[tracing::instrument(skip(state), fields(user_id = %auth.user_id, operation = "list_videos"))]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<Vec<Video>>, HttpAppError> {
    let videos = state.videos.list_videos_for_user(auth.user_id).await?;
    Ok(Json(state.presigner.sign_videos(videos).await?))
}
