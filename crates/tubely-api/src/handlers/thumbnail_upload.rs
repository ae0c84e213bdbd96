use crate::auth::AuthUser;
use crate::constants::THUMBNAIL_FIELD;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::{load_owned_video, persist_after_upload};
use crate::state::AppState;
use crate::utils::upload::{allowed_media_type, parse_video_id, read_named_file};
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::sync::Arc;
use tubely_core::Video;
use tubely_storage::{generate_asset_key, AssetMediaType};

const THUMBNAIL_TYPES: [AssetMediaType; 2] = [AssetMediaType::Jpeg, AssetMediaType::Png];

#[utoipa::path(
    post,
    path = "/api/thumbnail_upload/{videoID}",
    tag = "videos",
    params(("videoID" = String, Path, description = "Video ID (UUID)")),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Thumbnail stored", body = Video),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
)]
#[tracing::instrument(
    skip(state, multipart),
    fields(user_id = %auth.user_id, video_id = %video_id, operation = "upload_thumbnail")
)]
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(video_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<Video>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;

    let file = read_named_file(&mut multipart, THUMBNAIL_FIELD).await?;
    let media_type = allowed_media_type(&file.content_type, &THUMBNAIL_TYPES)?;

    let mut video = load_owned_video(&state, video_id, auth.user_id).await?;

    let key = generate_asset_key(media_type);
    let url = state.assets.put(&key, &file.data).await?;

    video.set_thumbnail_url(url);
    persist_after_upload(&state, &video, &key).await?;

    tracing::info!(
        key = %key,
        size_bytes = file.data.len(),
        content_type = %media_type,
        "Thumbnail uploaded"
    );

    Ok(Json(state.presigner.sign_video(video).await?))
}
