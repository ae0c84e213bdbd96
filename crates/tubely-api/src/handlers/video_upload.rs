use crate::auth::AuthUser;
use crate::constants::VIDEO_FIELD;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::{load_owned_video, persist_after_upload};
use crate::state::AppState;
use crate::utils::upload::{
    allowed_media_type, declared_essence, missing_field, multipart_error, parse_video_id,
};
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::sync::Arc;
use std::time::Instant;
use tubely_core::{AppError, Video};
use tubely_processing::{processing_path, Orientation, ScratchFile, StagedUpload};
use tubely_storage::{generate_prefixed_asset_key, AssetMediaType, ObjectRef};

#[utoipa::path(
    post,
    path = "/api/video_upload/{videoID}",
    tag = "videos",
    params(("videoID" = String, Path, description = "Video ID (UUID)")),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video stored; video_url is presigned", body = Video),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "Declared Content-Length over the transport cap"),
        (status = 500, description = "Probe, remux, upload or persist failure", body = ErrorResponse)
    ),
)]
#[tracing::instrument(
    skip(state, multipart),
    fields(user_id = %auth.user_id, video_id = %video_id, operation = "upload_video")
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(video_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<Video>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;

    // Ownership is settled before any of the body is read.
    let mut video = load_owned_video(&state, video_id, auth.user_id).await?;

    let staged = stage_video(&mut multipart, &state).await?;

    let geometry = state.prober.probe(staged.path()).await?;
    let orientation = Orientation::classify(geometry.width, geometry.height)?;
    let key = generate_prefixed_asset_key(orientation.as_str(), AssetMediaType::Mp4);

    tracing::debug!(
        width = geometry.width,
        height = geometry.height,
        orientation = %orientation,
        key = %key,
        "Video classified"
    );

    // Removed on every exit path, including when the remuxer fails midway.
    let processed = ScratchFile::new(processing_path(staged.path()));
    let remuxed = state.remuxer.remux_faststart(staged.path()).await?;
    let remuxed_guard =
        (remuxed.as_path() != processed.path()).then(|| ScratchFile::new(remuxed.clone()));

    let bucket = state.config.s3_bucket();
    let start = Instant::now();
    let size = state
        .object_storage
        .put_file(bucket, &key, &remuxed, AssetMediaType::Mp4.mime())
        .await?;
    tracing::info!(
        bucket = %bucket,
        key = %key,
        size_bytes = size,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Video object uploaded"
    );

    let reference = ObjectRef::new(bucket, key.as_str())?;
    video.set_video_reference(reference.encode());
    persist_after_upload(&state, &video, &reference.encode()).await?;

    // Local files go before the response is built.
    drop(remuxed_guard);
    drop(processed);
    drop(staged);

    Ok(Json(state.presigner.sign_video(video).await?))
}

/// Stream the `video` field to a staged temp file after checking its declared type.
async fn stage_video(
    multipart: &mut Multipart,
    state: &AppState,
) -> Result<StagedUpload, HttpAppError> {
    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        let essence = declared_essence(&field)?;
        allowed_media_type(&essence, &[AssetMediaType::Mp4])?;

        let dir = state.config.upload_temp_dir().map(|p| p.as_path());
        let mut staged = StagedUpload::create(dir, ".mp4")?;
        let start = Instant::now();

        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            staged.write_chunk(&chunk).await?;
        }
        staged.finish().await?;

        if staged.size() == 0 {
            return Err(AppError::InvalidInput("Uploaded video is empty".to_string()).into());
        }

        tracing::debug!(
            path = %staged.path().display(),
            size_bytes = staged.size(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Video staged"
        );
        return Ok(staged);
    }

    Err(missing_field(VIDEO_FIELD).into())
}
