//! Common utilities for the upload handlers

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::Bytes;
use mime::Mime;
use tubely_core::AppError;
use tubely_storage::AssetMediaType;
use uuid::Uuid;

/// Parse the `{videoID}` path segment.
pub fn parse_video_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidInput("Invalid ID".to_string()))
}

/// Map a multipart framing error. A body over the route limit is a bad request too.
pub fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::InvalidInput(format!("Upload exceeds size limit: {}", err.body_text()))
    } else {
        AppError::InvalidInput(format!("Unable to parse form file: {}", err.body_text()))
    }
}

/// Media type of a part, without parameters. Missing or unparseable → `InvalidInput`.
pub fn declared_essence(field: &Field<'_>) -> Result<String, AppError> {
    let raw = field
        .content_type()
        .ok_or_else(|| AppError::InvalidInput("Missing Content-Type for file".to_string()))?;
    let parsed: Mime = raw
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("Invalid Content-Type: {}", raw)))?;
    Ok(parsed.essence_str().to_ascii_lowercase())
}

/// Resolve a declared content type against an allow-list of asset media types.
pub fn allowed_media_type(
    essence: &str,
    allowed: &[AssetMediaType],
) -> Result<AssetMediaType, AppError> {
    let invalid = || AppError::InvalidInput(format!("Invalid file type: {}", essence));
    let media_type: AssetMediaType = essence.parse().map_err(|_| invalid())?;
    if allowed.contains(&media_type) {
        Ok(media_type)
    } else {
        Err(invalid())
    }
}

/// A file part buffered in memory.
pub struct BufferedFile {
    /// Declared media type without parameters
    pub content_type: String,
    pub data: Bytes,
}

/// Buffer the first field named `name`, skipping anything else in the form.
///
/// Only used under the small thumbnail body limit. A missing or unparseable content
/// type is rejected before the part body is read.
pub async fn read_named_file(
    multipart: &mut Multipart,
    name: &str,
) -> Result<BufferedFile, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(name) {
            continue;
        }
        let content_type = declared_essence(&field)?;
        let data = field.bytes().await.map_err(multipart_error)?;
        return Ok(BufferedFile { content_type, data });
    }
    Err(missing_field(name))
}

pub fn missing_field(name: &str) -> AppError {
    AppError::InvalidInput(format!("Missing form file field '{}'", name))
}
