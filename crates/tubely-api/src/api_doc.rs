//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use tubely_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tubely API",
        version = "0.1.0",
        description = "Video hosting API. Thumbnails are stored as public assets; videos are remuxed for fast start, stored in S3 and served through short-lived presigned URLs."
    ),
    paths(
        handlers::thumbnail_upload::upload_thumbnail,
        handlers::video_upload::upload_video,
        handlers::video_create::create_video,
        handlers::video_get::get_video,
        handlers::video_get::list_videos,
        handlers::health::health_check,
    ),
    components(schemas(
        models::Video,
        models::CreateVideoRequest,
        error::ErrorResponse,
        handlers::health::HealthResponse,
    )),
    tags(
        (name = "videos", description = "Video records and uploads"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
