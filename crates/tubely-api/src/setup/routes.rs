//! Route configuration and setup

use crate::api_doc::get_openapi_spec;
use crate::auth::middleware::auth_middleware;
use crate::constants::{API_BASE, THUMBNAIL_MAX_BYTES, VIDEO_MAX_BYTES};
use crate::handlers;
use crate::middleware::request_id_middleware;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Router {
    let assets = ServeDir::new(state.assets.base_path());

    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .nest_service("/assets", assets)
        // Transport-level cap; the per-route limits below are tighter where needed
        .layer(RequestBodyLimitLayer::new(VIDEO_MAX_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Public routes (no authentication required)
fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            &format!("{}/openapi.json", API_BASE),
            get(|| async { Json(get_openapi_spec()) }),
        )
}

/// Routes behind bearer authentication
fn protected_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/thumbnail_upload/{{videoID}}", API_BASE),
            post(handlers::thumbnail_upload::upload_thumbnail)
                .layer(DefaultBodyLimit::max(THUMBNAIL_MAX_BYTES)),
        )
        .route(
            &format!("{}/video_upload/{{videoID}}", API_BASE),
            post(handlers::video_upload::upload_video).layer(DefaultBodyLimit::disable()),
        )
        .route(
            &format!("{}/videos", API_BASE),
            post(handlers::video_create::create_video).get(handlers::video_get::list_videos),
        )
        .route(
            &format!("{}/videos/{{videoID}}", API_BASE),
            get(handlers::video_get::get_video),
        )
        .route_layer(axum::middleware::from_fn_with_state(state, auth_middleware))
}
