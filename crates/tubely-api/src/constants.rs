//! API constants

use std::time::Duration;

/// API base path prefix
pub const API_BASE: &str = "/api";

/// In-memory cap for thumbnail uploads (10 MiB)
pub const THUMBNAIL_MAX_BYTES: usize = 10 << 20;

/// Transport-level cap for video uploads (10 GiB)
pub const VIDEO_MAX_BYTES: usize = 10 << 30;

/// Lifetime of presigned video URLs
pub const PRESIGN_EXPIRY: Duration = Duration::from_secs(10 * 60);

/// Multipart field carrying a thumbnail image
pub const THUMBNAIL_FIELD: &str = "thumbnail";

/// Multipart field carrying a video file
pub const VIDEO_FIELD: &str = "video";
