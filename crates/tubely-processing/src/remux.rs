//! Fast-start remuxing via ffmpeg.
//!
//! The remux copies audio and video streams unchanged and moves the `moov` atom ahead of
//! the media data so playback can begin before the whole file is downloaded.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

use crate::command::{captured, media_command, validate_path};

pub const PROCESSING_SUFFIX: &str = ".processing";

#[derive(Debug, Error)]
pub enum RemuxError {
    #[error("invalid remux input: {0}")]
    InvalidPath(String),

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("ffmpeg exited with status {status:?}: {stderr}")]
    ProcessFailed { status: Option<i32>, stderr: String },

    #[error("ffmpeg produced no output at {path}: {stderr}")]
    MissingOutput { path: PathBuf, stderr: String },

    #[error("ffmpeg produced an empty file at {path}: {stderr}")]
    EmptyOutput { path: PathBuf, stderr: String },
}

/// Rewrites a local mp4 for progressive playback.
#[async_trait]
pub trait ContainerRemuxer: Send + Sync {
    /// Remux `input` into [`processing_path`]`(input)` and return that path.
    async fn remux_faststart(&self, input: &Path) -> Result<PathBuf, RemuxError>;
}

/// Sibling output path: `<input>.processing`.
pub fn processing_path(input: &Path) -> PathBuf {
    let mut path: OsString = input.as_os_str().to_owned();
    path.push(PROCESSING_SUFFIX);
    PathBuf::from(path)
}

/// [`ContainerRemuxer`] backed by the ffmpeg binary.
#[derive(Debug, Clone)]
pub struct FfmpegRemuxer {
    ffmpeg_path: String,
}

impl FfmpegRemuxer {
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    async fn check_output(output: &Path, stderr: String) -> Result<u64, RemuxError> {
        match tokio::fs::metadata(output).await {
            Ok(meta) if meta.len() > 0 => Ok(meta.len()),
            Ok(_) => Err(RemuxError::EmptyOutput {
                path: output.to_path_buf(),
                stderr,
            }),
            Err(_) => Err(RemuxError::MissingOutput {
                path: output.to_path_buf(),
                stderr,
            }),
        }
    }
}

#[async_trait]
impl ContainerRemuxer for FfmpegRemuxer {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart",
        path = %input.display()
    ))]
    async fn remux_faststart(&self, input: &Path) -> Result<PathBuf, RemuxError> {
        let start = Instant::now();
        validate_path(input).map_err(RemuxError::InvalidPath)?;
        let output_path = processing_path(input);

        let output = media_command(&self.ffmpeg_path)
            .arg("-i")
            .arg(input)
            .args(["-movflags", "faststart", "-codec", "copy", "-f", "mp4"])
            .arg(&output_path)
            .output()
            .await
            .map_err(|source| RemuxError::Spawn {
                program: self.ffmpeg_path.clone(),
                source,
            })?;

        let stderr = captured(&output.stderr);

        let result = if output.status.success() {
            Self::check_output(&output_path, stderr).await
        } else {
            Err(RemuxError::ProcessFailed {
                status: output.status.code(),
                stderr,
            })
        };

        match result {
            Ok(size) => {
                tracing::info!(
                    output = %output_path.display(),
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Fast-start remux completed"
                );
                Ok(output_path)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Fast-start remux failed");
                // Don't leave a partial file behind
                let _ = tokio::fs::remove_file(&output_path).await;
                Err(e)
            }
        }
    }
}
