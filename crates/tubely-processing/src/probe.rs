//! Stream geometry via ffprobe.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

use crate::command::{captured, media_command, validate_path};

/// Width and height of the first video stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoGeometry {
    pub width: u32,
    pub height: u32,
    pub codec_name: Option<String>,
}

/// Probe failures. Each cause is reported separately.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("invalid probe input: {0}")]
    InvalidPath(String),

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("ffprobe exited with status {status:?}: {stderr}")]
    Failed { status: Option<i32>, stderr: String },

    #[error("malformed ffprobe output: {0}")]
    Malformed(String),

    #[error("no video stream found in {0}")]
    NoVideoStream(PathBuf),
}

/// Extracts stream geometry from a local media file.
#[async_trait]
pub trait MediaProber: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<VideoGeometry, ProbeError>;
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

/// Parse `ffprobe -print_format json -show_streams` output for the first stream.
pub fn parse_probe_output(stdout: &[u8], path: &Path) -> Result<VideoGeometry, ProbeError> {
    let output: FfprobeOutput =
        serde_json::from_slice(stdout).map_err(|e| ProbeError::Malformed(e.to_string()))?;

    let stream = output
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| ProbeError::NoVideoStream(path.to_path_buf()))?;

    match (stream.width, stream.height) {
        (Some(width), Some(height)) => Ok(VideoGeometry {
            width,
            height,
            codec_name: stream.codec_name,
        }),
        _ => Err(ProbeError::Malformed(
            "video stream is missing width or height".to_string(),
        )),
    }
}

/// [`MediaProber`] backed by the ffprobe binary.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    ffprobe_path: String,
}

impl FfprobeProber {
    pub fn new(ffprobe_path: impl Into<String>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
        }
    }
}

#[async_trait]
impl MediaProber for FfprobeProber {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        path = %path.display()
    ))]
    async fn probe(&self, path: &Path) -> Result<VideoGeometry, ProbeError> {
        let start = Instant::now();
        validate_path(path).map_err(ProbeError::InvalidPath)?;

        let output = media_command(&self.ffprobe_path)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-select_streams",
                "v:0",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .await
            .map_err(|source| ProbeError::Spawn {
                program: self.ffprobe_path.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = captured(&output.stderr);
            tracing::warn!(status = ?output.status.code(), stderr = %stderr, "ffprobe failed");
            return Err(ProbeError::Failed {
                status: output.status.code(),
                stderr,
            });
        }

        let geometry = parse_probe_output(&output.stdout, path)?;

        tracing::info!(
            width = geometry.width,
            height = geometry.height,
            codec = geometry.codec_name.as_deref().unwrap_or("unknown"),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Video probe completed"
        );

        Ok(geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_first_stream() {
        let json = br#"{"streams":[{"index":0,"codec_name":"h264","codec_type":"video","width":1080,"height":1920}]}"#;
        let geometry = parse_probe_output(json, Path::new("in.mp4")).unwrap();
        assert_eq!(geometry.width, 1080);
        assert_eq!(geometry.height, 1920);
        assert_eq!(geometry.codec_name.as_deref(), Some("h264"));
    }

    #[test]
    fn test_parse_no_streams() {
        let err = parse_probe_output(br#"{"streams":[]}"#, Path::new("in.mp4")).unwrap_err();
        assert!(matches!(err, ProbeError::NoVideoStream(_)));

        let err = parse_probe_output(b"{}", Path::new("in.mp4")).unwrap_err();
        assert!(matches!(err, ProbeError::NoVideoStream(_)));
    }

    #[test]
    fn test_parse_malformed() {
        let err = parse_probe_output(b"not json", Path::new("in.mp4")).unwrap_err();
        assert!(matches!(err, ProbeError::Malformed(_)));

        let err =
            parse_probe_output(br#"{"streams":[{"codec_name":"h264"}]}"#, Path::new("in.mp4"))
                .unwrap_err();
        assert!(matches!(err, ProbeError::Malformed(_)));
    }
}
