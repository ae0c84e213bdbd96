//! Tubely Processing Library
//!
//! Local media handling for the video upload path:
//!
//! - [`probe`]: stream geometry via ffprobe
//! - [`aspect`]: orientation buckets from width/height
//! - [`remux`]: fast-start remux via ffmpeg
//! - [`staging`]: request-scoped temporary files
//!
//! The ffprobe and ffmpeg wrappers sit behind [`MediaProber`] and [`ContainerRemuxer`]
//! so another implementation can be swapped in without touching the upload handler.

mod command;

pub mod aspect;
pub mod probe;
pub mod remux;
pub mod staging;

pub use aspect::{AspectError, Orientation};
pub use probe::{FfprobeProber, MediaProber, ProbeError, VideoGeometry};
pub use remux::{processing_path, ContainerRemuxer, FfmpegRemuxer, RemuxError};
pub use staging::{ScratchFile, StagedUpload, StagingError};
