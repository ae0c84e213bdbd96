//! Tubely Core Library
//!
//! Domain models, the service-wide error taxonomy and configuration shared by the
//! other Tubely crates.

pub mod config;
pub mod error;
pub mod models;

pub use config::{BaseConfig, Config, LogFormat, PipelineConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{CreateVideoRequest, Video};
