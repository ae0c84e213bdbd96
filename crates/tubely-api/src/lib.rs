//! Tubely API Library
//!
//! HTTP handlers, auth, and application setup for the upload pipeline.

mod api_doc;
pub mod constants;
mod handlers;
mod middleware;
mod telemetry;
mod utils;

pub mod auth;
pub mod error;
pub mod services;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use services::PresignService;
pub use state::AppState;
