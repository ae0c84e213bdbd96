//! Tubely Database Layer
//!
//! The video record store: a [`VideoRepository`] trait for handlers and tests, and its
//! Postgres implementation.

pub mod db;
pub mod repository;

pub use db::PgVideoRepository;
pub use repository::VideoRepository;
