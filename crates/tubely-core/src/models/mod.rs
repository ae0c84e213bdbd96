//! Data models shared by the storage, database and API crates.

mod video;

pub use video::{CreateVideoRequest, Video};
