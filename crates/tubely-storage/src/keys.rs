//! Asset key generation.
//!
//! Key format: `<random-id>.<extension>`, optionally prefixed by a single path segment
//! (e.g. `portrait/<random-id>.mp4`). The random part is a v4 UUID in simple form, so a
//! key never contains the `,` used by composite references or any path separator.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported media type: {0}")]
pub struct UnsupportedMediaType(pub String);

/// Media types the service accepts for stored assets.
///
/// Parsing is the only way to obtain one, so an unvalidated MIME string can never
/// reach [`generate_asset_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetMediaType {
    Jpeg,
    Png,
    Mp4,
}

impl AssetMediaType {
    pub fn mime(&self) -> &'static str {
        match self {
            AssetMediaType::Jpeg => "image/jpeg",
            AssetMediaType::Png => "image/png",
            AssetMediaType::Mp4 => "video/mp4",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            AssetMediaType::Jpeg => "jpg",
            AssetMediaType::Png => "png",
            AssetMediaType::Mp4 => "mp4",
        }
    }
}

impl FromStr for AssetMediaType {
    type Err = UnsupportedMediaType;

    /// Matches the MIME essence exactly; parameters must already be stripped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image/jpeg" => Ok(AssetMediaType::Jpeg),
            "image/png" => Ok(AssetMediaType::Png),
            "video/mp4" => Ok(AssetMediaType::Mp4),
            other => Err(UnsupportedMediaType(other.to_string())),
        }
    }
}

impl Display for AssetMediaType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.mime())
    }
}

/// Generate a fresh `<random-id>.<extension>` key.
pub fn generate_asset_key(media_type: AssetMediaType) -> String {
    format!("{}.{}", Uuid::new_v4().simple(), media_type.extension())
}

/// Generate a fresh key under a single-segment prefix: `<prefix>/<random-id>.<extension>`.
pub fn generate_prefixed_asset_key(prefix: &str, media_type: AssetMediaType) -> String {
    format!("{}/{}", prefix, generate_asset_key(media_type))
}
