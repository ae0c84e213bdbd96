//! Aspect-ratio classification used to namespace stored video keys.

use std::fmt::{Display, Formatter, Result as FmtResult};
use thiserror::Error;

pub const PORTRAIT_RATIO: f64 = 9.0 / 16.0;
pub const LANDSCAPE_RATIO: f64 = 16.0 / 9.0;
/// Absolute tolerance around each reference ratio, inclusive on both ends.
pub const RATIO_TOLERANCE: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AspectError {
    #[error("video height is zero, cannot determine aspect ratio (width {width})")]
    ZeroHeight { width: u32 },
}

/// Coarse orientation bucket. Only ever used as an object key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Portrait,
    Landscape,
    Other,
}

impl Orientation {
    /// Classify a frame size. Portrait is checked first.
    pub fn classify(width: u32, height: u32) -> Result<Self, AspectError> {
        if height == 0 {
            return Err(AspectError::ZeroHeight { width });
        }
        let ratio = f64::from(width) / f64::from(height);
        Ok(Self::from_ratio(ratio))
    }

    pub fn from_ratio(ratio: f64) -> Self {
        if (ratio - PORTRAIT_RATIO).abs() <= RATIO_TOLERANCE {
            Orientation::Portrait
        } else if (ratio - LANDSCAPE_RATIO).abs() <= RATIO_TOLERANCE {
            Orientation::Landscape
        } else {
            Orientation::Other
        }
    }

    /// Key prefix for this bucket.
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
            Orientation::Other => "other",
        }
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
