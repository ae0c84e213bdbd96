//! Composite object references.
//!
//! A stored video points at its object as `"<bucket>,<key>"`. The string is private to
//! the service: it is always resolved to a presigned URL before leaving the API.

use std::fmt::{Display, Formatter, Result as FmtResult};
use thiserror::Error;

pub const REFERENCE_DELIMITER: char = ',';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("reference has no ',' delimiter")]
    MissingDelimiter,

    #[error("reference has an empty bucket or key")]
    EmptyPart,

    #[error("reference has more than two ',' separated parts")]
    ExtraDelimiter,
}

/// A `(bucket, key)` pair that is guaranteed to round-trip through its encoded form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    bucket: String,
    key: String,
}

impl ObjectRef {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Result<Self, ReferenceError> {
        let bucket = bucket.into();
        let key = key.into();
        if bucket.is_empty() || key.is_empty() {
            return Err(ReferenceError::EmptyPart);
        }
        if bucket.contains(REFERENCE_DELIMITER) || key.contains(REFERENCE_DELIMITER) {
            return Err(ReferenceError::ExtraDelimiter);
        }
        Ok(ObjectRef { bucket, key })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn encode(&self) -> String {
        format!("{}{}{}", self.bucket, REFERENCE_DELIMITER, self.key)
    }

    /// Split on the first delimiter; both halves must be non-empty and the key must not
    /// contain a second delimiter.
    pub fn decode(encoded: &str) -> Result<Self, ReferenceError> {
        let (bucket, key) = encoded
            .split_once(REFERENCE_DELIMITER)
            .ok_or(ReferenceError::MissingDelimiter)?;
        if bucket.is_empty() || key.is_empty() {
            return Err(ReferenceError::EmptyPart);
        }
        if key.contains(REFERENCE_DELIMITER) {
            return Err(ReferenceError::ExtraDelimiter);
        }
        Ok(ObjectRef {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }
}

impl Display for ObjectRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}{}{}", self.bucket, REFERENCE_DELIMITER, self.key)
    }
}
