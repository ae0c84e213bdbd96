//! Tubely Storage Library
//!
//! Storage for uploaded media:
//!
//! - videos go to a bucketed object store ([`ObjectStorage`], backed by [`S3Storage`])
//!   and are referenced by a composite [`ObjectRef`] (`"<bucket>,<key>"`);
//! - thumbnails go to public local storage ([`LocalAssetStorage`]).
//!
//! Asset keys are generated centrally in the `keys` module and never contain `,`,
//! `..` or a leading `/`.

pub mod keys;
pub mod local;
pub mod reference;
pub mod s3;
pub mod traits;

pub use keys::{
    generate_asset_key, generate_prefixed_asset_key, AssetMediaType, UnsupportedMediaType,
};
pub use local::LocalAssetStorage;
pub use reference::{ObjectRef, ReferenceError, REFERENCE_DELIMITER};
pub use s3::S3Storage;
pub use traits::{ObjectStorage, StorageError, StorageResult};
