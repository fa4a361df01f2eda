//! Realty Storage Library
//!
//! Object store gateway for listing photos: the [`Storage`] trait plus S3 and
//! local filesystem backends.
//!
//! # Storage key format
//!
//! `uploads/{owner_id}/{unix_millis}_{sanitized_base}{ext}`
//!
//! Keys must not contain `.`/`..` segments or a leading `/`. Key generation and
//! ownership checks live in [`keys`] so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use realty_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{PutObject, Storage, StorageError, StorageErrorKind, StorageResult, StoredObject};
