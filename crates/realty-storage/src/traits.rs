//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::keys;
use crate::StorageBackend;

/// Coarse classification of a [`StorageError`], used by batch callers to decide
/// how a set of per-key failures should be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    NotFound,
    InvalidKey,
    /// Transport or provider failure; the caller may retry
    Upstream,
    Config,
}

/// Storage operation errors. Every per-object variant carries the offending key.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {key}")]
    NotFound { key: String },

    #[error("Invalid storage key {key}: {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("{operation} failed for {key}: {message}")]
    Upstream {
        key: String,
        operation: &'static str,
        message: String,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    pub(crate) fn upstream(key: &str, operation: &'static str, message: impl ToString) -> Self {
        StorageError::Upstream {
            key: key.to_string(),
            operation,
            message: message.to_string(),
        }
    }

    pub fn kind(&self) -> StorageErrorKind {
        match self {
            StorageError::NotFound { .. } => StorageErrorKind::NotFound,
            StorageError::InvalidKey { .. } => StorageErrorKind::InvalidKey,
            StorageError::Upstream { .. } => StorageErrorKind::Upstream,
            StorageError::ConfigError(_) => StorageErrorKind::Config,
        }
    }

    /// The storage key this error is attributed to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            StorageError::NotFound { key }
            | StorageError::InvalidKey { key, .. }
            | StorageError::Upstream { key, .. } => Some(key),
            StorageError::ConfigError(_) => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == StorageErrorKind::Upstream
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// An already-optimized object handed to [`Storage::put`].
#[derive(Debug, Clone)]
pub struct PutObject {
    pub original_filename: String,
    pub content_type: String,
    pub data: Bytes,
}

impl PutObject {
    /// User metadata attached to every upload.
    pub fn metadata(&self, owner_id: Uuid) -> Vec<(&'static str, String)> {
        vec![
            (
                "originalName",
                keys::encode_uri_component(&self.original_filename),
            ),
            ("uploadedBy", owner_id.to_string()),
            ("processed", "true".to_string()),
        ]
    }
}

/// Descriptor of a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub stored_at: DateTime<Utc>,
}

/// Storage abstraction trait
///
/// Backends only move bytes; they never resize or re-encode. Keys follow
/// `uploads/{owner_id}/{unix_millis}_{sanitized_base}{ext}` (see [`crate::keys`]).
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `object` under a fresh key in the owner's namespace.
    async fn put(&self, owner_id: Uuid, object: PutObject) -> StorageResult<StoredObject>;

    /// Remove the object at `key`. Existence is checked first so that a missing
    /// object surfaces as [`StorageError::NotFound`] rather than a silent no-op.
    async fn delete(&self, key: &str) -> StorageResult<()> {
        if !self.exists(key).await? {
            return Err(StorageError::NotFound {
                key: key.to_string(),
            });
        }
        self.remove(key).await
    }

    /// Unconditionally remove the object at `key`.
    async fn remove(&self, key: &str) -> StorageResult<()>;

    async fn exists(&self, key: &str) -> StorageResult<bool>;

    async fn download(&self, key: &str) -> StorageResult<Bytes>;

    /// Public URL under which `key` is served.
    fn public_url(&self, key: &str) -> String;

    fn backend_type(&self) -> StorageBackend;
}
