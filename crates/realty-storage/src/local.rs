use crate::keys::{generate_upload_key, validate_key};
use crate::traits::{PutObject, Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Local filesystem storage implementation. Object metadata is not persisted.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/realty/media")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:3000/media")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Resolve a storage key below `base_path`, rejecting traversal.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        validate_key(storage_key)?;
        if storage_key.contains('\\') {
            return Err(StorageError::InvalidKey {
                key: storage_key.to_string(),
                reason: "key contains a backslash".to_string(),
            });
        }

        let path = self.base_path.join(storage_key);
        if !path.starts_with(&self.base_path) {
            return Err(StorageError::InvalidKey {
                key: storage_key.to_string(),
                reason: "key resolves outside storage directory".to_string(),
            });
        }
        Ok(path)
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    async fn ensure_parent_dir(&self, key: &str, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::upstream(key, "Upload", e))?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(&self, owner_id: Uuid, object: PutObject) -> StorageResult<StoredObject> {
        let stored_at = Utc::now();
        let key = generate_upload_key(owner_id, &object.original_filename, stored_at.timestamp_millis());
        let path = self.key_to_path(&key)?;
        let size = object.data.len() as u64;

        self.ensure_parent_dir(&key, &path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| StorageError::upstream(&key, "Upload", e))?;
        file.write_all(&object.data)
            .await
            .map_err(|e| StorageError::upstream(&key, "Upload", e))?;
        file.sync_all()
            .await
            .map_err(|e| StorageError::upstream(&key, "Upload", e))?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local upload successful"
        );

        Ok(StoredObject {
            url: self.generate_url(&key),
            key,
            content_type: object.content_type,
            size_bytes: size,
            stored_at,
        })
    }

    async fn remove(&self, storage_key: &str) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(key = %storage_key, "Local delete successful");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound {
                key: storage_key.to_string(),
            }),
            Err(e) => {
                tracing::error!(error = %e, key = %storage_key, "Local delete failed");
                Err(StorageError::upstream(storage_key, "Delete", e))
            }
        }
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;
        fs::try_exists(&path)
            .await
            .map_err(|e| StorageError::upstream(storage_key, "Existence check", e))
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Bytes> {
        let path = self.key_to_path(storage_key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound {
                key: storage_key.to_string(),
            }),
            Err(e) => Err(StorageError::upstream(storage_key, "Download", e)),
        }
    }

    fn public_url(&self, key: &str) -> String {
        self.generate_url(key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
