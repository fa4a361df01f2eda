use crate::keys::{generate_upload_key, validate_key};
use crate::traits::{PutObject, Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, AttributeValue, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
};
use std::sync::Arc;
use uuid::Uuid;

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // S3-compatible providers (MinIO, Spaces)
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region
    /// * `endpoint_url` - Optional custom endpoint, e.g. "http://localhost:9000" for MinIO
    pub fn new(bucket: String, region: String, endpoint_url: Option<String>) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(Self::with_store(Arc::new(store), bucket, region, endpoint_url))
    }

    /// Wrap an arbitrary object store, e.g. `object_store::memory::InMemory` in tests.
    pub fn with_store(
        store: Arc<dyn ObjectStore>,
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> Self {
        S3Storage {
            store,
            bucket,
            region,
            endpoint_url,
        }
    }

    /// `https://{bucket}.s3.{region}.amazonaws.com/{key}`, or path-style
    /// `{endpoint}/{bucket}/{key}` for custom endpoints.
    fn generate_url(&self, key: &str) -> String {
        if let Some(ref endpoint) = self.endpoint_url {
            let base_url = endpoint.trim_end_matches('/');
            format!("{}/{}/{}", base_url, self.bucket, key)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            )
        }
    }

    fn attributes(owner_id: Uuid, object: &PutObject) -> Attributes {
        let mut attributes = Attributes::new();
        attributes.insert(
            Attribute::ContentType,
            AttributeValue::from(object.content_type.clone()),
        );
        for (name, value) in object.metadata(owner_id) {
            attributes.insert(Attribute::Metadata(name.into()), AttributeValue::from(value));
        }
        attributes
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn put(&self, owner_id: Uuid, object: PutObject) -> StorageResult<StoredObject> {
        let stored_at = Utc::now();
        let key = generate_upload_key(owner_id, &object.original_filename, stored_at.timestamp_millis());
        let size = object.data.len() as u64;
        let location = Path::from(key.clone());
        let opts = PutOptions {
            attributes: Self::attributes(owner_id, &object),
            ..Default::default()
        };

        let start = std::time::Instant::now();

        self.store
            .put_opts(&location, PutPayload::from(object.data.clone()), opts)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                StorageError::upstream(&key, "Upload", e)
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
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
        validate_key(storage_key)?;
        let start = std::time::Instant::now();
        let location = Path::from(storage_key.to_string());

        self.store.delete(&location).await.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 delete failed"
            );
            StorageError::upstream(storage_key, "Delete", e)
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        validate_key(storage_key)?;
        let location = Path::from(storage_key.to_string());
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    "S3 existence check failed"
                );
                Err(StorageError::upstream(storage_key, "Existence check", e))
            }
        }
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Bytes> {
        validate_key(storage_key)?;
        let start = std::time::Instant::now();
        let location = Path::from(storage_key.to_string());

        let result = self.store.get(&location).await.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound {
                key: storage_key.to_string(),
            },
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %self.bucket,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 download failed"
                );
                StorageError::upstream(storage_key, "Download", other)
            }
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StorageError::upstream(storage_key, "Download", e))?;

        tracing::debug!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = bytes.len() as u64,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 download successful"
        );

        Ok(bytes)
    }

    fn public_url(&self, key: &str) -> String {
        self.generate_url(key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::StorageErrorKind;
    use object_store::memory::InMemory;

    fn storage_with(store: Arc<InMemory>) -> S3Storage {
        S3Storage::with_store(store, "listings".to_string(), "ap-southeast-2".to_string(), None)
    }

    fn photo(name: &str) -> PutObject {
        PutObject {
            original_filename: name.to_string(),
            content_type: "image/jpeg".to_string(),
            data: Bytes::from_static(b"\xFF\xD8\xFFjpeg-bytes"),
        }
    }

    #[test]
    fn test_generate_url() {
        let aws = storage_with(Arc::new(InMemory::new()));
        assert_eq!(
            aws.generate_url("uploads/u/1_a.jpg"),
            "https://listings.s3.ap-southeast-2.amazonaws.com/uploads/u/1_a.jpg"
        );

        let minio = S3Storage::with_store(
            Arc::new(InMemory::new()),
            "listings".to_string(),
            "us-east-1".to_string(),
            Some("http://localhost:9000/".to_string()),
        );
        assert_eq!(
            minio.public_url("uploads/u/1_a.jpg"),
            "http://localhost:9000/listings/uploads/u/1_a.jpg"
        );
    }

    #[tokio::test]
    async fn test_put_stores_bytes_and_metadata() {
        let memory = Arc::new(InMemory::new());
        let storage = storage_with(memory.clone());
        let owner = Uuid::new_v4();

        let stored = storage.put(owner, photo("Kitchen View.PNG")).await.unwrap();

        assert!(stored.key.starts_with(&format!("uploads/{}/", owner)));
        assert!(stored.key.ends_with("_Kitchen_View.png"));
        assert_eq!(stored.size_bytes, 14);
        assert_eq!(stored.url, storage.public_url(&stored.key));

        let result = memory.get(&Path::from(stored.key.clone())).await.unwrap();
        let attributes = result.attributes.clone();
        assert_eq!(
            attributes.get(&Attribute::ContentType).map(|v| v.as_ref()),
            Some("image/jpeg")
        );
        assert_eq!(
            attributes
                .get(&Attribute::Metadata("originalName".into()))
                .map(|v| v.as_ref()),
            Some("Kitchen%20View.PNG")
        );
        assert_eq!(
            attributes
                .get(&Attribute::Metadata("processed".into()))
                .map(|v| v.as_ref()),
            Some("true")
        );
        assert_eq!(result.bytes().await.unwrap().len(), 14);
    }

    #[tokio::test]
    async fn test_delete_missing_object_is_not_found() {
        let storage = storage_with(Arc::new(InMemory::new()));
        let err = storage.delete("uploads/nobody/1_gone.jpg").await.unwrap_err();
        assert_eq!(err.kind(), StorageErrorKind::NotFound);
        assert_eq!(err.key(), Some("uploads/nobody/1_gone.jpg"));
    }

    #[tokio::test]
    async fn test_delete_existing_object() {
        let storage = storage_with(Arc::new(InMemory::new()));
        let stored = storage.put(Uuid::new_v4(), photo("a.jpg")).await.unwrap();

        assert!(storage.exists(&stored.key).await.unwrap());
        storage.delete(&stored.key).await.unwrap();
        assert!(!storage.exists(&stored.key).await.unwrap());
    }

    #[tokio::test]
    async fn test_download_round_trip_and_invalid_key() {
        let storage = storage_with(Arc::new(InMemory::new()));
        let stored = storage.put(Uuid::new_v4(), photo("a.jpg")).await.unwrap();
        let bytes = storage.download(&stored.key).await.unwrap();
        assert_eq!(&bytes[..], b"\xFF\xD8\xFFjpeg-bytes");

        let err = storage.download("uploads/../secret").await.unwrap_err();
        assert_eq!(err.kind(), StorageErrorKind::InvalidKey);
    }
}
