//! Media ingestion
//!
//! Upload pipeline for listing photos: optimize → store → describe, for one file
//! or a batch, plus owner-scoped removal. Batches fan out with [`settle_all`] so a
//! failing item never cancels its siblings; the caller gets a [`BatchOutcome`]
//! unless every item failed.

use std::sync::Arc;

use chrono::Utc;
use realty_core::models::{
    BatchOutcome, DeletedImage, DeletedImages, Dimensions, FailedDelete, FailedUpload, RawFile,
    SizeReport, StoredObjectDescriptor,
};
use realty_core::{settle_all, AppError, ErrorMetadata};
use realty_processing::{ImageOptimizer, OptimizationProfile, OptimizedImage, ProcessingError};
use realty_storage::keys::{is_owned_by, validate_key};
use realty_storage::{PutObject, Storage, StorageError, StorageErrorKind};
use uuid::Uuid;

use crate::state::AppState;

pub(crate) fn processing_error(err: ProcessingError) -> AppError {
    AppError::ImageProcessing(err.to_string())
}

pub(crate) fn storage_error(err: StorageError) -> AppError {
    match err.kind() {
        StorageErrorKind::NotFound => AppError::NotFound(err.to_string()),
        StorageErrorKind::InvalidKey => AppError::Validation(err.to_string()),
        StorageErrorKind::Upstream => AppError::ServiceUnavailable(err.to_string()),
        StorageErrorKind::Config => AppError::Internal(err.to_string()),
    }
}

pub struct MediaIngestionService {
    storage: Arc<dyn Storage>,
    optimizer: ImageOptimizer,
    max_batch_files: usize,
}

impl MediaIngestionService {
    pub fn new(state: &AppState) -> Self {
        Self::with_parts(
            state.storage.clone(),
            state.optimizer,
            state.config.max_batch_files(),
        )
    }

    pub fn with_parts(
        storage: Arc<dyn Storage>,
        optimizer: ImageOptimizer,
        max_batch_files: usize,
    ) -> Self {
        Self {
            storage,
            optimizer,
            max_batch_files,
        }
    }

    /// Optimize and store exactly one file.
    #[tracing::instrument(skip(self, files), fields(user_id = %owner_id, profile = profile.name()))]
    pub async fn upload_one(
        &self,
        owner_id: Uuid,
        files: Vec<RawFile>,
        profile: OptimizationProfile,
    ) -> Result<StoredObjectDescriptor, AppError> {
        let mut files = files.into_iter();
        let file = match (files.next(), files.next()) {
            (Some(file), None) => file,
            _ => {
                return Err(AppError::Validation(
                    "No file uploaded. Use field name \"image\"".to_string(),
                ))
            }
        };

        let optimized = self.optimize(&file, profile).await?;
        self.store(owner_id, &file, &optimized).await
    }

    /// Optimize every file, then store the ones that optimized.
    ///
    /// The outcome accounts for every input file. An error is returned only when
    /// nothing could be stored.
    #[tracing::instrument(skip(self, files), fields(user_id = %owner_id, file_count = files.len(), profile = profile.name()))]
    pub async fn upload_many(
        &self,
        owner_id: Uuid,
        files: Vec<RawFile>,
        profile: OptimizationProfile,
    ) -> Result<BatchOutcome<StoredObjectDescriptor, FailedUpload>, AppError> {
        if files.is_empty() {
            return Err(AppError::Validation(
                "No files uploaded. Use field name \"images\"".to_string(),
            ));
        }
        if files.len() > self.max_batch_files {
            return Err(AppError::Validation(format!(
                "Too many files. Maximum {} files allowed",
                self.max_batch_files
            )));
        }

        let optimized = settle_all(files.iter().map(|file| self.optimize(file, profile))).await;

        let mut failed = Vec::new();
        let mut ready = Vec::with_capacity(files.len());
        for (file, result) in files.iter().zip(optimized) {
            match result {
                Ok(image) => ready.push((file, image)),
                Err(e) => {
                    tracing::warn!(filename = %file.original_filename, error = %e, "Image optimization failed");
                    failed.push(FailedUpload {
                        filename: file.original_filename.clone(),
                        error: e.client_message(),
                    });
                }
            }
        }

        if ready.is_empty() {
            return Err(AppError::Validation("All files failed processing".to_string()));
        }

        let stored = settle_all(
            ready
                .iter()
                .map(|(file, image)| self.store(owner_id, file, image)),
        )
        .await;

        let mut successful = Vec::with_capacity(ready.len());
        for ((file, _), result) in ready.iter().zip(stored) {
            match result {
                Ok(descriptor) => successful.push(descriptor),
                Err(e) => failed.push(FailedUpload {
                    filename: file.original_filename.clone(),
                    error: e.client_message(),
                }),
            }
        }

        if successful.is_empty() {
            return Err(AppError::ServiceUnavailable(
                "All files failed to upload".to_string(),
            ));
        }

        tracing::info!(
            successful = successful.len(),
            failed = failed.len(),
            "Batch upload settled"
        );

        Ok(BatchOutcome { successful, failed })
    }

    /// Reject keys outside the caller's `uploads/{owner_id}/` namespace.
    pub fn check_ownership(&self, owner_id: Uuid, key: &str) -> Result<(), AppError> {
        if key.trim().is_empty() {
            return Err(AppError::Validation("Image key is required".to_string()));
        }
        if !is_owned_by(key, owner_id) {
            tracing::warn!(user_id = %owner_id, key = %key, "Rejected access to foreign image key");
            return Err(AppError::Forbidden(
                "Unauthorized to access this resource".to_string(),
            ));
        }
        // Inside the caller's namespace a key can still escape it through `..`.
        validate_key(key).map_err(storage_error)
    }

    #[tracing::instrument(skip(self), fields(user_id = %owner_id))]
    pub async fn remove_one(&self, owner_id: Uuid, key: &str) -> Result<DeletedImage, AppError> {
        self.check_ownership(owner_id, key)?;
        self.storage.delete(key).await.map_err(storage_error)?;

        Ok(DeletedImage {
            key: key.to_string(),
            deleted_at: Utc::now(),
        })
    }

    /// Delete a set of keys. Ownership of every key is verified before anything
    /// is deleted.
    #[tracing::instrument(skip(self, keys), fields(user_id = %owner_id, key_count = keys.len()))]
    pub async fn remove_many(
        &self,
        owner_id: Uuid,
        keys: Vec<String>,
    ) -> Result<DeletedImages, AppError> {
        if keys.is_empty() {
            return Err(AppError::Validation(
                "At least one image key is required".to_string(),
            ));
        }
        for key in &keys {
            self.check_ownership(owner_id, key)?;
        }

        let results = settle_all(keys.iter().map(|key| self.storage.delete(key))).await;

        let mut deleted = Vec::with_capacity(keys.len());
        let mut failures = Vec::new();
        for (key, result) in keys.into_iter().zip(results) {
            match result {
                Ok(()) => deleted.push(key),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Image delete failed");
                    failures.push((key, e));
                }
            }
        }

        if deleted.is_empty() {
            let all_missing = failures
                .iter()
                .all(|(_, e)| e.kind() == StorageErrorKind::NotFound);
            return Err(if all_missing {
                AppError::NotFound("None of the requested images were found".to_string())
            } else {
                AppError::ServiceUnavailable("Failed to delete all images".to_string())
            });
        }

        Ok(DeletedImages {
            deleted,
            failed_deletes: failures
                .into_iter()
                .map(|(key, e)| FailedDelete {
                    key,
                    error: e.to_string(),
                })
                .collect(),
            deleted_at: Utc::now(),
        })
    }

    async fn optimize(
        &self,
        file: &RawFile,
        profile: OptimizationProfile,
    ) -> Result<OptimizedImage, AppError> {
        let optimizer = self.optimizer;
        let data = file.data.clone();
        tokio::task::spawn_blocking(move || optimizer.optimize(&data, profile))
            .await
            .map_err(|e| AppError::Internal(format!("Failed to process image: {}", e)))?
            .map_err(processing_error)
    }

    async fn store(
        &self,
        owner_id: Uuid,
        file: &RawFile,
        image: &OptimizedImage,
    ) -> Result<StoredObjectDescriptor, AppError> {
        let settings = image.profile.settings();
        let stored = self
            .storage
            .put(
                owner_id,
                PutObject {
                    original_filename: file.original_filename.clone(),
                    content_type: image.content_type().to_string(),
                    data: image.data.clone(),
                },
            )
            .await
            .map_err(|e| {
                tracing::error!(filename = %file.original_filename, error = %e, "Failed to store image");
                storage_error(e)
            })?;

        Ok(StoredObjectDescriptor {
            url: stored.url,
            key: stored.key,
            size: SizeReport::new(file.declared_size, stored.size_bytes),
            format: image.encoding.as_str().to_string(),
            dimensions: Dimensions {
                width: settings.width,
                height: settings.height,
            },
            pixel_dimensions: Dimensions {
                width: image.width,
                height: image.height,
            },
            last_modified: stored.stored_at,
        })
    }
}
