use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An uploaded file as received from the multipart body. Lives only for the
/// duration of a request.
#[derive(Debug, Clone)]
pub struct RawFile {
    pub original_filename: String,
    pub content_type: String,
    /// Size reported for the part; falls back to the buffer length.
    pub declared_size: u64,
    pub data: Bytes,
}

impl RawFile {
    pub fn new(
        original_filename: impl Into<String>,
        content_type: impl Into<String>,
        data: Bytes,
    ) -> Self {
        RawFile {
            original_filename: original_filename.into(),
            content_type: content_type.into(),
            declared_size: data.len() as u64,
            data,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SizeReport {
    pub original: u64,
    pub optimized: u64,
    /// Percentage saved, `round((1 - optimized / original) * 100)`
    pub reduction: i64,
    pub unit: String,
}

impl SizeReport {
    pub fn new(original: u64, optimized: u64) -> Self {
        let reduction = if original == 0 {
            0
        } else {
            ((1.0 - optimized as f64 / original as f64) * 100.0).round() as i64
        };
        SizeReport {
            original,
            optimized,
            reduction,
            unit: "%".to_string(),
        }
    }
}

/// Metadata returned for every stored image.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredObjectDescriptor {
    pub url: String,
    pub key: String,
    pub size: SizeReport,
    /// Output encoding, `jpeg` or `webp`
    pub format: String,
    /// Target box of the optimization profile
    pub dimensions: Dimensions,
    /// Actual pixel size of the stored image
    pub pixel_dimensions: Dimensions,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FailedUpload {
    pub filename: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FailedDelete {
    pub key: String,
    pub error: String,
}

/// Response discriminator for batch operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Success,
    Partial,
}

/// Settled outcome of a batch: successes and per-item failures.
///
/// A batch where every item failed is never represented here; callers raise an
/// aggregate error instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome<T, F> {
    pub successful: Vec<T>,
    pub failed: Vec<F>,
}

impl<T, F> BatchOutcome<T, F> {
    pub fn status(&self) -> BatchStatus {
        if self.failed.is_empty() {
            BatchStatus::Success
        } else {
            BatchStatus::Partial
        }
    }

    pub fn len(&self) -> usize {
        self.successful.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedImage {
    pub key: String,
    pub deleted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedImages {
    pub deleted: Vec<String>,
    pub failed_deletes: Vec<FailedDelete>,
    pub deleted_at: DateTime<Utc>,
}

impl DeletedImages {
    pub fn status(&self) -> BatchStatus {
        if self.failed_deletes.is_empty() {
            BatchStatus::Success
        } else {
            BatchStatus::Partial
        }
    }
}
