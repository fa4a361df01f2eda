//! Common utilities for image upload handlers

use axum::extract::Multipart;
use realty_core::models::RawFile;
use realty_core::AppError;

/// Per-file limits applied while reading the multipart body.
#[derive(Debug, Clone)]
pub struct UploadLimits<'a> {
    pub max_file_size: usize,
    pub allowed_content_types: &'a [String],
}

/// Collect every file part named `field_name`. Other parts are ignored, so a
/// request using the wrong field name yields an empty list.
pub async fn extract_multipart_files(
    mut multipart: Multipart,
    field_name: &str,
    limits: &UploadLimits<'_>,
) -> Result<Vec<RawFile>, AppError> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read multipart: {}", e)))?
    {
        if field.name() != Some(field_name) {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        validate_content_type(&content_type, limits.allowed_content_types)?;

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read file data: {}", e)))?;

        validate_file_size(data.len(), limits.max_file_size)?;

        files.push(RawFile::new(filename, content_type, data));
    }

    Ok(files)
}

pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::Validation(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// Normalize MIME type by stripping parameters (e.g. "image/jpeg; q=1" -> "image/jpeg").
fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}

pub fn validate_content_type(content_type: &str, allowed_types: &[String]) -> Result<(), AppError> {
    let normalized = normalize_mime_type(content_type).to_lowercase();
    if !allowed_types.iter().any(|ct| normalized == ct.to_lowercase()) {
        return Err(AppError::Validation(format!(
            "Invalid file type. Allowed types: {}",
            allowed_types.join(", ")
        )));
    }
    Ok(())
}
