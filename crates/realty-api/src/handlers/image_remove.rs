use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use realty_core::models::{BatchStatus, DeletedImage, FailedDelete};
use realty_core::AppError;
use serde::Serialize;
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

use crate::auth::models::CallerContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::MediaIngestionService;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct RemoveImageResponse {
    pub status: BatchStatus,
    pub message: String,
    pub data: DeletedImage,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoveImagesData {
    pub deleted_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_deletes: Option<Vec<FailedDelete>>,
    pub deleted_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RemoveImagesResponse {
    pub status: BatchStatus,
    pub message: String,
    pub data: RemoveImagesData,
}

/// The body is read by hand so a missing or mistyped field gets its own message
/// rather than a generic deserialization error.
fn parse_body(body: &Bytes) -> Result<JsonValue, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(JsonValue::Null);
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Invalid request body: {}", e)))
}

fn key_from_body(body: &JsonValue) -> Result<String, AppError> {
    body.get("key")
        .and_then(JsonValue::as_str)
        .map(str::to_string)
        .ok_or_else(|| AppError::Validation("Image key is required in request body".to_string()))
}

fn keys_from_body(body: &JsonValue) -> Result<Vec<String>, AppError> {
    let keys = match body.get("keys") {
        None | Some(JsonValue::Null) => {
            return Err(AppError::Validation(
                "Image keys array is required in request body".to_string(),
            ))
        }
        Some(JsonValue::Array(keys)) => keys,
        Some(_) => {
            return Err(AppError::Validation(
                "Keys must be provided as an array".to_string(),
            ))
        }
    };

    keys.iter()
        .map(|key| {
            key.as_str()
                .map(str::to_string)
                .ok_or_else(|| AppError::Validation("Each image key must be a string".to_string()))
        })
        .collect()
}

/// Delete one of the caller's images
#[utoipa::path(
    delete,
    path = "/remove-image",
    tag = "images",
    request_body(content = inline(Object), content_type = "application/json", description = "`{\"key\": \"uploads/{userId}/...\"}`"),
    responses(
        (status = 200, description = "Image deleted", body = RemoveImageResponse),
        (status = 400, description = "Missing or malformed key", body = ErrorResponse),
        (status = 401, description = "Authentication failed", body = ErrorResponse),
        (status = 403, description = "Key belongs to another user", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse),
        (status = 502, description = "Object store unavailable", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, body), fields(user_id = %caller.user_id, operation = "remove_image"))]
pub async fn remove_image(
    State(state): State<Arc<AppState>>,
    caller: CallerContext,
    body: Bytes,
) -> Result<Response, HttpAppError> {
    let key = key_from_body(&parse_body(&body)?)?;

    let deleted = MediaIngestionService::new(&state)
        .remove_one(caller.user_id, &key)
        .await?;

    Ok(Json(RemoveImageResponse {
        status: BatchStatus::Success,
        message: "Image successfully deleted".to_string(),
        data: deleted,
    })
    .into_response())
}

/// Delete several of the caller's images
///
/// Every key is checked for ownership before anything is deleted. Responds 207
/// when some deletes failed.
#[utoipa::path(
    delete,
    path = "/remove-images",
    tag = "images",
    request_body(content = inline(Object), content_type = "application/json", description = "`{\"keys\": [\"uploads/{userId}/...\"]}`"),
    responses(
        (status = 200, description = "Every image deleted", body = RemoveImagesResponse),
        (status = 207, description = "Some deletes failed", body = RemoveImagesResponse),
        (status = 400, description = "Missing or malformed keys", body = ErrorResponse),
        (status = 401, description = "Authentication failed", body = ErrorResponse),
        (status = 403, description = "A key belongs to another user", body = ErrorResponse),
        (status = 404, description = "None of the images exist", body = ErrorResponse),
        (status = 502, description = "Object store unavailable", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, body), fields(user_id = %caller.user_id, operation = "remove_images"))]
pub async fn remove_images(
    State(state): State<Arc<AppState>>,
    caller: CallerContext,
    body: Bytes,
) -> Result<Response, HttpAppError> {
    let keys = keys_from_body(&parse_body(&body)?)?;

    let result = MediaIngestionService::new(&state)
        .remove_many(caller.user_id, keys)
        .await?;

    let status = result.status();
    let deleted_count = result.deleted.len();
    let (code, message, data) = match status {
        BatchStatus::Success => (
            StatusCode::OK,
            "All images were successfully deleted",
            RemoveImagesData {
                deleted_count,
                failed_count: None,
                failed_deletes: None,
                deleted_at: result.deleted_at,
            },
        ),
        BatchStatus::Partial => (
            StatusCode::MULTI_STATUS,
            "Some images were deleted successfully",
            RemoveImagesData {
                deleted_count,
                failed_count: Some(result.failed_deletes.len()),
                failed_deletes: Some(result.failed_deletes),
                deleted_at: result.deleted_at,
            },
        ),
    };

    Ok((
        code,
        Json(RemoveImagesResponse {
            status,
            message: message.to_string(),
            data,
        }),
    )
        .into_response())
}
