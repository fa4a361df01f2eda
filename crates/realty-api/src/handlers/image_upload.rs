use std::sync::Arc;

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use realty_core::models::{BatchStatus, FailedUpload, StoredObjectDescriptor};
use realty_processing::OptimizationProfile;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::models::CallerContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::MediaIngestionService;
use crate::state::AppState;
use crate::utils::upload::{extract_multipart_files, UploadLimits};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProfileQuery {
    /// `thumbnail`, `standard`, `highQuality` or `webp`; anything else means `standard`
    pub profile: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadImageResponse {
    pub status: BatchStatus,
    pub data: StoredObjectDescriptor,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadImagesData {
    pub successful: Vec<StoredObjectDescriptor>,
    pub failed: Vec<FailedUpload>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadImagesResponse {
    pub status: BatchStatus,
    pub data: UploadImagesData,
}

fn limits(state: &AppState) -> UploadLimits<'_> {
    UploadLimits {
        max_file_size: state.config.max_file_size_bytes(),
        allowed_content_types: state.config.allowed_content_types(),
    }
}

/// Optimize and store a single listing photo
#[utoipa::path(
    post,
    path = "/upload-image",
    tag = "images",
    params(ProfileQuery),
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "One file in field `image`"),
    responses(
        (status = 200, description = "Image uploaded", body = UploadImageResponse),
        (status = 400, description = "Missing, invalid or undecodable file", body = ErrorResponse),
        (status = 401, description = "Authentication failed", body = ErrorResponse),
        (status = 502, description = "Object store unavailable", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, multipart),
    fields(user_id = %caller.user_id, profile = ?query.profile, operation = "upload_image")
)]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    caller: CallerContext,
    Query(query): Query<ProfileQuery>,
    multipart: Multipart,
) -> Result<Response, HttpAppError> {
    let files = extract_multipart_files(multipart, "image", &limits(&state)).await?;
    let profile = OptimizationProfile::from_name(query.profile.as_deref());

    let descriptor = MediaIngestionService::new(&state)
        .upload_one(caller.user_id, files, profile)
        .await?;

    Ok(Json(UploadImageResponse {
        status: BatchStatus::Success,
        data: descriptor,
    })
    .into_response())
}

/// Optimize and store up to five listing photos
///
/// Responds 207 when only some of the files made it.
#[utoipa::path(
    post,
    path = "/upload-images",
    tag = "images",
    params(ProfileQuery),
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Files in field `images`"),
    responses(
        (status = 200, description = "Every image uploaded", body = UploadImagesResponse),
        (status = 207, description = "Some images failed", body = UploadImagesResponse),
        (status = 400, description = "No files, too many files, or none could be processed", body = ErrorResponse),
        (status = 401, description = "Authentication failed", body = ErrorResponse),
        (status = 502, description = "Object store unavailable", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, multipart),
    fields(user_id = %caller.user_id, profile = ?query.profile, operation = "upload_images")
)]
pub async fn upload_images(
    State(state): State<Arc<AppState>>,
    caller: CallerContext,
    Query(query): Query<ProfileQuery>,
    multipart: Multipart,
) -> Result<Response, HttpAppError> {
    let files = extract_multipart_files(multipart, "images", &limits(&state)).await?;
    let profile = OptimizationProfile::from_name(query.profile.as_deref());

    let outcome = MediaIngestionService::new(&state)
        .upload_many(caller.user_id, files, profile)
        .await?;

    let status = outcome.status();
    let code = match status {
        BatchStatus::Success => StatusCode::OK,
        BatchStatus::Partial => StatusCode::MULTI_STATUS,
    };

    let body = UploadImagesResponse {
        status,
        data: UploadImagesData {
            successful: outcome.successful,
            failed: outcome.failed,
        },
    };

    Ok((code, Json(body)).into_response())
}
