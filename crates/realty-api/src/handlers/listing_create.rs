use std::sync::Arc;

use axum::{extract::State, Json};
use realty_core::models::{CreateListingRequest, ListingSummary};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::models::CallerContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::services::ListingIngestionService;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateListingResponse {
    pub success: bool,
    pub ad: ListingSummary,
}

/// Create a listing
///
/// Geocodes the address, derives the slug and marks the caller as a seller.
#[utoipa::path(
    post,
    path = "/create-ad",
    tag = "listings",
    request_body = CreateListingRequest,
    responses(
        (status = 200, description = "Listing created", body = CreateListingResponse),
        (status = 400, description = "Missing or invalid field", body = ErrorResponse),
        (status = 401, description = "Authentication failed", body = ErrorResponse),
        (status = 404, description = "Address not found", body = ErrorResponse),
        (status = 409, description = "This property already exists", body = ErrorResponse),
        (status = 502, description = "Geocoding service unavailable", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request), fields(user_id = %caller.user_id, operation = "create_ad"))]
pub async fn create_listing(
    State(state): State<Arc<AppState>>,
    caller: CallerContext,
    ValidatedJson(request): ValidatedJson<CreateListingRequest>,
) -> Result<Json<CreateListingResponse>, HttpAppError> {
    let ad = ListingIngestionService::new(&state)
        .create(caller.user_id, request)
        .await?;

    Ok(Json(CreateListingResponse { success: true, ad }))
}
