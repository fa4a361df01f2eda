use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use realty_core::models::{ListingDetail, ListingPage, TransactionType};

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::{parse_page, ListingReadService};
use crate::state::AppState;

/// Listing detail with up to three nearby listings of the same kind
#[utoipa::path(
    get,
    path = "/ad/{slug}",
    tag = "listings",
    params(("slug" = String, Path, description = "Listing slug")),
    responses(
        (status = 200, description = "Listing found", body = ListingDetail),
        (status = 404, description = "Ad not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_listing(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<ListingDetail>, HttpAppError> {
    let detail = ListingReadService::new(&state).detail(&slug).await?;
    Ok(Json(detail))
}

async fn listing_page(
    state: &AppState,
    transaction_type: TransactionType,
    raw_page: &str,
) -> Result<Json<ListingPage>, HttpAppError> {
    let page = parse_page(raw_page)?;
    let listings = ListingReadService::new(state)
        .page(transaction_type, page)
        .await?;
    Ok(Json(listings))
}

/// Published listings for sale, newest first
#[utoipa::path(
    get,
    path = "/ads-for-sell/{page}",
    tag = "listings",
    params(("page" = i64, Path, description = "1-based page number")),
    responses(
        (status = 200, description = "Listing page", body = ListingPage),
        (status = 400, description = "Invalid page number", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_for_sale(
    State(state): State<Arc<AppState>>,
    Path(page): Path<String>,
) -> Result<Json<ListingPage>, HttpAppError> {
    listing_page(&state, TransactionType::Sell, &page).await
}

/// Published listings for rent, newest first
#[utoipa::path(
    get,
    path = "/ads-for-rent/{page}",
    tag = "listings",
    params(("page" = i64, Path, description = "1-based page number")),
    responses(
        (status = 200, description = "Listing page", body = ListingPage),
        (status = 400, description = "Invalid page number", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_for_rent(
    State(state): State<Arc<AppState>>,
    Path(page): Path<String>,
) -> Result<Json<ListingPage>, HttpAppError> {
    listing_page(&state, TransactionType::Rent, &page).await
}
