use std::sync::Arc;

use realty_core::models::{ListingDetail, ListingPage, NearbyQuery, TransactionType};
use realty_core::AppError;
use realty_db::{page_count, ListingStore};

use crate::state::AppState;

/// Parse a 1-based page path segment.
pub fn parse_page(raw: &str) -> Result<i64, AppError> {
    match raw.trim().parse::<i64>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(AppError::Validation("Invalid page number".to_string())),
    }
}

/// Public listing reads: detail with related listings, and paginated feeds.
pub struct ListingReadService {
    listings: Arc<dyn ListingStore>,
    page_size: i64,
    nearby_radius_meters: f64,
    nearby_limit: i64,
}

impl ListingReadService {
    pub fn new(state: &AppState) -> Self {
        Self {
            listings: state.listings.clone(),
            page_size: state.config.listings_page_size(),
            nearby_radius_meters: state.config.nearby_radius_meters(),
            nearby_limit: state.config.nearby_limit(),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn detail(&self, slug: &str) -> Result<ListingDetail, AppError> {
        let mut ad = self
            .listings
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Ad not found".to_string()))?;

        let related = self
            .listings
            .find_nearby(NearbyQuery {
                near: ad.location,
                transaction_type: ad.transaction_type,
                property_type: ad.property_type,
                exclude_id: ad.id,
                radius_meters: self.nearby_radius_meters,
                limit: self.nearby_limit,
            })
            .await?;

        match self.listings.increment_views(ad.id).await {
            Ok(()) => ad.views += 1,
            Err(e) => tracing::warn!(listing_id = %ad.id, error = %e, "Failed to record listing view"),
        }

        Ok(ListingDetail { ad, related })
    }

    #[tracing::instrument(skip(self))]
    pub async fn page(
        &self,
        transaction_type: TransactionType,
        page: i64,
    ) -> Result<ListingPage, AppError> {
        let (ads, total_ads) = self
            .listings
            .list_by_transaction(transaction_type, page, self.page_size)
            .await?;

        Ok(ListingPage {
            ads,
            current_page: page,
            total_pages: page_count(total_ads, self.page_size),
            total_ads,
        })
    }
}
