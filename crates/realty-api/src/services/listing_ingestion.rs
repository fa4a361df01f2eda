//! Listing ingestion
//!
//! validate → geocode → slug → persist → promote the caller to `Seller`.
//! Validation is pure and runs before any collaborator is touched.

use std::sync::Arc;

use realty_core::constants::MAX_LISTING_TEXT_LEN;
use realty_core::models::{
    CreateListingRequest, ListingStatus, ListingSummary, NewListing, PhotoRef, PropertyType,
    TransactionType, UserRole,
};
use realty_core::slug::listing_slug;
use realty_core::AppError;
use realty_db::{ListingStore, UserStore};
use realty_services::{GeocodeError, GeocodedAddress, Geocoder};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::state::AppState;

/// Slug derivation, swappable so collisions can be forced.
pub type SlugFn = fn(PropertyType, TransactionType, &str, &str) -> String;

/// A create request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDraft {
    pub photos: Vec<String>,
    pub description: String,
    pub address: String,
    pub property_type: PropertyType,
    pub price: String,
    pub transaction_type: TransactionType,
    pub land_size: Option<f64>,
    pub land_size_unit: Option<String>,
    pub title: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub car_spaces: Option<i32>,
    pub features: Option<String>,
    pub nearby: Option<String>,
    pub inspection_time: Option<String>,
}

impl ListingDraft {
    fn into_new_listing(self, owner_id: Uuid, slug: String, geocoded: GeocodedAddress) -> NewListing {
        NewListing {
            slug,
            owner_id,
            title: self.title,
            address: self.address,
            formatted_address: Some(geocoded.formatted_address).filter(|s| !s.is_empty()),
            display_name: Some(geocoded.display_name),
            location: geocoded.location,
            property_type: self.property_type,
            transaction_type: self.transaction_type,
            price: self.price,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            car_spaces: self.car_spaces,
            land_size: self.land_size,
            land_size_unit: self.land_size_unit,
            description: self.description,
            features: self.features,
            nearby: self.nearby,
            inspection_time: self.inspection_time,
            photos: self.photos,
            published: true,
            status: ListingStatus::InMarket,
        }
    }
}

fn required(field: &str) -> AppError {
    AppError::Validation(format!("{} is required", field))
}

fn required_text(value: Option<&str>, field: &str) -> Result<String, AppError> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(required(field)),
    }
}

fn bounded(value: String, field: &str) -> Result<String, AppError> {
    if value.chars().count() > MAX_LISTING_TEXT_LEN {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, MAX_LISTING_TEXT_LEN
        )));
    }
    Ok(value)
}

/// Price arrives as text or a number; zero counts as missing.
fn price_text(value: Option<&JsonValue>) -> Result<String, AppError> {
    match value {
        Some(JsonValue::String(text)) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        Some(JsonValue::Number(n)) if n.as_f64() != Some(0.0) => Ok(n.to_string()),
        _ => Err(required("Price")),
    }
}

fn land_size(value: Option<&JsonValue>) -> Result<f64, AppError> {
    let size = match value {
        Some(JsonValue::Number(n)) => n.as_f64(),
        Some(JsonValue::String(text)) if !text.trim().is_empty() => {
            Some(text.trim().parse::<f64>().map_err(|_| {
                AppError::Validation("Landsize must be a number".to_string())
            })?)
        }
        _ => None,
    };
    match size {
        Some(size) if size.is_finite() && size > 0.0 => Ok(size),
        Some(size) if size != 0.0 => Err(AppError::Validation(
            "Landsize must be a positive number".to_string(),
        )),
        _ => Err(required("Landsize")),
    }
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Check required fields in a fixed order and parse the enumerated ones.
pub fn validate_request(request: CreateListingRequest) -> Result<ListingDraft, AppError> {
    let photos: Vec<String> = request
        .photos
        .into_iter()
        .map(PhotoRef::into_url)
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .collect();
    if photos.is_empty() {
        return Err(required("Photos"));
    }

    let description = required_text(request.description.as_deref(), "Description")?;
    let address = bounded(required_text(request.address.as_deref(), "Address")?, "Address")?;
    let property_type = required_text(request.property_type.as_deref(), "Property Type")?;
    let price = bounded(price_text(request.price.as_ref())?, "Price")?;
    let action = required_text(request.action.as_deref(), "Action")?;

    let property_type = property_type
        .parse::<PropertyType>()
        .map_err(|_| AppError::Validation("Invalid property type".to_string()))?;
    let transaction_type = action
        .parse::<TransactionType>()
        .map_err(|_| AppError::Validation("Invalid action".to_string()))?;

    let (land_size, land_size_unit) = if property_type == PropertyType::Land {
        let size = land_size(request.landsize.as_ref())?;
        let unit = required_text(request.landsize_type.as_deref(), "Landsize Type")?;
        (Some(size), Some(unit))
    } else {
        (None, None)
    };

    Ok(ListingDraft {
        photos,
        description,
        address,
        property_type,
        price,
        transaction_type,
        land_size,
        land_size_unit,
        title: optional_text(request.title),
        bedrooms: request.bedrooms,
        bathrooms: request.bathrooms,
        car_spaces: request.carpark,
        features: optional_text(request.features),
        nearby: optional_text(request.nearby),
        inspection_time: optional_text(request.inspection_time),
    })
}

pub(crate) fn geocode_error(err: GeocodeError) -> AppError {
    match err {
        GeocodeError::NotFound(_) => {
            tracing::info!(error = %err, "Geocoding found no match");
            AppError::NotFound("Address not found".to_string())
        }
        GeocodeError::Upstream(_) => {
            tracing::error!(error = %err, "Geocoding provider failed");
            AppError::ServiceUnavailable("Geocoding service unavailable".to_string())
        }
        GeocodeError::Validation(message) => {
            tracing::debug!(error = %message, "Geocoding rejected address");
            AppError::Validation(message)
        }
    }
}

pub struct ListingIngestionService {
    geocoder: Arc<dyn Geocoder>,
    listings: Arc<dyn ListingStore>,
    users: Arc<dyn UserStore>,
    slug_fn: SlugFn,
}

impl ListingIngestionService {
    pub fn new(state: &AppState) -> Self {
        Self::with_parts(
            state.geocoder.clone(),
            state.listings.clone(),
            state.users.clone(),
        )
    }

    pub fn with_parts(
        geocoder: Arc<dyn Geocoder>,
        listings: Arc<dyn ListingStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            geocoder,
            listings,
            users,
            slug_fn: listing_slug,
        }
    }

    pub fn with_slug_fn(mut self, slug_fn: SlugFn) -> Self {
        self.slug_fn = slug_fn;
        self
    }

    #[tracing::instrument(skip(self, request), fields(user_id = %owner_id))]
    pub async fn create(
        &self,
        owner_id: Uuid,
        request: CreateListingRequest,
    ) -> Result<ListingSummary, AppError> {
        let draft = validate_request(request)?;

        let geocoded = self
            .geocoder
            .resolve(&draft.address)
            .await
            .map_err(geocode_error)?;

        let slug = (self.slug_fn)(
            draft.property_type,
            draft.transaction_type,
            &draft.address,
            &draft.price,
        );

        let listing = self
            .listings
            .create(draft.into_new_listing(owner_id, slug, geocoded))
            .await?;

        tracing::info!(listing_id = %listing.id, slug = %listing.slug, "Listing created");

        // The listing stays even if the role update fails.
        match self.users.add_role(owner_id, UserRole::Seller).await {
            Ok(true) => tracing::info!(user_id = %owner_id, "User promoted to Seller"),
            Ok(false) => {}
            Err(e) => tracing::warn!(
                user_id = %owner_id,
                listing_id = %listing.id,
                error = %e,
                "Failed to add Seller role after listing creation"
            ),
        }

        Ok(ListingSummary::from(&listing))
    }
}
