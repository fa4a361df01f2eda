use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;
use uuid::Uuid;

/// Property classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "property_type"))]
pub enum PropertyType {
    House,
    #[default]
    Apartment,
    Townhouse,
    Land,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::House => "House",
            PropertyType::Apartment => "Apartment",
            PropertyType::Townhouse => "Townhouse",
            PropertyType::Land => "Land",
        }
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "house" => Ok(PropertyType::House),
            "apartment" => Ok(PropertyType::Apartment),
            "townhouse" => Ok(PropertyType::Townhouse),
            "land" => Ok(PropertyType::Land),
            _ => Err(format!("Invalid property type: {}", s)),
        }
    }
}

impl Display for PropertyType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Transaction type (the listing's "action")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "transaction_type"))]
pub enum TransactionType {
    #[default]
    Sell,
    Rent,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Sell => "Sell",
            TransactionType::Rent => "Rent",
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sell" => Ok(TransactionType::Sell),
            "rent" => Ok(TransactionType::Rent),
            _ => Err(format!("Invalid action: {}", s)),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Listing lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "listing_status"))]
pub enum ListingStatus {
    #[default]
    #[serde(rename = "In market")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "In market"))]
    InMarket,
    #[serde(rename = "Deposit taken")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Deposit taken"))]
    DepositTaken,
    #[serde(rename = "Under offer")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Under offer"))]
    UnderOffer,
    #[serde(rename = "Contact agent")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Contact agent"))]
    ContactAgent,
    Sold,
    Rented,
    #[serde(rename = "Off market")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Off market"))]
    OffMarket,
}

/// Geographic point, longitude first.
///
/// Serialized as a GeoJSON `Point` so clients can hand it to map libraries as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(into = "GeoJsonPoint", try_from = "GeoJsonPoint")]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    /// Returns `None` unless both coordinates are finite and in range.
    pub fn new(longitude: f64, latitude: f64) -> Option<Self> {
        let valid = longitude.is_finite()
            && latitude.is_finite()
            && (-180.0..=180.0).contains(&longitude)
            && (-90.0..=90.0).contains(&latitude);
        valid.then_some(GeoPoint {
            longitude,
            latitude,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GeoJsonPoint {
    #[serde(rename = "type")]
    #[schema(example = "Point")]
    pub kind: String,
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
}

impl From<GeoPoint> for GeoJsonPoint {
    fn from(point: GeoPoint) -> Self {
        GeoJsonPoint {
            kind: "Point".to_string(),
            coordinates: [point.longitude, point.latitude],
        }
    }
}

impl TryFrom<GeoJsonPoint> for GeoPoint {
    type Error = String;

    fn try_from(value: GeoJsonPoint) -> Result<Self, Self::Error> {
        if value.kind != "Point" {
            return Err(format!("Unsupported geometry type: {}", value.kind));
        }
        let [longitude, latitude] = value.coordinates;
        GeoPoint::new(longitude, latitude).ok_or_else(|| "Coordinates out of range".to_string())
    }
}

/// Persisted listing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: Uuid,
    pub slug: String,
    #[serde(rename = "postedBy")]
    pub owner_id: Uuid,
    pub title: Option<String>,
    pub address: String,
    pub formatted_address: Option<String>,
    pub display_name: Option<String>,
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    #[schema(value_type = GeoJsonPoint)]
    pub location: GeoPoint,
    pub property_type: PropertyType,
    #[serde(rename = "action")]
    pub transaction_type: TransactionType,
    pub price: String,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    #[serde(rename = "carpark")]
    pub car_spaces: Option<i32>,
    pub land_size: Option<f64>,
    pub land_size_unit: Option<String>,
    pub description: String,
    pub features: Option<String>,
    pub nearby: Option<String>,
    pub inspection_time: Option<String>,
    pub photos: Vec<String>,
    pub published: bool,
    pub status: ListingStatus,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload assembled by the listing ingestion flow
#[derive(Debug, Clone)]
pub struct NewListing {
    pub slug: String,
    pub owner_id: Uuid,
    pub title: Option<String>,
    pub address: String,
    pub formatted_address: Option<String>,
    pub display_name: Option<String>,
    pub location: GeoPoint,
    pub property_type: PropertyType,
    pub transaction_type: TransactionType,
    pub price: String,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub car_spaces: Option<i32>,
    pub land_size: Option<f64>,
    pub land_size_unit: Option<String>,
    pub description: String,
    pub features: Option<String>,
    pub nearby: Option<String>,
    pub inspection_time: Option<String>,
    pub photos: Vec<String>,
    pub published: bool,
    pub status: ListingStatus,
}

/// Projection returned after a listing is created
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingSummary {
    pub id: Uuid,
    pub photos: Vec<String>,
    pub address: String,
    pub price: String,
    pub property_type: PropertyType,
    #[schema(value_type = GeoJsonPoint)]
    pub location: GeoPoint,
    pub slug: String,
}

impl From<&Listing> for ListingSummary {
    fn from(listing: &Listing) -> Self {
        ListingSummary {
            id: listing.id,
            photos: listing.photos.clone(),
            address: listing.address.clone(),
            price: listing.price.clone(),
            property_type: listing.property_type,
            location: listing.location,
            slug: listing.slug.clone(),
        }
    }
}

/// Proximity query for related listings on the read path.
#[derive(Debug, Clone)]
pub struct NearbyQuery {
    pub near: GeoPoint,
    pub transaction_type: TransactionType,
    pub property_type: PropertyType,
    pub exclude_id: Uuid,
    pub radius_meters: f64,
    pub limit: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListingDetail {
    pub ad: Listing,
    pub related: Vec<Listing>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    pub ads: Vec<Listing>,
    pub current_page: i64,
    pub total_pages: i64,
    pub total_ads: i64,
}

/// A photo reference in a create request: either a bare URL or an upload descriptor.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum PhotoRef {
    Url(String),
    Descriptor { url: String },
}

impl PhotoRef {
    pub fn into_url(self) -> String {
        match self {
            PhotoRef::Url(url) => url,
            PhotoRef::Descriptor { url } => url,
        }
    }
}

/// Body of `POST /create-ad`.
///
/// Required fields are optional here so that missing ones surface as field-specific
/// validation errors instead of a generic deserialization failure. `price` and
/// `landsize` accept either JSON strings or numbers.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    #[serde(default)]
    pub photos: Vec<PhotoRef>,
    pub description: Option<String>,
    pub address: Option<String>,
    #[serde(alias = "propertytype")]
    pub property_type: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price: Option<JsonValue>,
    pub action: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub landsize: Option<JsonValue>,
    #[serde(alias = "landsizetype")]
    pub landsize_type: Option<String>,
    pub title: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub carpark: Option<i32>,
    pub features: Option<String>,
    pub nearby: Option<String>,
    pub inspection_time: Option<String>,
}
