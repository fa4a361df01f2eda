//! In-memory stand-ins for the database repositories and the geocoding provider.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use realty_core::models::{
    GeoPoint, Listing, NearbyQuery, NewListing, TransactionType, UserRole,
};
use realty_core::AppError;
use realty_db::{page_offset, ListingStore, UserStore};
use realty_services::{GeocodeError, GeocodedAddress, Geocoder};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

fn distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lat2) = (a.latitude.to_radians(), b.latitude.to_radians());
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();
    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

#[derive(Default)]
pub struct InMemoryListingStore {
    listings: Mutex<Vec<Listing>>,
}

impl InMemoryListingStore {
    pub fn all(&self) -> Vec<Listing> {
        self.listings.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.listings.lock().unwrap().len()
    }
}

#[async_trait]
impl ListingStore for InMemoryListingStore {
    async fn create(&self, new: NewListing) -> Result<Listing, AppError> {
        let mut listings = self.listings.lock().unwrap();
        if listings.iter().any(|l| l.slug == new.slug) {
            return Err(AppError::Conflict("This property already exists".to_string()));
        }
        let now = Utc::now();
        let listing = Listing {
            id: Uuid::new_v4(),
            slug: new.slug,
            owner_id: new.owner_id,
            title: new.title,
            address: new.address,
            formatted_address: new.formatted_address,
            display_name: new.display_name,
            location: new.location,
            property_type: new.property_type,
            transaction_type: new.transaction_type,
            price: new.price,
            bedrooms: new.bedrooms,
            bathrooms: new.bathrooms,
            car_spaces: new.car_spaces,
            land_size: new.land_size,
            land_size_unit: new.land_size_unit,
            description: new.description,
            features: new.features,
            nearby: new.nearby,
            inspection_time: new.inspection_time,
            photos: new.photos,
            published: new.published,
            status: new.status,
            views: 0,
            created_at: now,
            updated_at: now,
        };
        listings.push(listing.clone());
        Ok(listing)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Listing>, AppError> {
        Ok(self
            .listings
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.slug == slug)
            .cloned())
    }

    async fn find_nearby(&self, query: NearbyQuery) -> Result<Vec<Listing>, AppError> {
        let listings = self.listings.lock().unwrap();
        let mut candidates: Vec<(f64, Listing)> = listings
            .iter()
            .filter(|l| {
                l.published
                    && l.id != query.exclude_id
                    && l.transaction_type == query.transaction_type
                    && l.property_type == query.property_type
            })
            .map(|l| (distance_meters(query.near, l.location), l.clone()))
            .filter(|(distance, _)| *distance <= query.radius_meters)
            .collect();
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(candidates
            .into_iter()
            .take(query.limit as usize)
            .map(|(_, l)| l)
            .collect())
    }

    async fn list_by_transaction(
        &self,
        transaction_type: TransactionType,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<Listing>, i64), AppError> {
        let listings = self.listings.lock().unwrap();
        // Insertion order doubles as creation order.
        let matching: Vec<&Listing> = listings
            .iter()
            .rev()
            .filter(|l| l.published && l.transaction_type == transaction_type)
            .collect();
        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(page_offset(page, page_size) as usize)
            .take(page_size as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn increment_views(&self, id: Uuid) -> Result<(), AppError> {
        let mut listings = self.listings.lock().unwrap();
        if let Some(listing) = listings.iter_mut().find(|l| l.id == id) {
            listing.views += 1;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryUserStore {
    roles: Mutex<HashMap<Uuid, Vec<UserRole>>>,
    pub fail: bool,
}

impl InMemoryUserStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn roles(&self, user_id: Uuid) -> Vec<UserRole> {
        self.roles
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn add_role(&self, user_id: Uuid, role: UserRole) -> Result<bool, AppError> {
        if self.fail {
            return Err(AppError::Internal("users table unavailable".to_string()));
        }
        let mut roles = self.roles.lock().unwrap();
        let user_roles = roles.entry(user_id).or_default();
        if user_roles.contains(&role) {
            return Ok(false);
        }
        user_roles.push(role);
        Ok(true)
    }
}

/// Resolves any address containing a letter or digit. Addresses registered with
/// [`FakeGeocoder::place`] get their own coordinates; the rest land in Sydney.
/// `"offline"` simulates a provider outage.
pub struct FakeGeocoder {
    places: Mutex<HashMap<String, GeoPoint>>,
    default_location: GeoPoint,
    calls: AtomicUsize,
}

impl Default for FakeGeocoder {
    fn default() -> Self {
        Self {
            places: Mutex::new(HashMap::new()),
            default_location: GeoPoint {
                longitude: 151.2093,
                latitude: -33.8688,
            },
            calls: AtomicUsize::new(0),
        }
    }
}

impl FakeGeocoder {
    pub fn place(&self, address: &str, longitude: f64, latitude: f64) {
        self.places.lock().unwrap().insert(
            address.to_string(),
            GeoPoint {
                longitude,
                latitude,
            },
        );
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn resolve(&self, address: &str) -> Result<GeocodedAddress, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let address = address.trim();
        if address == "offline" {
            return Err(GeocodeError::Upstream("REQUEST_DENIED".to_string()));
        }
        if !address.chars().any(char::is_alphanumeric) {
            return Err(GeocodeError::NotFound(address.to_string()));
        }
        let location = self
            .places
            .lock()
            .unwrap()
            .get(address)
            .copied()
            .unwrap_or(self.default_location);
        Ok(GeocodedAddress {
            location,
            formatted_address: format!("{}, Australia", address),
            display_name: format!("{}, Australia", address),
            place_id: None,
        })
    }
}
