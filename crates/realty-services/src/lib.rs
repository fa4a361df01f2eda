//! Realty Services Layer
//!
//! Clients for third-party services used while ingesting listings. Today this is
//! the geocoder that turns a free-text address into a map point.

pub mod geocoder;

pub use geocoder::{GeocodeError, GeocodedAddress, Geocoder, GoogleGeocoder};
