use realty_core::Config;
use realty_db::{ListingStore, UserStore};
use realty_processing::ImageOptimizer;
use realty_services::Geocoder;
use realty_storage::Storage;
use std::sync::Arc;

/// Shared application state. Collaborators sit behind traits so tests can swap them.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub geocoder: Arc<dyn Geocoder>,
    pub listings: Arc<dyn ListingStore>,
    pub users: Arc<dyn UserStore>,
    pub optimizer: ImageOptimizer,
}
