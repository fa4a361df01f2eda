//! Service initialization

use anyhow::{Context, Result};
use realty_core::Config;
use realty_db::{PgListingRepository, PgUserRepository};
use realty_processing::ImageOptimizer;
use realty_services::GoogleGeocoder;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::state::AppState;

/// Build every collaborator once; handlers share them through `Arc<AppState>`.
pub async fn initialize_services(config: &Config, pool: PgPool) -> Result<Arc<AppState>> {
    let storage = realty_storage::create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;
    tracing::info!(backend = %storage.backend_type(), "Storage ready");

    let api_key = config
        .geocoding_api_key()
        .context("GOOGLE_MAPS_API_KEY must be set")?;
    let geocoder = GoogleGeocoder::new(
        api_key.to_string(),
        config.geocoding_base_url().to_string(),
        Duration::from_secs(config.geocoding_timeout_secs()),
    )?;

    Ok(Arc::new(AppState {
        config: config.clone(),
        storage,
        geocoder: Arc::new(geocoder),
        listings: Arc::new(PgListingRepository::new(pool.clone())),
        users: Arc::new(PgUserRepository::new(pool)),
        optimizer: ImageOptimizer::new(),
    }))
}
