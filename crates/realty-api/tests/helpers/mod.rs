//! Shared integration test harness
//!
//! Builds the full router over in-memory collaborators: an `object_store`
//! in-memory bucket behind the S3 gateway, in-memory repositories and a fake
//! geocoder. No database or network is needed.

#![allow(dead_code)]

pub mod auth;
pub mod fakes;
pub mod fixtures;

use axum_test::TestServer;
use object_store::memory::InMemory;
use realty_api::setup::routes::setup_routes;
use realty_api::AppState;
use realty_core::constants::{
    DEFAULT_ALLOWED_CONTENT_TYPES, DEFAULT_LISTINGS_PAGE_SIZE, DEFAULT_MAX_BATCH_FILES,
    DEFAULT_NEARBY_LIMIT, DEFAULT_NEARBY_RADIUS_METERS, GOOGLE_GEOCODING_URL,
};
use realty_core::{BaseConfig, Config, RealtyConfig, StorageBackend};
use realty_db::UserStore;
use realty_processing::ImageOptimizer;
use realty_storage::{S3Storage, Storage};
use std::sync::Arc;

use auth::TEST_JWT_SECRET;
use fakes::{FakeGeocoder, InMemoryListingStore, InMemoryUserStore};

pub const TEST_MAX_FILE_SIZE: usize = 2 * 1024 * 1024;

pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<S3Storage>,
    pub listings: Arc<InMemoryListingStore>,
    pub users: Arc<InMemoryUserStore>,
    pub geocoder: Arc<FakeGeocoder>,
}

pub fn test_config() -> Config {
    Config(Box::new(RealtyConfig {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            db_max_connections: 1,
            db_timeout_seconds: 1,
            jwt_secret: TEST_JWT_SECRET.to_string(),
            environment: "test".to_string(),
            log_format: "text".to_string(),
        },
        database_url: "postgresql://unused".to_string(),
        storage_backend: Some(StorageBackend::S3),
        s3_bucket: Some("realty-test".to_string()),
        s3_region: Some("ap-southeast-2".to_string()),
        s3_endpoint: None,
        local_storage_path: None,
        local_storage_base_url: None,
        max_file_size_bytes: TEST_MAX_FILE_SIZE,
        max_batch_files: DEFAULT_MAX_BATCH_FILES,
        allowed_content_types: DEFAULT_ALLOWED_CONTENT_TYPES
            .iter()
            .map(|s| s.to_string())
            .collect(),
        geocoding_api_key: None,
        geocoding_base_url: GOOGLE_GEOCODING_URL.to_string(),
        geocoding_timeout_secs: 1,
        listings_page_size: DEFAULT_LISTINGS_PAGE_SIZE,
        nearby_radius_meters: DEFAULT_NEARBY_RADIUS_METERS,
        nearby_limit: DEFAULT_NEARBY_LIMIT,
    }))
}

pub fn setup_test_app() -> TestApp {
    build_test_app(Arc::new(InMemoryUserStore::default()))
}

/// Same as [`setup_test_app`] but every role update fails.
pub fn setup_test_app_with_failing_users() -> TestApp {
    build_test_app(Arc::new(InMemoryUserStore::failing()))
}

fn build_test_app(users: Arc<InMemoryUserStore>) -> TestApp {
    let config = test_config();
    let storage = Arc::new(S3Storage::with_store(
        Arc::new(InMemory::new()),
        "realty-test".to_string(),
        "ap-southeast-2".to_string(),
        None,
    ));
    let listings = Arc::new(InMemoryListingStore::default());
    let geocoder = Arc::new(FakeGeocoder::default());

    let state = Arc::new(AppState {
        config: config.clone(),
        storage: storage.clone(),
        geocoder: geocoder.clone(),
        listings: listings.clone(),
        users: users.clone() as Arc<dyn UserStore>,
        optimizer: ImageOptimizer::new(),
    });

    let app = setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        storage,
        listings,
        users,
        geocoder,
    }
}

impl TestApp {
    pub async fn object_exists(&self, key: &str) -> bool {
        self.storage.exists(key).await.expect("exists check failed")
    }
}
