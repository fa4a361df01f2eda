//! Configuration module
//!
//! Environment-driven configuration for the API: server, database, object
//! storage, geocoding, upload limits and listing read settings. `.env` files are
//! honoured through `dotenvy`.

use std::env;

use crate::constants::{
    DEFAULT_ALLOWED_CONTENT_TYPES, DEFAULT_LISTINGS_PAGE_SIZE, DEFAULT_MAX_BATCH_FILES,
    DEFAULT_MAX_FILE_SIZE_MB, DEFAULT_NEARBY_LIMIT, DEFAULT_NEARBY_RADIUS_METERS,
    GOOGLE_GEOCODING_URL,
};
use crate::storage_types::StorageBackend;

const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const GEOCODING_TIMEOUT_SECS: u64 = 10;

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub environment: String,
    /// `json` switches the fmt layer to JSON lines
    pub log_format: String,
}

#[derive(Clone, Debug)]
pub struct RealtyConfig {
    pub base: BaseConfig,
    pub database_url: String,
    // Storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Upload limits
    pub max_file_size_bytes: usize,
    pub max_batch_files: usize,
    pub allowed_content_types: Vec<String>,
    // Geocoding
    pub geocoding_api_key: Option<String>,
    pub geocoding_base_url: String,
    pub geocoding_timeout_secs: u64,
    // Listing reads
    pub listings_page_size: i64,
    pub nearby_radius_meters: f64,
    pub nearby_limit: i64,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<RealtyConfig>);

impl Config {
    fn inner(&self) -> &RealtyConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = RealtyConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        matches!(
            self.inner().base.environment.to_lowercase().as_str(),
            "production" | "prod"
        )
    }

    pub fn is_development(&self) -> bool {
        matches!(
            self.inner().base.environment.to_lowercase().as_str(),
            "development" | "dev"
        )
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn jwt_secret(&self) -> &str {
        &self.inner().base.jwt_secret
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn log_format(&self) -> &str {
        &self.inner().base.log_format
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn storage_backend(&self) -> Option<StorageBackend> {
        self.inner().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.inner().max_file_size_bytes
    }

    pub fn max_batch_files(&self) -> usize {
        self.inner().max_batch_files
    }

    pub fn allowed_content_types(&self) -> &[String] {
        &self.inner().allowed_content_types
    }

    pub fn geocoding_api_key(&self) -> Option<&str> {
        self.inner().geocoding_api_key.as_deref()
    }

    pub fn geocoding_base_url(&self) -> &str {
        &self.inner().geocoding_base_url
    }

    pub fn geocoding_timeout_secs(&self) -> u64 {
        self.inner().geocoding_timeout_secs
    }

    pub fn listings_page_size(&self) -> i64 {
        self.inner().listings_page_size
    }

    pub fn nearby_radius_meters(&self) -> f64 {
        self.inner().nearby_radius_meters
    }

    pub fn nearby_limit(&self) -> i64 {
        self.inner().nearby_limit
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl RealtyConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: env::var("SERVER_PORT")
                .or_else(|_| env::var("PORT"))
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .map_err(|e| anyhow::anyhow!("SERVER_PORT must be a valid port: {}", e))?,
            cors_origins,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?,
            environment,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase(),
        };

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(raw) => Some(raw.parse::<StorageBackend>()?),
            Err(_) => None,
        };

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| DEFAULT_MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(DEFAULT_MAX_FILE_SIZE_MB);

        Ok(RealtyConfig {
            base,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            storage_backend,
            s3_bucket: env::var("S3_BUCKET")
                .or_else(|_| env::var("AWS_BUCKET_NAME"))
                .ok(),
            s3_region: env::var("S3_REGION").or_else(|_| env::var("AWS_REGION")).ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            max_batch_files: env::var("MAX_BATCH_FILES")
                .unwrap_or_else(|_| DEFAULT_MAX_BATCH_FILES.to_string())
                .parse()
                .unwrap_or(DEFAULT_MAX_BATCH_FILES),
            allowed_content_types: parse_list(
                &env::var("ALLOWED_CONTENT_TYPES")
                    .unwrap_or_else(|_| DEFAULT_ALLOWED_CONTENT_TYPES.join(",")),
            ),
            geocoding_api_key: env::var("GOOGLE_MAPS_API_KEY").ok(),
            geocoding_base_url: env::var("GEOCODING_BASE_URL")
                .unwrap_or_else(|_| GOOGLE_GEOCODING_URL.to_string()),
            geocoding_timeout_secs: env::var("GEOCODING_TIMEOUT_SECS")
                .unwrap_or_else(|_| GEOCODING_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(GEOCODING_TIMEOUT_SECS),
            listings_page_size: env::var("LISTINGS_PAGE_SIZE")
                .unwrap_or_else(|_| DEFAULT_LISTINGS_PAGE_SIZE.to_string())
                .parse()
                .unwrap_or(DEFAULT_LISTINGS_PAGE_SIZE),
            nearby_radius_meters: env::var("NEARBY_RADIUS_METERS")
                .unwrap_or_else(|_| DEFAULT_NEARBY_RADIUS_METERS.to_string())
                .parse()
                .unwrap_or(DEFAULT_NEARBY_RADIUS_METERS),
            nearby_limit: env::var("NEARBY_LIMIT")
                .unwrap_or_else(|_| DEFAULT_NEARBY_LIMIT.to_string())
                .parse()
                .unwrap_or(DEFAULT_NEARBY_LIMIT),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !(self.database_url.starts_with("postgresql://")
            || self.database_url.starts_with("postgres://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.geocoding_api_key.as_deref().unwrap_or("").is_empty() {
            return Err(anyhow::anyhow!("GOOGLE_MAPS_API_KEY must be set"));
        }

        if self.max_batch_files == 0 {
            return Err(anyhow::anyhow!("MAX_BATCH_FILES must be at least 1"));
        }

        if self.listings_page_size <= 0 || self.nearby_limit <= 0 {
            return Err(anyhow::anyhow!(
                "LISTINGS_PAGE_SIZE and NEARBY_LIMIT must be positive"
            ));
        }

        match self.storage_backend.unwrap_or(StorageBackend::S3) {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}
