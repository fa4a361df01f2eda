//! Application-wide constants.

/// Per-file upload ceiling in megabytes.
pub const DEFAULT_MAX_FILE_SIZE_MB: usize = 10;

/// Maximum number of files accepted by one batch upload.
pub const DEFAULT_MAX_BATCH_FILES: usize = 5;

pub const DEFAULT_ALLOWED_CONTENT_TYPES: &[&str] =
    &["image/jpeg", "image/jpg", "image/png", "image/webp"];

pub const DEFAULT_LISTINGS_PAGE_SIZE: i64 = 2;

/// Search radius for related listings on the read path.
pub const DEFAULT_NEARBY_RADIUS_METERS: f64 = 50_000.0;

pub const DEFAULT_NEARBY_LIMIT: i64 = 3;

pub const GOOGLE_GEOCODING_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Every stored upload lives below `uploads/{owner_id}/`.
pub const UPLOAD_KEY_ROOT: &str = "uploads";

/// Maximum length of free-text listing fields backed by `VARCHAR(255)`.
pub const MAX_LISTING_TEXT_LEN: usize = 255;
