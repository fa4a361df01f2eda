//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::auth::middleware::{auth_middleware, AuthState};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use realty_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Multipart framing allowance on top of the file payloads.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = Arc::new(AuthState::new(config.jwt_secret()));

    let protected_routes = protected_routes()
        .layer(axum::middleware::from_fn_with_state(auth_state, auth_middleware));

    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10_000)
        .max(1);

    let body_limit = config
        .max_file_size_bytes()
        .saturating_mul(config.max_batch_files().max(1))
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let app = public_routes()
        .merge(protected_routes)
        .merge(
            utoipa_rapidoc::RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi())
                .path("/docs"),
        )
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!(body_limit, http_concurrency_limit, "Routes configured");

    Ok(app)
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ad/{slug}", get(handlers::listing_read::get_listing))
        .route(
            "/ads-for-sell/{page}",
            get(handlers::listing_read::list_for_sale),
        )
        .route(
            "/ads-for-rent/{page}",
            get(handlers::listing_read::list_for_rent),
        )
}

fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/upload-image", post(handlers::image_upload::upload_image))
        .route("/upload-images", post(handlers::image_upload::upload_images))
        .route("/remove-image", delete(handlers::image_remove::remove_image))
        .route("/remove-images", delete(handlers::image_remove::remove_images))
        .route("/create-ad", post(handlers::listing_create::create_listing))
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
