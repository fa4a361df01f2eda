//! OpenAPI documentation, served as JSON at `/api-docs/openapi.json` and browsable at `/docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use realty_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Realty API",
        version = "0.1.0",
        description = "Listing photo ingestion (optimize and store), listing creation with geocoding, and public listing reads."
    ),
    paths(
        handlers::image_upload::upload_image,
        handlers::image_upload::upload_images,
        handlers::image_remove::remove_image,
        handlers::image_remove::remove_images,
        handlers::listing_create::create_listing,
        handlers::listing_read::get_listing,
        handlers::listing_read::list_for_sale,
        handlers::listing_read::list_for_rent,
        handlers::health::health_check,
    ),
    components(schemas(
        error::ErrorResponse,
        handlers::image_upload::UploadImageResponse,
        handlers::image_upload::UploadImagesResponse,
        handlers::image_upload::UploadImagesData,
        handlers::image_remove::RemoveImageResponse,
        handlers::image_remove::RemoveImagesResponse,
        handlers::image_remove::RemoveImagesData,
        handlers::listing_create::CreateListingResponse,
        handlers::health::HealthCheckResponse,
        models::StoredObjectDescriptor,
        models::SizeReport,
        models::Dimensions,
        models::FailedUpload,
        models::FailedDelete,
        models::DeletedImage,
        models::BatchStatus,
        models::CreateListingRequest,
        models::PhotoRef,
        models::ListingSummary,
        models::Listing,
        models::ListingDetail,
        models::ListingPage,
        models::GeoJsonPoint,
        models::PropertyType,
        models::TransactionType,
        models::ListingStatus,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "images", description = "Listing photo upload and removal"),
        (name = "listings", description = "Listing creation and reads"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
