//! Listing creation and public read integration tests.

mod helpers;

use axum::http::StatusCode;
use helpers::auth::create_test_user;
use helpers::fakes::{FakeGeocoder, InMemoryListingStore, InMemoryUserStore};
use helpers::fixtures::listing_body;
use helpers::{setup_test_app, setup_test_app_with_failing_users, TestApp};
use realty_api::services::ListingIngestionService;
use realty_core::models::{CreateListingRequest, PropertyType, TransactionType, UserRole};
use realty_core::{AppError, ErrorMetadata};
use serde_json::{json, Value};
use std::sync::Arc;

async fn create_ad(app: &TestApp, bearer: &str, body: &Value) -> Value {
    let response = app
        .server
        .post("/create-ad")
        .add_header("Authorization", bearer.to_string())
        .json(body)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json::<Value>()
}

#[tokio::test]
async fn test_create_ad_promotes_seller() {
    let app = setup_test_app();
    let user = create_test_user();
    app.geocoder.place("1 Circular Quay, Sydney", 151.2108, -33.8610);

    let body = create_ad(&app, &user.bearer(), &listing_body("1 Circular Quay, Sydney")).await;

    assert_eq!(body["success"], true);
    let ad = &body["ad"];
    assert_eq!(ad["address"], "1 Circular Quay, Sydney");
    assert_eq!(ad["price"], "850000");
    assert_eq!(ad["propertyType"], "Apartment");
    assert_eq!(ad["location"]["type"], "Point");
    assert_eq!(ad["location"]["coordinates"][0], 151.2108);
    assert_eq!(ad["photos"].as_array().unwrap().len(), 2);
    assert!(ad["slug"]
        .as_str()
        .unwrap()
        .starts_with("apartment-for-sell-address-1-circular-quay-sydney-price-850000-"));

    assert_eq!(app.users.roles(user.user_id), vec![UserRole::Seller]);

    let stored = app.listings.all();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].owner_id, user.user_id);
    assert!(stored[0].published);
}

#[tokio::test]
async fn test_create_ad_seller_role_added_once() {
    let app = setup_test_app();
    let user = create_test_user();

    create_ad(&app, &user.bearer(), &listing_body("5 George St, Sydney")).await;
    create_ad(&app, &user.bearer(), &listing_body("7 George St, Sydney")).await;

    assert_eq!(app.users.roles(user.user_id), vec![UserRole::Seller]);
    assert_eq!(app.listings.len(), 2);
}

#[tokio::test]
async fn test_create_ad_survives_role_update_failure() {
    let app = setup_test_app_with_failing_users();
    let user = create_test_user();

    let body = create_ad(&app, &user.bearer(), &listing_body("9 Pitt St, Sydney")).await;

    assert_eq!(body["success"], true);
    assert_eq!(app.listings.len(), 1);
}

#[tokio::test]
async fn test_identical_listings_get_distinct_slugs() {
    let app = setup_test_app();
    let user = create_test_user();
    let body = listing_body("3 Bridge St, Sydney");

    let first = create_ad(&app, &user.bearer(), &body).await;
    let second = create_ad(&app, &user.bearer(), &body).await;

    assert_ne!(first["ad"]["slug"], second["ad"]["slug"]);
}

#[tokio::test]
async fn test_create_ad_requires_auth() {
    let app = setup_test_app();

    let response = app
        .server
        .post("/create-ad")
        .json(&listing_body("1 Main St"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.listings.len(), 0);
}

#[tokio::test]
async fn test_create_ad_missing_photos() {
    let app = setup_test_app();
    let user = create_test_user();
    let mut body = listing_body("1 Main St");
    body["photos"] = json!([]);

    let response = app
        .server
        .post("/create-ad")
        .add_header("Authorization", user.bearer())
        .json(&body)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Photos is required");
    assert_eq!(app.geocoder.calls(), 0);
}

#[tokio::test]
async fn test_create_land_without_landsize() {
    let app = setup_test_app();
    let user = create_test_user();
    let mut body = listing_body("Lot 4 Ridge Rd, Orange");
    body["propertyType"] = json!("Land");

    let response = app
        .server
        .post("/create-ad")
        .add_header("Authorization", user.bearer())
        .json(&body)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Landsize is required");
    assert_eq!(app.geocoder.calls(), 0);
    assert_eq!(app.listings.len(), 0);
}

#[tokio::test]
async fn test_create_land_with_landsize() {
    let app = setup_test_app();
    let user = create_test_user();
    let mut body = listing_body("Lot 5 Ridge Rd, Orange");
    body["propertyType"] = json!("Land");
    body["landsize"] = json!(600);
    body["landsizeType"] = json!("m2");

    create_ad(&app, &user.bearer(), &body).await;

    let stored = app.listings.all();
    assert_eq!(stored[0].property_type, PropertyType::Land);
    assert_eq!(stored[0].land_size, Some(600.0));
    assert_eq!(stored[0].land_size_unit.as_deref(), Some("m2"));
}

#[tokio::test]
async fn test_create_ad_unknown_address() {
    let app = setup_test_app();
    let user = create_test_user();

    let response = app
        .server
        .post("/create-ad")
        .add_header("Authorization", user.bearer())
        .json(&listing_body("???"))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"], "Address not found");
    assert_eq!(app.listings.len(), 0);
    assert!(app.users.roles(user.user_id).is_empty());
}

#[tokio::test]
async fn test_create_ad_geocoder_outage() {
    let app = setup_test_app();
    let user = create_test_user();

    let response = app
        .server
        .post("/create-ad")
        .add_header("Authorization", user.bearer())
        .json(&listing_body("offline"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let body = response.json::<Value>();
    assert_eq!(body["error"], "Geocoding service unavailable");
    assert_eq!(body["recoverable"], true);
}

#[tokio::test]
async fn test_create_ad_invalid_json() {
    let app = setup_test_app();
    let user = create_test_user();

    let response = app
        .server
        .post("/create-ad")
        .add_header("Authorization", user.bearer())
        .add_header("Content-Type", "application/json")
        .bytes("{\"photos\": [".into())
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let error = response.json::<Value>()["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("Invalid request body"));
}

fn colliding_slug(_: PropertyType, _: TransactionType, _: &str, _: &str) -> String {
    "house-for-sell-address-fixed".to_string()
}

#[tokio::test]
async fn test_forced_slug_collision_is_a_conflict() {
    let listings = Arc::new(InMemoryListingStore::default());
    let users = Arc::new(InMemoryUserStore::default());
    let service = ListingIngestionService::with_parts(
        Arc::new(FakeGeocoder::default()),
        listings.clone(),
        users,
    )
    .with_slug_fn(colliding_slug);
    let owner = uuid::Uuid::new_v4();
    let request = || -> CreateListingRequest {
        serde_json::from_value(listing_body("2 Collins St, Melbourne")).unwrap()
    };

    service.create(owner, request()).await.unwrap();
    let err = service.create(owner, request()).await.unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(err.http_status_code(), 409);
    assert_eq!(listings.len(), 1);
}

#[tokio::test]
async fn test_get_ad_with_related_listings() {
    let app = setup_test_app();
    let user = create_test_user();
    app.geocoder.place("10 Oxford St, Paddington", 151.2260, -33.8848);
    app.geocoder.place("12 Oxford St, Paddington", 151.2270, -33.8850);
    app.geocoder.place("1 Collins St, Melbourne", 144.9731, -37.8140);

    let subject = create_ad(&app, &user.bearer(), &listing_body("10 Oxford St, Paddington")).await;
    create_ad(&app, &user.bearer(), &listing_body("12 Oxford St, Paddington")).await;
    create_ad(&app, &user.bearer(), &listing_body("1 Collins St, Melbourne")).await;
    let mut rental = listing_body("12 Oxford St, Paddington");
    rental["action"] = json!("Rent");
    create_ad(&app, &user.bearer(), &rental).await;

    let slug = subject["ad"]["slug"].as_str().unwrap();
    let response = app.server.get(&format!("/ad/{}", slug)).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["ad"]["slug"], slug);
    assert_eq!(body["ad"]["postedBy"], user.user_id.to_string());
    assert_eq!(body["ad"]["views"], 1);

    let related = body["related"].as_array().unwrap();
    assert_eq!(related.len(), 1);
    assert_eq!(related[0]["address"], "12 Oxford St, Paddington");
    assert_eq!(related[0]["action"], "Sell");

    let again = app.server.get(&format!("/ad/{}", slug)).await;
    assert_eq!(again.json::<Value>()["ad"]["views"], 2);
}

#[tokio::test]
async fn test_get_ad_not_found() {
    let app = setup_test_app();

    let response = app.server.get("/ad/house-for-sell-nowhere").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"], "Ad not found");
}

#[tokio::test]
async fn test_ads_for_sell_pagination() {
    let app = setup_test_app();
    let user = create_test_user();
    for address in ["1 First Ave", "2 Second Ave", "3 Third Ave"] {
        create_ad(&app, &user.bearer(), &listing_body(address)).await;
    }
    let mut rental = listing_body("4 Fourth Ave");
    rental["action"] = json!("Rent");
    create_ad(&app, &user.bearer(), &rental).await;

    let first = app.server.get("/ads-for-sell/1").await;
    assert_eq!(first.status_code(), StatusCode::OK);
    let first = first.json::<Value>();
    assert_eq!(first["currentPage"], 1);
    assert_eq!(first["totalPages"], 2);
    assert_eq!(first["totalAds"], 3);
    let ads = first["ads"].as_array().unwrap();
    assert_eq!(ads.len(), 2);
    assert_eq!(ads[0]["address"], "3 Third Ave");
    assert_eq!(ads[1]["address"], "2 Second Ave");

    let second = app.server.get("/ads-for-sell/2").await.json::<Value>();
    assert_eq!(second["ads"].as_array().unwrap().len(), 1);
    assert_eq!(second["ads"][0]["address"], "1 First Ave");

    let beyond = app.server.get("/ads-for-sell/9").await.json::<Value>();
    assert!(beyond["ads"].as_array().unwrap().is_empty());
    assert_eq!(beyond["totalAds"], 3);

    let rent = app.server.get("/ads-for-rent/1").await.json::<Value>();
    assert_eq!(rent["totalAds"], 1);
    assert_eq!(rent["ads"][0]["action"], "Rent");
}

#[tokio::test]
async fn test_ads_for_sell_invalid_page() {
    let app = setup_test_app();

    for page in ["0", "-1", "abc"] {
        let response = app.server.get(&format!("/ads-for-sell/{}", page)).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], "Invalid page number");
    }
}

#[tokio::test]
async fn test_health_and_docs() {
    let app = setup_test_app();

    let health = app.server.get("/health").await;
    assert_eq!(health.status_code(), StatusCode::OK);
    let health = health.json::<Value>();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["storage"], "healthy");

    let openapi = app.server.get("/api-docs/openapi.json").await;
    assert_eq!(openapi.status_code(), StatusCode::OK);
    assert!(openapi.json::<Value>()["paths"].get("/create-ad").is_some());
}
