//! JWT helpers for authenticated requests.

#![allow(dead_code)]

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use realty_api::auth::JwtClaims;
use uuid::Uuid;

/// Shared HS256 secret; must match the config built in `setup_test_app`.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";

pub struct TestUser {
    pub user_id: Uuid,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// A fresh user with a valid one-hour token.
pub fn create_test_user() -> TestUser {
    let user_id = Uuid::new_v4();
    let now = chrono::Utc::now().timestamp();
    let claims = JwtClaims {
        sub: user_id,
        iat: now,
        exp: now + 3600,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to sign test token");

    TestUser { user_id, token }
}
