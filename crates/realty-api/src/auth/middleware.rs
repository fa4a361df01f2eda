use crate::auth::models::{CallerContext, JwtClaims};
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use realty_core::AppError;
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthState {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthState {
    /// HS256 verification with the shared secret.
    pub fn new(jwt_secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 30;
        Self {
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<JwtClaims, jsonwebtoken::errors::Error> {
        decode::<JwtClaims>(token, &self.decoding_key, &self.validation).map(|data| data.claims)
    }
}

/// Every auth failure looks the same to the client; the reason is only logged.
fn unauthorized(reason: &str) -> Response {
    tracing::debug!(reason, "Request rejected by auth middleware");
    HttpAppError(AppError::Unauthorized("Authentication failed".to_string())).into_response()
}

pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => return unauthorized("Missing authorization header"),
    };

    let token = match auth_header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => token.trim(),
        _ => return unauthorized("Invalid authorization header format"),
    };

    let claims = match auth_state.verify(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "JWT verification failed");
            return unauthorized("Invalid token");
        }
    };

    request.extensions_mut().insert(CallerContext {
        user_id: claims.sub,
    });

    next.run(request).await
}
