use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role tags carried on a user record. Only `Seller` is written by this service;
/// the others are managed by account tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum UserRole {
    Buyer,
    Seller,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Buyer => "Buyer",
            UserRole::Seller => "Seller",
            UserRole::Admin => "Admin",
        }
    }
}
