//! Realty API
//!
//! HTTP surface for listing photo ingestion and listing creation. Exposed as a
//! library so integration tests can assemble the router with in-memory
//! collaborators.

pub mod api_doc;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;
pub mod utils;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
