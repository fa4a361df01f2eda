//! Database repositories for data access layer
//!
//! Each repository is exposed through an object-safe trait so handlers and
//! orchestrators can be exercised against in-memory fakes.

pub mod listing;
pub mod user;

pub use listing::{page_count, page_offset, ListingStore, PgListingRepository};
pub use user::{PgUserRepository, UserStore};
