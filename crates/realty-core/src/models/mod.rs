//! Data models shared across the workspace, organized by domain.

mod listing;
mod media;
mod user;

pub use listing::*;
pub use media::*;
pub use user::*;
