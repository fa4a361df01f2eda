pub mod health;
pub mod image_remove;
pub mod image_upload;
pub mod listing_create;
pub mod listing_read;
