//! Realty Core Library
//!
//! Domain models, error types, configuration and small shared primitives used by
//! every realty crate.

pub mod config;
pub mod constants;
pub mod error;
pub mod fanout;
pub mod models;
pub mod slug;
pub mod storage_types;

pub use config::{BaseConfig, Config, RealtyConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use fanout::settle_all;
pub use storage_types::StorageBackend;
