//! Realty Database Library
//!
//! Repository traits and their PostgreSQL implementations for listings and users.

pub mod db;

pub use db::*;
