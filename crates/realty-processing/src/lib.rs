//! Realty Processing
//!
//! Image optimization for listing photos: profile-driven resizing that never
//! upscales, followed by a jpeg (mozjpeg) or webp re-encode.

pub mod compression;
pub mod error;
pub mod optimizer;
pub mod profile;
pub mod resize;

pub use error::ProcessingError;
pub use optimizer::{ImageOptimizer, OptimizedImage};
pub use profile::{FitStrategy, OptimizationProfile, OutputEncoding, ProfileSettings};
