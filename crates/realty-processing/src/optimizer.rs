use std::io::Cursor;
use std::time::Instant;

use bytes::Bytes;
use image::{DynamicImage, GenericImageView, ImageReader};

use crate::compression::{encode_jpeg, encode_webp};
use crate::error::ProcessingError;
use crate::profile::{OptimizationProfile, OutputEncoding};
use crate::resize::ResizePlan;

/// Result of a successful optimization
#[derive(Debug, Clone)]
pub struct OptimizedImage {
    pub data: Bytes,
    pub width: u32,
    pub height: u32,
    pub encoding: OutputEncoding,
    pub profile: OptimizationProfile,
}

impl OptimizedImage {
    pub fn content_type(&self) -> &'static str {
        self.encoding.to_mime_type()
    }
}

/// Stateless image optimizer. Cheap to clone and safe to share between tasks;
/// [`ImageOptimizer::optimize`] is CPU-bound and should run on a blocking thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageOptimizer;

impl ImageOptimizer {
    pub fn new() -> Self {
        ImageOptimizer
    }

    /// Resize `data` into the profile's box without upscaling, then re-encode.
    pub fn optimize(
        &self,
        data: &[u8],
        profile: OptimizationProfile,
    ) -> Result<OptimizedImage, ProcessingError> {
        let start = Instant::now();
        let settings = profile.settings();

        let img = decode(data)?;
        let (orig_width, orig_height) = img.dimensions();

        let plan = ResizePlan::compute(
            orig_width,
            orig_height,
            settings.width,
            settings.height,
            settings.fit,
        );
        let resized = plan.apply(&img);
        let (width, height) = resized.dimensions();

        let encoded = match settings.encoding {
            OutputEncoding::Jpeg => encode_jpeg(&resized, settings.quality)?,
            OutputEncoding::WebP => encode_webp(&resized, settings.quality)?,
        };

        tracing::debug!(
            profile = profile.name(),
            orig_width,
            orig_height,
            width,
            height,
            input_bytes = data.len(),
            output_bytes = encoded.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image optimized"
        );

        Ok(OptimizedImage {
            data: Bytes::from(encoded),
            width,
            height,
            encoding: settings.encoding,
            profile,
        })
    }
}

fn decode(data: &[u8]) -> Result<DynamicImage, ProcessingError> {
    if data.is_empty() {
        return Err(ProcessingError::Decode("input buffer is empty".to_string()));
    }

    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ProcessingError::Decode(e.to_string()))?
        .decode()
        .map_err(|e| ProcessingError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]));
        let mut buffer = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[test]
    fn test_output_fits_every_profile() {
        let input = png_bytes(2400, 1800);
        let optimizer = ImageOptimizer::new();
        for profile in OptimizationProfile::ALL {
            let settings = profile.settings();
            let out = optimizer.optimize(&input, profile).unwrap();
            let decoded = image::load_from_memory(&out.data).unwrap();
            assert_eq!(decoded.dimensions(), (out.width, out.height));
            assert!(out.width <= settings.width, "{:?}", profile);
            assert!(out.height <= settings.height, "{:?}", profile);
        }
    }

    #[test]
    fn test_small_input_is_not_upscaled() {
        let input = png_bytes(120, 90);
        let optimizer = ImageOptimizer::new();
        for profile in OptimizationProfile::ALL {
            let out = optimizer.optimize(&input, profile).unwrap();
            assert!(out.width <= 120 && out.height <= 90, "{:?}", profile);
        }
    }

    #[test]
    fn test_thumbnail_is_square_crop() {
        let out = ImageOptimizer::new()
            .optimize(&png_bytes(1600, 900), OptimizationProfile::Thumbnail)
            .unwrap();
        assert_eq!((out.width, out.height), (400, 400));
        assert_eq!(out.content_type(), "image/jpeg");
    }

    #[test]
    fn test_webp_profile_encodes_webp() {
        let out = ImageOptimizer::new()
            .optimize(&png_bytes(300, 200), OptimizationProfile::WebP)
            .unwrap();
        assert_eq!(image::guess_format(&out.data).unwrap(), ImageFormat::WebP);
        assert_eq!(out.encoding.as_str(), "webp");
    }

    #[test]
    fn test_corrupt_input_reports_reason() {
        let err = ImageOptimizer::new()
            .optimize(b"definitely not an image", OptimizationProfile::Standard)
            .unwrap_err();
        match err {
            ProcessingError::Decode(reason) => assert!(!reason.is_empty()),
            other => panic!("Expected Decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input_rejected() {
        let err = ImageOptimizer::new()
            .optimize(&[], OptimizationProfile::Standard)
            .unwrap_err();
        assert!(err.to_string().contains("empty"));
    }
}
