use image::{DynamicImage, GenericImageView};

use crate::error::ProcessingError;

/// libwebp refuses larger canvases.
const WEBP_MAX_SIDE: u32 = 16_383;

/// Encode to progressive JPEG with mozjpeg's optimized Huffman tables.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, ProcessingError> {
    let rgb_img = img.to_rgb8();
    let (width, height) = rgb_img.dimensions();

    let encode_err = |e: std::io::Error| ProcessingError::Encode {
        encoding: "jpeg",
        reason: e.to_string(),
    };

    let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
    comp.set_size(width as usize, height as usize);
    comp.set_quality(quality as f32);
    comp.set_progressive_mode();
    comp.set_optimize_coding(true);

    let mut comp = comp.start_compress(Vec::new()).map_err(encode_err)?;
    comp.write_scanlines(&rgb_img).map_err(encode_err)?;
    comp.finish().map_err(encode_err)
}

/// Encode to lossy WebP.
pub fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, ProcessingError> {
    let (width, height) = img.dimensions();
    if width > WEBP_MAX_SIDE || height > WEBP_MAX_SIDE {
        return Err(ProcessingError::Encode {
            encoding: "webp",
            reason: format!(
                "{}x{} exceeds the maximum WebP dimension of {}",
                width, height, WEBP_MAX_SIDE
            ),
        });
    }

    let rgba_img = img.to_rgba8();
    let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
    let webp_data = encoder.encode(quality as f32);

    Ok(webp_data.to_vec())
}
