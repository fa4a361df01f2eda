use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

use crate::profile::FitStrategy;

/// Resize geometry for one image: scale to `scaled_*`, then optionally take a
/// centred `crop_*` window. Never larger than the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizePlan {
    pub scaled_width: u32,
    pub scaled_height: u32,
    pub crop_width: u32,
    pub crop_height: u32,
}

impl ResizePlan {
    pub fn compute(
        orig_width: u32,
        orig_height: u32,
        target_width: u32,
        target_height: u32,
        fit: FitStrategy,
    ) -> Self {
        let orig_width = orig_width.max(1);
        let orig_height = orig_height.max(1);
        let target_width = target_width.max(1);
        let target_height = target_height.max(1);

        let width_ratio = target_width as f64 / orig_width as f64;
        let height_ratio = target_height as f64 / orig_height as f64;

        match fit {
            FitStrategy::Inside => {
                let scale = width_ratio.min(height_ratio).min(1.0);
                let scaled_width = scale_side(orig_width, scale).min(target_width);
                let scaled_height = scale_side(orig_height, scale).min(target_height);
                ResizePlan {
                    scaled_width,
                    scaled_height,
                    crop_width: scaled_width,
                    crop_height: scaled_height,
                }
            }
            FitStrategy::Cover => {
                let scale = width_ratio.max(height_ratio).min(1.0);
                let scaled_width = scale_side(orig_width, scale);
                let scaled_height = scale_side(orig_height, scale);
                ResizePlan {
                    scaled_width,
                    scaled_height,
                    crop_width: scaled_width.min(target_width),
                    crop_height: scaled_height.min(target_height),
                }
            }
        }
    }

    pub fn is_identity(&self, orig_width: u32, orig_height: u32) -> bool {
        self.scaled_width == orig_width
            && self.scaled_height == orig_height
            && self.crop_width == orig_width
            && self.crop_height == orig_height
    }

    pub fn apply(&self, img: &DynamicImage) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        if self.is_identity(orig_width, orig_height) {
            return img.clone();
        }

        let scaled = if self.scaled_width == orig_width && self.scaled_height == orig_height {
            img.clone()
        } else {
            let filter =
                select_filter(orig_width, orig_height, self.scaled_width, self.scaled_height);
            img.resize_exact(self.scaled_width, self.scaled_height, filter)
        };

        if self.crop_width == self.scaled_width && self.crop_height == self.scaled_height {
            return scaled;
        }

        let x = (self.scaled_width - self.crop_width) / 2;
        let y = (self.scaled_height - self.crop_height) / 2;
        scaled.crop_imm(x, y, self.crop_width, self.crop_height)
    }
}

fn scale_side(side: u32, scale: f64) -> u32 {
    ((side as f64 * scale).round() as u32).clamp(1, side)
}

/// Cheaper filters for large reductions, Lanczos for small ones.
pub fn select_filter(
    orig_width: u32,
    orig_height: u32,
    new_width: u32,
    new_height: u32,
) -> FilterType {
    let width_ratio = orig_width as f32 / new_width.max(1) as f32;
    let height_ratio = orig_height as f32 / new_height.max(1) as f32;
    let max_ratio = width_ratio.max(height_ratio);

    if max_ratio > 2.0 {
        FilterType::Triangle
    } else if max_ratio > 1.5 {
        FilterType::CatmullRom
    } else {
        FilterType::Lanczos3
    }
}
