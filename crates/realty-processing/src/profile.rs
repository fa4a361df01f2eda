use serde::{Deserialize, Serialize};

/// How an image is fitted into the profile's target box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitStrategy {
    /// Fill the box, centre-cropping the overflow
    Cover,
    /// Fit entirely within the box, preserving aspect ratio
    Inside,
}

/// Output encoding for optimized images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputEncoding {
    Jpeg,
    WebP,
}

impl OutputEncoding {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputEncoding::Jpeg => "jpeg",
            OutputEncoding::WebP => "webp",
        }
    }

    pub fn to_mime_type(self) -> &'static str {
        match self {
            OutputEncoding::Jpeg => "image/jpeg",
            OutputEncoding::WebP => "image/webp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileSettings {
    /// Encoder quality, 0-100
    pub quality: u8,
    pub width: u32,
    pub height: u32,
    pub fit: FitStrategy,
    pub encoding: OutputEncoding,
}

/// Named optimization profiles accepted through the `profile` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OptimizationProfile {
    Thumbnail,
    #[default]
    Standard,
    HighQuality,
    WebP,
}

impl OptimizationProfile {
    pub const ALL: [OptimizationProfile; 4] = [
        OptimizationProfile::Thumbnail,
        OptimizationProfile::Standard,
        OptimizationProfile::HighQuality,
        OptimizationProfile::WebP,
    ];

    /// Resolve a profile by name. Unknown or absent names select `Standard`.
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(|n| n.trim().to_lowercase()).as_deref() {
            Some("thumbnail") => OptimizationProfile::Thumbnail,
            Some("highquality") | Some("high_quality") => OptimizationProfile::HighQuality,
            Some("webp") => OptimizationProfile::WebP,
            _ => OptimizationProfile::Standard,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OptimizationProfile::Thumbnail => "thumbnail",
            OptimizationProfile::Standard => "standard",
            OptimizationProfile::HighQuality => "highQuality",
            OptimizationProfile::WebP => "webp",
        }
    }

    pub fn settings(self) -> ProfileSettings {
        match self {
            OptimizationProfile::Thumbnail => ProfileSettings {
                quality: 70,
                width: 400,
                height: 400,
                fit: FitStrategy::Cover,
                encoding: OutputEncoding::Jpeg,
            },
            OptimizationProfile::Standard => ProfileSettings {
                quality: 80,
                width: 1200,
                height: 800,
                fit: FitStrategy::Inside,
                encoding: OutputEncoding::Jpeg,
            },
            OptimizationProfile::HighQuality => ProfileSettings {
                quality: 90,
                width: 1920,
                height: 1080,
                fit: FitStrategy::Inside,
                encoding: OutputEncoding::Jpeg,
            },
            OptimizationProfile::WebP => ProfileSettings {
                quality: 80,
                width: 1200,
                height: 800,
                fit: FitStrategy::Inside,
                encoding: OutputEncoding::WebP,
            },
        }
    }
}
