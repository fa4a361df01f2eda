//! Test fixtures: generated images and listing bodies.

#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::{json, Value};
use std::io::Cursor;

/// A real PNG with a gradient so encoders have something to chew on.
pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .expect("Failed to encode test PNG");
    buffer
}

/// PNG signature followed by garbage.
pub fn create_corrupt_png() -> Vec<u8> {
    let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(b"this is not really an image");
    data
}

/// A complete, valid create-ad body for an apartment for sale.
pub fn listing_body(address: &str) -> Value {
    json!({
        "photos": [
            "https://cdn.example.com/uploads/a.jpg",
            {"url": "https://cdn.example.com/uploads/b.jpg", "key": "uploads/x/b.jpg"}
        ],
        "description": "Light-filled apartment close to the harbour",
        "address": address,
        "propertyType": "Apartment",
        "price": "850000",
        "action": "Sell",
        "bedrooms": 2,
        "bathrooms": 1,
        "carpark": 1
    })
}
