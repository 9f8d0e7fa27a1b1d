/// Fixture data for tests, development mode and benchmarks
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// Locations used across tests and benchmarks
pub const SAMPLE_LOCATIONS: [&str; 5] = [
    "http://example.com/",
    "https://www.rust-lang.org/learn",
    "http://en.wikipedia.org/wiki/Willow",
    "https://docs.rs/tokio/latest/tokio/",
    "http://localhost:8080/index.html?tab=2",
];

/// Encode a solid orange square as an ICO file
pub fn sample_ico(size: u32) -> Vec<u8> {
    let image = RgbaImage::from_pixel(size, size, Rgba([255, 165, 0, 255]));
    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(image)
        .write_to(&mut bytes, ImageFormat::Ico)
        .expect("encoding an in-memory ICO cannot fail");
    bytes.into_inner()
}
