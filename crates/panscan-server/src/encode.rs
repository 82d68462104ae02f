//! Inline PNG previews for pipeline stages.
//!
//! Converts intermediate rasters to `data:image/png;base64,...` URLs
//! so the response can carry every processing step without the server
//! persisting any files.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageEncoder;
use panscan_pipeline::{GrayImage, RgbImage};

/// Errors that can occur during raster-to-data-URL conversion.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    PngEncode(#[from] image::ImageError),
}

/// Encode a `GrayImage` as an inline PNG data URL.
///
/// # Errors
///
/// Returns [`EncodeError::PngEncode`] if PNG encoding fails.
pub fn gray_to_data_url(image: &GrayImage) -> Result<String, EncodeError> {
    let mut png_bytes = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ExtendedColorType::L8,
    )?;
    Ok(to_data_url(&png_bytes))
}

/// Encode an `RgbImage` as an inline PNG data URL.
///
/// # Errors
///
/// Returns [`EncodeError::PngEncode`] if PNG encoding fails.
pub fn rgb_to_data_url(image: &RgbImage) -> Result<String, EncodeError> {
    let mut png_bytes = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ExtendedColorType::Rgb8,
    )?;
    Ok(to_data_url(&png_bytes))
}

fn to_data_url(png_bytes: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png_bytes))
}
