//! Image decoding: raw upload bytes in, pixel buffers out.
//!
//! Accepts whatever the `image` crate can decode with the enabled
//! format features (PNG, JPEG, BMP, WebP). The grayscale conversion
//! uses the standard luminance formula `0.299*R + 0.587*G + 0.114*B`.

use image::{GrayImage, RgbImage};

use crate::types::PipelineError;

/// Decode raw image bytes and convert to grayscale.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
#[must_use = "returns the decoded grayscale image"]
pub fn decode_and_grayscale(bytes: &[u8]) -> Result<GrayImage, PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    Ok(img.to_luma8())
}

/// Decode raw image bytes keeping the color channels.
///
/// Used for the "original" preview stage only; all processing happens
/// on the grayscale conversion.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if decoding fails.
#[must_use = "returns the decoded color image"]
pub fn decode_original(bytes: &[u8]) -> Result<RgbImage, PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    Ok(img.to_rgb8())
}
