//! Segmentation: binary thresholding and morphological opening.
//!
//! Produces the binary image ({0, 255}) that feature extraction
//! operates on. Thresholding is either Otsu's automatic level or a
//! fixed cutoff; opening removes small speckle with a square
//! structuring element.

use image::GrayImage;
use imageproc::contrast::ThresholdType;
use imageproc::distance_transform::Norm;
use serde::{Deserialize, Serialize};

/// Selects how the binary threshold level is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThresholdKind {
    /// Otsu's method: pick the level that minimizes intra-class
    /// intensity variance.
    #[default]
    Otsu,
    /// A fixed cutoff; pixels strictly above it become foreground.
    /// The reference variant that skips Otsu uses 127.
    Fixed(u8),
}

impl ThresholdKind {
    /// The fixed cutoff used by the non-Otsu reference variant.
    pub const DEFAULT_FIXED_LEVEL: u8 = 127;
}

/// Binarize a grayscale image.
///
/// Returns an image whose pixels are exactly 0 or 255. Foreground
/// (255) is everything strictly above the chosen level, so a constant
/// image thresholded at its own Otsu level comes out all-background.
#[must_use = "returns the binary image"]
pub fn threshold(image: &GrayImage, kind: ThresholdKind) -> GrayImage {
    let level = match kind {
        ThresholdKind::Otsu => imageproc::contrast::otsu_level(image),
        ThresholdKind::Fixed(level) => level,
    };
    imageproc::contrast::threshold(image, level, ThresholdType::Binary)
}

/// Morphological opening (erosion then dilation) with an `L∞` ball,
/// i.e. a square structuring element of side `2 * radius + 1`.
///
/// Removes foreground regions smaller than the element while leaving
/// larger regions essentially intact. Radius 0 is the identity.
#[must_use = "returns the opened image"]
pub fn open(image: &GrayImage, radius: u8) -> GrayImage {
    if radius == 0 {
        return image.clone();
    }

    imageproc::morphology::open(image, Norm::LInf, radius)
}
