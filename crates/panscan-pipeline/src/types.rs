//! Shared types for the panscan image analysis pipeline.

use serde::{Deserialize, Serialize};

use crate::classify::{Classification, ClassifierKind};
use crate::segment::ThresholdKind;

/// Re-export `GrayImage` so downstream crates can reference
/// intermediate raster data without depending on `image` directly.
pub use image::GrayImage;

/// Re-export `RgbImage` for the decoded original and the contour
/// overlay, which keep their color channels.
pub use image::RgbImage;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Total pixel count of the frame.
    #[must_use]
    pub const fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Scalar features derived from one segmented image.
///
/// Immutable once computed; every field is a pure function of the
/// segmented binary image. Field names match the wire format of the
/// reference service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Number of external contours found.
    pub num_contours: usize,
    /// Sum of all contour areas (shoelace, in pixels squared).
    pub total_area: f64,
    /// Largest single contour area.
    pub max_contour_area: f64,
    /// Mean circularity `4π·area / perimeter²` over all contours
    /// (0 when there are no contours).
    pub avg_circularity: f64,
    /// `total_area / image_area`; in `[0, 1]` for in-frame contours.
    pub contour_density: f64,
    /// Total contour perimeter divided by image area.
    pub edge_density: f64,
    /// Mean intensity over every pixel of the segmented image.
    pub avg_intensity: f64,
    /// Population standard deviation of pixel intensities.
    pub intensity_std: f64,
    /// Sum of squared max-normalized intensities; 0 for an all-zero
    /// image, bounded by the pixel count otherwise.
    pub texture_uniformity: f64,
    /// Mean `perimeter² / (4π·area)` over all contours (inverse of
    /// circularity; 0 when there are no contours).
    pub shape_complexity: f64,
}

/// Configuration for the analysis pipeline.
///
/// All parameters default to the values of the reference pipeline:
/// a 5×5 Gaussian kernel, Otsu auto-thresholding, a 5×5 opening
/// element, and the deterministic rule-based classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Gaussian blur sigma. Non-positive values skip the blur.
    pub blur_sigma: f32,

    /// Binary threshold selection: Otsu auto-level or a fixed cutoff.
    pub threshold: ThresholdKind,

    /// Radius of the square structuring element used for morphological
    /// opening, in pixels (`L∞` ball; radius 2 gives a 5×5 square).
    pub opening_radius: u8,

    /// Which classification strategy to apply to the feature set.
    pub classifier: ClassifierKind,
}

impl PipelineConfig {
    /// Default blur sigma, matching what OpenCV derives for a 5×5
    /// Gaussian kernel with `sigma = 0`.
    pub const DEFAULT_BLUR_SIGMA: f32 = 1.1;

    /// Default opening radius (5×5 square element).
    pub const DEFAULT_OPENING_RADIUS: u8 = 2;
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            blur_sigma: Self::DEFAULT_BLUR_SIGMA,
            threshold: ThresholdKind::default(),
            opening_radius: Self::DEFAULT_OPENING_RADIUS,
            classifier: ClassifierKind::default(),
        }
    }
}

/// Result of running the analysis pipeline on one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Scalar features computed from the segmented image.
    pub features: FeatureSet,
    /// Label, stage, and confidence produced by the classifier.
    #[serde(flatten)]
    pub classification: Classification,
    /// Dimensions of the source image in pixels.
    pub dimensions: Dimensions,
}

/// Result of running the pipeline with all intermediate rasters
/// preserved.
///
/// Each field captures the output of one pipeline stage, so callers
/// can render previews of every step of the processing chain. Does
/// not derive serde traits: the rasters are meant to be PNG-encoded
/// by the caller, not shipped as raw pixel arrays.
#[derive(Debug, Clone)]
pub struct StagedAnalysis {
    /// Stage 0: original decoded image.
    pub original: RgbImage,
    /// Stage 1: grayscale conversion.
    pub grayscale: GrayImage,
    /// Stage 2: Gaussian blur.
    pub blurred: GrayImage,
    /// Stage 3: histogram equalization.
    pub equalized: GrayImage,
    /// Stage 4: binary threshold (values {0, 255}).
    pub binary: GrayImage,
    /// Stage 5: morphological opening of the binary image.
    pub segmented: GrayImage,
    /// Stage 6: segmented image with contour boundaries highlighted.
    pub overlay: RgbImage,
    /// The scalar features and classification.
    pub analysis: Analysis,
}

/// Errors that can occur during pipeline processing.
///
/// Feature extraction and classification are total: once an image has
/// been decoded, the pipeline cannot fail.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,
}
