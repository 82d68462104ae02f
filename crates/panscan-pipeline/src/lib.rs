//! panscan-pipeline: Pure image analysis pipeline (sans-IO).
//!
//! Turns an uploaded image into a classification through:
//! decode -> grayscale -> blur -> histogram equalization ->
//! threshold -> morphological opening -> contour features ->
//! rule ladder.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and returns structured data. HTTP transport lives in
//! `panscan-server`, filesystem access in `panscan-cli`.
//!
//! The classification is demonstration material: a fixed threshold
//! ladder over a handful of contour and intensity scalars, with
//! hand-picked cutoffs and constant confidences. It has no diagnostic
//! validity.

pub mod classify;
pub mod decode;
pub mod features;
pub mod overlay;
pub mod preprocess;
pub mod segment;
pub mod types;

pub use classify::{Classification, Classifier, ClassifierKind, FindingRegion, Stage, TumorClass};
pub use segment::ThresholdKind;
pub use types::{
    Analysis, Dimensions, FeatureSet, GrayImage, PipelineConfig, PipelineError, RgbImage,
    StagedAnalysis,
};

/// Run the full analysis pipeline.
///
/// Takes raw image bytes (PNG, JPEG, BMP, WebP) and a configuration,
/// and produces the feature set and classification. Once the image
/// decodes, the remaining stages are total: any well-formed frame
/// yields a classification.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `image_bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
pub fn analyze(image_bytes: &[u8], config: &PipelineConfig) -> Result<Analysis, PipelineError> {
    // 1. Decode and convert to grayscale.
    let gray = decode::decode_and_grayscale(image_bytes)?;
    let dimensions = Dimensions {
        width: gray.width(),
        height: gray.height(),
    };

    // 2. Gaussian blur.
    let blurred = preprocess::gaussian_blur(&gray, config.blur_sigma);

    // 3. Histogram equalization.
    let equalized = preprocess::equalize(&blurred);

    // 4. Binary threshold + morphological opening.
    let binary = segment::threshold(&equalized, config.threshold);
    let segmented = segment::open(&binary, config.opening_radius);

    // 5. Contour features.
    let contours = features::external_contours(&segmented);
    let feature_set = features::extract_features(&segmented, &contours);

    // 6. Classification.
    let classification = config.classifier.classify(&feature_set);

    Ok(Analysis {
        features: feature_set,
        classification,
        dimensions,
    })
}

/// Run the pipeline preserving every intermediate raster.
///
/// Produces the same [`Analysis`] as [`analyze`] plus the per-stage
/// images (original, grayscale, blurred, equalized, binary, opened,
/// contour overlay) for display.
///
/// # Errors
///
/// Same failure modes as [`analyze`].
pub fn analyze_staged(
    image_bytes: &[u8],
    config: &PipelineConfig,
) -> Result<StagedAnalysis, PipelineError> {
    let original = decode::decode_original(image_bytes)?;
    let gray = decode::decode_and_grayscale(image_bytes)?;
    let dimensions = Dimensions {
        width: gray.width(),
        height: gray.height(),
    };

    let blurred = preprocess::gaussian_blur(&gray, config.blur_sigma);
    let equalized = preprocess::equalize(&blurred);
    let binary = segment::threshold(&equalized, config.threshold);
    let segmented = segment::open(&binary, config.opening_radius);

    let contours = features::external_contours(&segmented);
    let feature_set = features::extract_features(&segmented, &contours);
    let overlay = overlay::draw_contours(&segmented, &contours);

    let classification = config.classifier.classify(&feature_set);

    Ok(StagedAnalysis {
        original,
        grayscale: gray,
        blurred,
        equalized,
        binary,
        segmented,
        overlay,
        analysis: Analysis {
            features: feature_set,
            classification,
            dimensions,
        },
    })
}
