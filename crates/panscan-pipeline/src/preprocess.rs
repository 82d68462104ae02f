//! Preprocessing: Gaussian blur and histogram equalization.
//!
//! Wraps [`imageproc::filter::gaussian_blur_f32`] and
//! [`imageproc::contrast::equalize_histogram`]. Both operations are
//! fixed-parameter noise/contrast conditioning ahead of segmentation.

use image::GrayImage;

/// Apply Gaussian blur to a grayscale image.
///
/// Higher `sigma` values produce more smoothing. Non-positive sigma
/// values return the image unchanged, since `imageproc`'s underlying
/// function panics on `sigma <= 0.0`.
#[must_use = "returns the blurred image"]
pub fn gaussian_blur(image: &GrayImage, sigma: f32) -> GrayImage {
    if sigma <= 0.0 {
        return image.clone();
    }

    imageproc::filter::gaussian_blur_f32(image, sigma)
}

/// Equalize the intensity histogram of a grayscale image.
///
/// Spreads the cumulative intensity distribution across the full
/// `[0, 255]` range to boost contrast before thresholding.
///
/// A constant image is returned unchanged: its histogram occupies a
/// single bin, and equalizing it would relocate every pixel to 255,
/// turning an all-black frame into an all-white one.
#[must_use = "returns the equalized image"]
pub fn equalize(image: &GrayImage) -> GrayImage {
    let mut pixels = image.pixels();
    let constant = match pixels.next() {
        Some(first) => pixels.all(|p| p == first),
        None => true,
    };
    if constant {
        return image.clone();
    }

    imageproc::contrast::equalize_histogram(image)
}
