//! Feature extraction: contour geometry and intensity statistics.
//!
//! Operates on the segmented binary image. Contours come from
//! [`imageproc::contours::find_contours`] (Suzuki-Abe border
//! following); the per-contour geometry (shoelace area, closed arc
//! length) is computed here since `imageproc` exposes the boundary
//! points but not these aggregates.

use image::GrayImage;
use imageproc::contours::find_contours;
use imageproc::point::Point;

use crate::types::{Dimensions, FeatureSet};

/// Boundary points of one external contour, in tracing order.
pub type Boundary = Vec<Point<u32>>;

/// Find the external contours of a binary image.
///
/// Keeps only top-level contours (no parent), matching OpenCV's
/// `RETR_EXTERNAL` retrieval mode, and drops degenerate boundaries of
/// fewer than 3 points, which have no enclosed area.
#[must_use]
pub fn external_contours(segmented: &GrayImage) -> Vec<Boundary> {
    find_contours::<u32>(segmented)
        .into_iter()
        .filter(|c| c.parent.is_none() && c.points.len() >= 3)
        .map(|c| c.points)
        .collect()
}

/// Polygon area of a closed boundary via the shoelace formula.
fn contour_area(points: &[Point<u32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let mut twice_area = 0.0;
    for (i, p) in points.iter().enumerate() {
        let q = &points[(i + 1) % points.len()];
        let (px, py) = (f64::from(p.x), f64::from(p.y));
        let (qx, qy) = (f64::from(q.x), f64::from(q.y));
        twice_area += px.mul_add(qy, -(qx * py));
    }
    twice_area.abs() / 2.0
}

/// Closed arc length of a boundary: the sum of Euclidean distances
/// between consecutive points, including the closing segment.
fn contour_perimeter(points: &[Point<u32>]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    let mut length = 0.0;
    for (i, p) in points.iter().enumerate() {
        let q = &points[(i + 1) % points.len()];
        let dx = f64::from(p.x) - f64::from(q.x);
        let dy = f64::from(p.y) - f64::from(q.y);
        length += dx.hypot(dy);
    }
    length
}

/// Compute the scalar feature set for a segmented binary image.
///
/// All features are pure functions of `segmented` and `contours`;
/// densities are left at 0 when there are no contours, matching the
/// reference implementation.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn extract_features(segmented: &GrayImage, contours: &[Boundary]) -> FeatureSet {
    let dimensions = Dimensions {
        width: segmented.width(),
        height: segmented.height(),
    };
    let image_area = dimensions.area() as f64;

    let mut total_area = 0.0;
    let mut max_contour_area = 0.0f64;
    let mut total_perimeter = 0.0;
    let mut circularity_sum = 0.0;
    let mut complexity_sum = 0.0;

    for contour in contours {
        let area = contour_area(contour);
        let perimeter = contour_perimeter(contour);
        total_area += area;
        total_perimeter += perimeter;
        max_contour_area = max_contour_area.max(area);

        if perimeter > 0.0 {
            circularity_sum += 4.0 * std::f64::consts::PI * area / (perimeter * perimeter);
        }
        if area > 0.0 {
            complexity_sum += perimeter * perimeter / (4.0 * std::f64::consts::PI * area);
        }
    }

    let num_contours = contours.len();
    let (avg_circularity, shape_complexity, contour_density, edge_density) = if num_contours > 0 {
        let n = num_contours as f64;
        (
            circularity_sum / n,
            complexity_sum / n,
            total_area / image_area,
            total_perimeter / image_area,
        )
    } else {
        (0.0, 0.0, 0.0, 0.0)
    };

    let (avg_intensity, intensity_std) = intensity_stats(segmented);

    FeatureSet {
        num_contours,
        total_area,
        max_contour_area,
        avg_circularity,
        contour_density,
        edge_density,
        avg_intensity,
        intensity_std,
        texture_uniformity: texture_uniformity(segmented),
        shape_complexity,
    }
}

/// Mean and population standard deviation of all pixel intensities.
#[allow(clippy::cast_precision_loss)]
fn intensity_stats(image: &GrayImage) -> (f64, f64) {
    let count = image.as_raw().len();
    if count == 0 {
        return (0.0, 0.0);
    }

    let n = count as f64;
    let sum: f64 = image.as_raw().iter().map(|&v| f64::from(v)).sum();
    let mean = sum / n;
    let variance: f64 = image
        .as_raw()
        .iter()
        .map(|&v| {
            let d = f64::from(v) - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    (mean, variance.sqrt())
}

/// Sum of squared max-normalized intensities.
///
/// 0 when the image maximum is 0; otherwise bounded above by the
/// pixel count (every normalized term is at most 1).
fn texture_uniformity(image: &GrayImage) -> f64 {
    let max = image.as_raw().iter().copied().max().unwrap_or(0);
    if max == 0 {
        return 0.0;
    }

    let max = f64::from(max);
    image
        .as_raw()
        .iter()
        .map(|&v| {
            let normalized = f64::from(v) / max;
            normalized * normalized
        })
        .sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Binary image with a filled `side`-pixel square at `(origin, origin)`.
    fn square_image(size: u32, origin: u32, side: u32) -> GrayImage {
        GrayImage::from_fn(size, size, |x, y| {
            if x >= origin && x < origin + side && y >= origin && y < origin + side {
                image::Luma([255])
            } else {
                image::Luma([0])
            }
        })
    }

    /// Binary image with a filled circle of radius `r` centered in frame.
    fn circle_image(size: u32, r: u32) -> GrayImage {
        let c = f64::from(size) / 2.0;
        GrayImage::from_fn(size, size, |x, y| {
            let dx = f64::from(x) - c;
            let dy = f64::from(y) - c;
            if dx.hypot(dy) <= f64::from(r) {
                image::Luma([255])
            } else {
                image::Luma([0])
            }
        })
    }

    #[test]
    fn all_black_image_has_zero_features() {
        let img = GrayImage::new(100, 100);
        let contours = external_contours(&img);
        assert!(contours.is_empty());

        let features = extract_features(&img, &contours);
        assert_eq!(features.num_contours, 0);
        assert!(features.total_area.abs() < f64::EPSILON);
        assert!(features.contour_density.abs() < f64::EPSILON);
        assert!(features.edge_density.abs() < f64::EPSILON);
        assert!(features.avg_circularity.abs() < f64::EPSILON);
        assert!(features.avg_intensity.abs() < f64::EPSILON);
        assert!(features.texture_uniformity.abs() < f64::EPSILON);
    }

    #[test]
    fn square_features_match_geometry() {
        // A 10x10 filled square traces a boundary through the outermost
        // pixel centers: a 9x9 polygon with area 81 and perimeter 36.
        let img = square_image(30, 10, 10);
        let contours = external_contours(&img);
        assert_eq!(contours.len(), 1);

        let features = extract_features(&img, &contours);
        assert!((features.total_area - 81.0).abs() < 1e-9);
        assert!((features.max_contour_area - 81.0).abs() < 1e-9);
        assert!((features.contour_density - 81.0 / 900.0).abs() < 1e-9);

        // Circularity of a square is pi/4.
        let expected = std::f64::consts::PI / 4.0;
        assert!(
            (features.avg_circularity - expected).abs() < 1e-9,
            "got {}",
            features.avg_circularity,
        );
    }

    #[test]
    fn circle_boundary_circularity_near_one() {
        // Synthetic high-resolution circle polygon: circularity must be
        // 1.0 within numerical tolerance.
        let r = 10_000.0;
        let n = 1_000;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let points: Boundary = (0..n)
            .map(|i| {
                let theta = 2.0 * std::f64::consts::PI * f64::from(i) / f64::from(n);
                Point::new(
                    theta.cos().mul_add(r, 2.0 * r).round() as u32,
                    theta.sin().mul_add(r, 2.0 * r).round() as u32,
                )
            })
            .collect();

        let area = contour_area(&points);
        let perimeter = contour_perimeter(&points);
        let circularity = 4.0 * std::f64::consts::PI * area / (perimeter * perimeter);
        assert!(
            (circularity - 1.0).abs() < 1e-3,
            "expected circularity ~1.0, got {circularity}",
        );
    }

    #[test]
    fn rasterized_circle_lands_in_expected_density_band() {
        let img = circle_image(100, 30);
        let contours = external_contours(&img);
        assert_eq!(contours.len(), 1);

        let features = extract_features(&img, &contours);
        // pi * 30^2 / 10000 ~ 0.283; rasterization shifts it slightly.
        assert!(
            features.contour_density > 0.2 && features.contour_density <= 0.4,
            "density {} outside (0.2, 0.4]",
            features.contour_density,
        );
        // The digital boundary overestimates the true perimeter, so
        // circularity comes out below 1.0 but well above the 0.6 cutoff.
        assert!(
            features.avg_circularity > 0.7 && features.avg_circularity <= 1.05,
            "circularity {} outside expected range",
            features.avg_circularity,
        );
        assert!(features.shape_complexity < 1.5);
    }

    #[test]
    fn contour_density_stays_in_unit_interval() {
        // Foreground covering the whole frame still has density <= 1.
        let img = GrayImage::from_pixel(50, 50, image::Luma([255]));
        let contours = external_contours(&img);
        let features = extract_features(&img, &contours);
        assert!(
            features.contour_density >= 0.0 && features.contour_density <= 1.0,
            "density {} outside [0, 1]",
            features.contour_density,
        );
    }

    #[test]
    fn texture_uniformity_counts_foreground_in_binary_image() {
        // For a {0, 255} image every foreground term is exactly 1.
        let img = square_image(30, 10, 10);
        let features = extract_features(&img, &external_contours(&img));
        assert!((features.texture_uniformity - 100.0).abs() < 1e-9);
        assert!(features.texture_uniformity <= 900.0);
    }

    #[test]
    fn intensity_stats_of_binary_square() {
        let img = square_image(30, 10, 10);
        let features = extract_features(&img, &external_contours(&img));
        // 100 of 900 pixels at 255.
        let expected_mean = 255.0 * 100.0 / 900.0;
        assert!((features.avg_intensity - expected_mean).abs() < 1e-9);
        assert!(features.intensity_std > 0.0);
    }

    #[test]
    fn degenerate_boundaries_are_dropped() {
        let mut img = GrayImage::new(20, 20);
        img.put_pixel(5, 5, image::Luma([255]));
        let contours = external_contours(&img);
        for c in &contours {
            assert!(c.len() >= 3);
        }
    }
}
