//! Contour visualization overlay.
//!
//! Paints contour boundaries in green over the segmented image for
//! display purposes only. The overlay carries no information back
//! into the feature set or the classification.

use image::{Rgb, RgbImage};

use crate::features::Boundary;
use crate::types::GrayImage;

/// Highlight color for contour boundaries.
const CONTOUR_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Convert a segmented grayscale image to RGB with the contour
/// boundary pixels painted in [`CONTOUR_COLOR`].
#[must_use = "returns the overlay image"]
pub fn draw_contours(segmented: &GrayImage, contours: &[Boundary]) -> RgbImage {
    let mut overlay = RgbImage::from_fn(segmented.width(), segmented.height(), |x, y| {
        let v = segmented.get_pixel(x, y).0[0];
        Rgb([v, v, v])
    });

    for contour in contours {
        for point in contour {
            if point.x < overlay.width() && point.y < overlay.height() {
                overlay.put_pixel(point.x, point.y, CONTOUR_COLOR);
            }
        }
    }

    overlay
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::external_contours;

    #[test]
    fn overlay_dimensions_match_input() {
        let img = GrayImage::new(13, 27);
        let overlay = draw_contours(&img, &[]);
        assert_eq!(overlay.width(), 13);
        assert_eq!(overlay.height(), 27);
    }

    #[test]
    fn no_contours_produces_grayscale_copy() {
        let img = GrayImage::from_fn(4, 4, |x, y| {
            #[allow(clippy::cast_possible_truncation)]
            image::Luma([(x * 4 + y) as u8 * 16])
        });
        let overlay = draw_contours(&img, &[]);
        for (x, y, p) in overlay.enumerate_pixels() {
            let v = img.get_pixel(x, y).0[0];
            assert_eq!(p.0, [v, v, v]);
        }
    }

    #[test]
    fn contour_pixels_are_painted_green() {
        let mut img = GrayImage::new(20, 20);
        for y in 5..15 {
            for x in 5..15 {
                img.put_pixel(x, y, image::Luma([255]));
            }
        }
        let contours = external_contours(&img);
        let overlay = draw_contours(&img, &contours);

        let green = overlay
            .pixels()
            .filter(|p| p.0 == [0, 255, 0])
            .count();
        assert!(green > 0, "expected painted boundary pixels");

        // Interior of the square stays white.
        assert_eq!(overlay.get_pixel(10, 10).0, [255, 255, 255]);
    }
}
