//! Background whiteness detection over border regions.
//!
//! A full-frame background check is impossible without segmenting the
//! subject out of the photo, so the check samples only where background is
//! guaranteed to be visible on a conforming ID photo: the four corners and
//! the four outer edge strips. Eight regions total — four 10×10 corner
//! blocks and four 5-pixel-wide strips spanning the full width/height.
//!
//! Each region passes when at least `frac_min` of its pixels have a BT.601
//! gray value of `threshold` or more; the image passes only when every
//! samplable region passes. This is a border approximation by contract —
//! a white-rimmed photo with a coloured centre backdrop will pass.

use image::RgbImage;

/// A sampling window in pixel coordinates, end-exclusive.
type Region = (u32, u32, u32, u32);

/// Check whether the border regions of `img` are uniformly near-white.
///
/// Returns `false` when any sampled region has a bright-pixel fraction
/// below `frac_min`, and also when no region could be sampled at all
/// (zero-sized input).
pub fn is_white(img: &RgbImage, threshold: u8, frac_min: f32) -> bool {
    let (w, h) = (img.width(), img.height());

    let corner = 10u32;
    let strip = 5u32;

    // Windows are clamped to the image bounds; on small inputs the corners
    // overlap and the strips cover the whole frame, which only makes the
    // check stricter, never lenient.
    let regions: [Region; 8] = [
        // Corner blocks
        (0, 0, corner.min(w), corner.min(h)),
        (w.saturating_sub(corner), 0, w, corner.min(h)),
        (0, h.saturating_sub(corner), corner.min(w), h),
        (w.saturating_sub(corner), h.saturating_sub(corner), w, h),
        // Edge strips: top, bottom, left, right
        (0, 0, w, strip.min(h)),
        (0, h.saturating_sub(strip), w, h),
        (0, 0, strip.min(w), h),
        (w.saturating_sub(strip), 0, w, h),
    ];

    let mut sampled = false;
    for &(x0, y0, x1, y1) in &regions {
        if x1 <= x0 || y1 <= y0 {
            continue;
        }
        sampled = true;
        if bright_fraction(img, x0, y0, x1, y1, threshold) < frac_min {
            return false;
        }
    }
    sampled
}

/// Fraction of pixels in the window whose gray value is >= `threshold`.
fn bright_fraction(img: &RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, threshold: u8) -> f32 {
    let mut bright = 0u64;
    let mut total = 0u64;
    for y in y0..y1 {
        for x in x0..x1 {
            if luma(img.get_pixel(x, y).0) >= threshold {
                bright += 1;
            }
            total += 1;
        }
    }
    bright as f32 / total as f32
}

/// ITU-R BT.601 luminance of an RGB triple.
fn luma([r, g, b]: [u8; 3]) -> u8 {
    (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const THRESHOLD: u8 = 245;
    const FRAC_MIN: f32 = 0.98;

    fn white_image(w: u32, h: u32) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb([255, 255, 255]))
    }

    #[test]
    fn all_white_passes() {
        assert!(is_white(&white_image(240, 288), THRESHOLD, FRAC_MIN));
    }

    #[test]
    fn single_dark_corner_fails() {
        let mut img = white_image(240, 288);
        for y in 0..10 {
            for x in 0..10 {
                img.put_pixel(x, y, Rgb([40, 40, 200]));
            }
        }
        assert!(!is_white(&img, THRESHOLD, FRAC_MIN));
    }

    #[test]
    fn dark_centre_still_passes() {
        // Border-only approximation: the subject area is never sampled.
        let mut img = white_image(240, 288);
        for y in 60..220 {
            for x in 40..200 {
                img.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }
        assert!(is_white(&img, THRESHOLD, FRAC_MIN));
    }

    #[test]
    fn dark_edge_strip_fails() {
        let mut img = white_image(240, 288);
        for x in 0..240 {
            img.put_pixel(x, 287, Rgb([128, 128, 128]));
        }
        // Bottom strip is 5 rows of 240 px; one fully dark row is 20%,
        // well past the 2% tolerance.
        assert!(!is_white(&img, THRESHOLD, FRAC_MIN));
    }

    #[test]
    fn near_white_above_threshold_passes() {
        let img = RgbImage::from_pixel(240, 288, Rgb([250, 250, 250]));
        assert!(is_white(&img, THRESHOLD, FRAC_MIN));
    }

    #[test]
    fn just_below_threshold_fails() {
        let img = RgbImage::from_pixel(240, 288, Rgb([240, 240, 240]));
        assert!(!is_white(&img, THRESHOLD, FRAC_MIN));
    }

    #[test]
    fn tiny_image_is_sampled_whole() {
        assert!(is_white(&white_image(4, 4), THRESHOLD, FRAC_MIN));
        let dark = RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]));
        assert!(!is_white(&dark, THRESHOLD, FRAC_MIN));
    }
}
