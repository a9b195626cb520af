//! Correction: normalize, fit to the target geometry, encode under budget.
//!
//! ## Why re-encode in a loop?
//!
//! JPEG size at a given quality depends on image content, so no single
//! quality setting can guarantee the 50 KB ceiling. The corrector starts at
//! the spec's quality (85 — visually transparent for ID photos) and steps
//! down by 10 until the output fits or the floor (25) is reached. The loop
//! is bounded by construction: at most
//! [`crate::PhotoSpec::max_encode_passes`] encodes (7 with the defaults).
//! Hitting the floor while still over budget is reported honestly in the
//! result rather than hidden.
//!
//! The resize forces the exact target dimensions, so pasting the result
//! onto a white canvas at the origin is a recompose rather than a crop; it
//! exists to guarantee an opaque white backing regardless of what the
//! resize produced.

use crate::config::PhotoSpec;
use crate::error::FotocheckError;
use crate::pipeline::normalize;
use crate::report::CorrectionResult;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use jpeg_encoder::{ColorType, Density, Encoder, SamplingFactor};
use tracing::debug;

/// Correct raw upload bytes into a conforming SUNEDU JPEG.
///
/// Steps: normalize (decode + EXIF orientation + alpha flatten), resize to
/// exactly `spec.width`×`spec.height` with Lanczos3, recompose onto an
/// opaque white canvas, then encode as a progressive 4:2:0 JPEG tagged with
/// the spec's DPI, stepping quality down until the size budget holds or the
/// quality floor is reached.
///
/// # Errors
/// Only [`FotocheckError::DecodeFailed`] (inherited from normalization) and
/// [`FotocheckError::EncodeFailed`]; every rule violation is fixed, not
/// rejected.
pub fn correct(bytes: &[u8], spec: &PhotoSpec) -> Result<CorrectionResult, FotocheckError> {
    let grid = normalize::normalize(bytes)?;

    let resized = imageops::resize(&grid, spec.width, spec.height, FilterType::Lanczos3);
    let mut canvas = RgbImage::from_pixel(spec.width, spec.height, Rgb([255, 255, 255]));
    imageops::overlay(&mut canvas, &resized, 0, 0);

    let mut quality = spec.start_quality;
    let mut encoded = encode_jpeg(&canvas, quality, spec)?;
    while encoded.len() > spec.max_bytes && quality > spec.quality_floor {
        quality = quality
            .saturating_sub(spec.quality_step)
            .max(spec.quality_floor);
        encoded = encode_jpeg(&canvas, quality, spec)?;
        debug!(quality, size = encoded.len(), "re-encoded under size budget");
    }

    if encoded.len() > spec.max_bytes {
        debug!(
            quality,
            size = encoded.len(),
            ceiling = spec.max_bytes,
            "quality floor reached, size budget not met"
        );
    }

    Ok(CorrectionResult {
        size_bytes: encoded.len(),
        quality,
        bytes: encoded,
    })
}

/// Encode an RGB grid as a progressive JPEG with the spec's density tag.
fn encode_jpeg(img: &RgbImage, quality: u8, spec: &PhotoSpec) -> Result<Vec<u8>, FotocheckError> {
    let mut buf = Vec::new();
    let mut encoder = Encoder::new(&mut buf, quality);
    encoder.set_density(Density::Inch {
        x: spec.dpi.0 as u16,
        y: spec.dpi.1 as u16,
    });
    encoder.set_progressive(true);
    encoder.set_sampling_factor(SamplingFactor::F_2_2); // 4:2:0 chroma subsampling
    encoder
        .encode(
            img.as_raw(),
            img.width() as u16,
            img.height() as u16,
            ColorType::Rgb,
        )
        .map_err(|e| FotocheckError::EncodeFailed {
            detail: e.to_string(),
        })?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::resolution;
    use image::{DynamicImage, ImageFormat};
    use std::io::Cursor;

    fn png_bytes(img: RgbImage) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn output_has_exact_target_geometry() {
        let spec = PhotoSpec::default();
        let input = png_bytes(RgbImage::from_pixel(1000, 400, Rgb([120, 90, 60])));
        let result = correct(&input, &spec).unwrap();

        let out = image::load_from_memory(&result.bytes).unwrap();
        assert_eq!((out.width(), out.height()), (240, 288));
        assert!(!out.color().has_alpha());
    }

    #[test]
    fn output_is_tagged_with_spec_dpi() {
        let spec = PhotoSpec::default();
        let input = png_bytes(RgbImage::from_pixel(240, 288, Rgb([255, 255, 255])));
        let result = correct(&input, &spec).unwrap();
        assert_eq!(resolution::read_dpi(&result.bytes), Some((300, 300)));
    }

    #[test]
    fn white_photo_fits_at_start_quality() {
        let spec = PhotoSpec::default();
        let input = png_bytes(RgbImage::from_pixel(240, 288, Rgb([255, 255, 255])));
        let result = correct(&input, &spec).unwrap();
        assert_eq!(result.quality, 85);
        assert!(result.size_bytes <= spec.max_bytes);
        assert_eq!(result.size_bytes, result.bytes.len());
    }

    #[test]
    fn impossible_budget_stops_at_floor_and_reports_size() {
        // A 1-byte ceiling can never be met; the loop must stop at the
        // floor and report the real size.
        let spec = PhotoSpec::builder().max_bytes(1).build().unwrap();
        let input = png_bytes(RgbImage::from_pixel(240, 288, Rgb([128, 128, 128])));
        let result = correct(&input, &spec).unwrap();
        assert_eq!(result.quality, spec.quality_floor);
        assert!(result.size_bytes > spec.max_bytes);
    }

    #[test]
    fn rerunning_on_own_output_keeps_start_quality() {
        // Idempotence once under budget: the second pass must not step down.
        let spec = PhotoSpec::default();
        let input = png_bytes(RgbImage::from_pixel(240, 288, Rgb([255, 255, 255])));
        let first = correct(&input, &spec).unwrap();
        assert!(first.size_bytes <= spec.max_bytes);
        let second = correct(&first.bytes, &spec).unwrap();
        assert_eq!(second.quality, spec.start_quality);
    }

    #[test]
    fn undecodable_input_propagates_decode_error() {
        let spec = PhotoSpec::default();
        let err = correct(b"definitely not an image", &spec).unwrap_err();
        assert!(matches!(err, FotocheckError::DecodeFailed { .. }));
    }
}
