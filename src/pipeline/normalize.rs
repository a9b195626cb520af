//! Normalization: raw upload bytes → canonical RGB pixel grid.
//!
//! ## Why a single normalization step?
//!
//! Uploads arrive in whatever state the student's phone left them: sideways
//! pixel data with an EXIF rotation tag, PNGs with transparency, grayscale
//! scans. Every downstream stage (validation geometry, resizing, JPEG
//! encoding) wants one canonical form — 8-bit RGB, visually upright, fully
//! opaque — so the three transforms happen here, once, in a fixed order:
//!
//! 1. decode;
//! 2. apply the EXIF orientation (tag 0x0112) so pixel data matches the
//!    intended viewing orientation, then forget the tag;
//! 3. composite any alpha channel over an opaque white canvas, or plainly
//!    convert to RGB when there is none.

use crate::error::FotocheckError;
use image::{DynamicImage, Rgb, RgbImage};
use std::io::Cursor;
use tracing::debug;

/// Decode, orient, and flatten raw image bytes into an opaque RGB grid.
///
/// # Errors
/// [`FotocheckError::DecodeFailed`] when the bytes are not a decodable
/// raster image — the caller must treat this as a per-item terminal error.
pub fn normalize(bytes: &[u8]) -> Result<RgbImage, FotocheckError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| FotocheckError::DecodeFailed {
        detail: e.to_string(),
    })?;

    let orientation = read_exif_orientation(bytes);
    if orientation != 1 {
        debug!(orientation, "applying EXIF orientation transform");
    }
    let oriented = apply_orientation(decoded, orientation);

    Ok(flatten_onto_white(oriented))
}

/// Read EXIF orientation tag 0x0112 from the raw container bytes.
/// Returns 1 (upright) when there is no EXIF data or no orientation tag.
pub fn read_exif_orientation(bytes: &[u8]) -> u32 {
    let mut cursor = Cursor::new(bytes);
    let reader = match exif::Reader::new().read_from_container(&mut cursor) {
        Ok(r) => r,
        Err(_) => return 1,
    };

    reader
        .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|f| f.value.get_uint(0))
        .unwrap_or(1)
}

/// Apply an EXIF orientation value (1–8) to the decoded image.
///
/// 1 = upright, 2 = mirrored, 3 = 180°, 4 = flipped vertically,
/// 5 = mirrored + 90° CW, 6 = 90° CW, 7 = mirrored + 270° CW, 8 = 270° CW.
/// Unknown values are treated as upright.
pub fn apply_orientation(img: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}

/// Flatten any alpha channel over opaque white; otherwise convert to RGB.
///
/// The alpha-weighted blend `out = (c·a + 255·(255−a)) / 255` makes fully
/// transparent pixels white and fully opaque pixels unchanged, matching how
/// the photo would look printed on white stock.
fn flatten_onto_white(img: DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }

    let rgba = img.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, px) in rgba.enumerate_pixels() {
        let a = px.0[3] as u32;
        let blend = |c: u8| ((c as u32 * a + 255 * (255 - a)) / 255) as u8;
        out.put_pixel(x, y, Rgb([blend(px.0[0]), blend(px.0[1]), blend(px.0[2])]));
    }
    out
}
