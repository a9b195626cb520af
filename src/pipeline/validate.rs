//! Validation: ordered rule checks producing a two-tier report.
//!
//! ## Errors vs. warnings
//!
//! The validator deliberately demotes almost everything to an advisory
//! warning: wrong format, oversize, wrong dimensions, missing DPI tag,
//! non-white background are all conditions the corrector fixes
//! automatically, so rejecting the upload for them would only make the
//! registrar re-export the same photo. Only two conditions block:
//! undecodable bytes (nothing downstream can run) and a filename that
//! encodes no identifier (the output could not be named).
//!
//! Check order is part of the contract — the report lists findings in the
//! order below, and a normalization failure short-circuits the geometry
//! checks while keeping the warnings already gathered.

use crate::config::PhotoSpec;
use crate::pipeline::identifier::Identifier;
use crate::pipeline::{background, normalize, resolution};
use crate::report::ValidationReport;
use tracing::debug;

/// Validate one upload against the photo spec.
///
/// `identifier` is the token previously extracted from the filename
/// (`None` when extraction found nothing). Never panics and never returns
/// an error: every finding lands in the report.
pub fn validate(
    bytes: &[u8],
    filename: &str,
    identifier: Option<&Identifier>,
    spec: &PhotoSpec,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    // 1. Extension. Output is always JPEG; anything that is not already a
    //    JPEG container draws a conversion advisory.
    match extension_of(filename) {
        Some(ext) if ext == "jpg" || ext == "jpeg" => {}
        Some(ext) => report.warnings.push(format!(
            "format .{ext} is not JPEG; the photo will be converted to .jpg"
        )),
        None => report
            .warnings
            .push("filename has no extension; the photo will be converted to .jpg".to_string()),
    }

    // 2. File size.
    if bytes.len() > spec.max_bytes {
        report.warnings.push(format!(
            "file size {:.1} KB exceeds the {} KB ceiling; the photo will be recompressed",
            bytes.len() as f64 / 1024.0,
            spec.max_bytes / 1024
        ));
    }

    // 3. Normalization. Failure here is terminal for the item: nothing
    //    else can be measured, so record the single blocking error and
    //    return with whatever was gathered so far.
    let grid = match normalize::normalize(bytes) {
        Ok(grid) => grid,
        Err(e) => {
            report.errors.push(e.to_string());
            return report;
        }
    };

    // 4. Dimensions.
    if (grid.width(), grid.height()) != (spec.width, spec.height) {
        report.warnings.push(format!(
            "dimensions {}x{} px differ from the required {}x{} px; the photo will be resized",
            grid.width(),
            grid.height(),
            spec.width,
            spec.height
        ));
    }

    // 5. Resolution metadata. Absent counts as non-conforming.
    if resolution::read_dpi(bytes) != Some(spec.dpi) {
        report.warnings.push(format!(
            "resolution metadata is not {}x{} DPI; it will be fixed",
            spec.dpi.0, spec.dpi.1
        ));
    }

    // 6. Background whiteness, on the raw decode: no EXIF transform and
    //    alpha dropped rather than flattened. The corrector forces a white
    //    canvas either way.
    match image::load_from_memory(bytes) {
        Ok(raw) => {
            if !background::is_white(&raw.to_rgb8(), spec.white_threshold, spec.white_frac_min) {
                report.warnings.push(
                    "background is not uniformly white at the borders; a white canvas will be applied"
                        .to_string(),
                );
            }
        }
        Err(_) => {
            report
                .warnings
                .push("background could not be checked; a white canvas will be applied".to_string());
        }
    }

    // 7. Identifier.
    if identifier.is_none() {
        report
            .errors
            .push("no valid identifier (DNI, CE or passport) in the filename".to_string());
    }

    debug!(
        filename,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validated upload"
    );
    report
}

/// Lower-cased extension (text after the last dot), if any.
fn extension_of(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}
