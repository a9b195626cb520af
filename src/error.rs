//! Error types for the fotocheck library.
//!
//! Two distinct severities reflect two distinct failure modes:
//!
//! * [`FotocheckError`] — **Terminal**: the operation cannot produce output
//!   at all (undecodable image bytes, JPEG encoder failure, archive write
//!   failure). Returned as `Err(FotocheckError)` from [`crate::correct`]
//!   and the batch entry points.
//!
//! * Report entries — **Advisory**: rule violations (wrong dimensions,
//!   oversized file, non-white background, …) are collected as strings in
//!   [`crate::ValidationReport`] and never abort processing; the corrector
//!   heals them instead.
//!
//! Within a batch, a terminal error on one item is recorded in that item's
//! [`crate::ItemResult`] and the batch continues — one broken upload must
//! not lose the rest of the ZIP.

use std::path::PathBuf;
use thiserror::Error;

/// All terminal errors returned by the fotocheck library.
///
/// Rule violations are not errors; they live in
/// [`crate::ValidationReport`] and are auto-remediated.
#[derive(Debug, Error)]
pub enum FotocheckError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The bytes are not a decodable raster image (JPEG/PNG/…).
    #[error("image could not be decoded: {detail}")]
    DecodeFailed { detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The JPEG encoder rejected the corrected pixel grid.
    #[error("JPEG encoding failed: {detail}")]
    EncodeFailed { detail: String },

    /// The ZIP writer failed while assembling the archive.
    #[error("archive assembly failed: {detail}")]
    ArchiveWrite { detail: String },

    /// Could not create or write the output ZIP file.
    #[error("failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}
