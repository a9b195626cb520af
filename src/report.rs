//! Result types: per-item reports and whole-batch output.
//!
//! Everything here is serde-serialisable so callers (and the CLI's
//! `--json` mode) can persist or forward the full processing record.
//! Raw image and archive bytes are `#[serde(skip)]`-ed out of the JSON —
//! they belong in the ZIP, not in a report.

use crate::pipeline::identifier::Identifier;
use serde::{Deserialize, Serialize};

/// Findings for one upload, split by severity.
///
/// `errors` block meaningful validation (undecodable bytes, missing
/// identifier); `warnings` are advisory — each names a rule violation the
/// corrector will fix. Both lists preserve check order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// No findings at all — the upload already conforms.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// The corrector's output for one item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionResult {
    /// Encoded JPEG, ready for the archive.
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// JPEG quality actually used (start quality unless the size budget
    /// forced the loop down; never below the floor).
    pub quality: u8,
    /// Final encoded size. May exceed the ceiling when the quality floor
    /// was hit — reported, not hidden.
    pub size_bytes: usize,
}

/// Complete processing record for one uploaded item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResult {
    /// Original upload filename.
    pub filename: String,
    /// Identifier extracted from the filename, if any.
    pub identifier: Option<Identifier>,
    /// Name of this item's archive entry; `None` when processing failed
    /// terminally and no entry was produced.
    pub output_filename: Option<String>,
    /// Validation findings.
    pub report: ValidationReport,
    /// True when the upload already conformed and its original bytes were
    /// archived unchanged.
    pub passed_through: bool,
    /// Correction stats; `None` for pass-through or failed items.
    pub correction: Option<CorrectionResult>,
    /// Terminal failure, if the item produced no output.
    pub error: Option<String>,
}

/// Aggregate counters for one batch invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchStats {
    pub total_items: usize,
    /// Items that were re-encoded by the corrector.
    pub corrected: usize,
    /// Items archived byte-for-byte because validation was clean.
    pub passed_through: usize,
    /// Items that failed terminally and have no archive entry.
    pub failed: usize,
    pub archive_size_bytes: usize,
    pub duration_ms: u64,
}

/// Everything a batch invocation produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutput {
    /// Per-item records, in processing order.
    pub items: Vec<ItemResult>,
    /// The assembled ZIP.
    #[serde(skip)]
    pub archive: Vec<u8>,
    pub stats: BatchStats,
}
