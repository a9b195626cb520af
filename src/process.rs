//! Batch driver: the full extract → validate → correct → package run.
//!
//! ## Per-item isolation
//!
//! Items are processed strictly sequentially in caller order, and each one
//! stands alone: a terminal failure (undecodable bytes) is recorded in that
//! item's [`ItemResult`] and the batch carries on — one broken upload must
//! not cost the registrar the other forty-nine photos. Only batch-level
//! failures (archive assembly, output file I/O) abort the invocation.
//!
//! ## Pass-through vs. correction
//!
//! An upload whose report is completely clean is archived byte-for-byte;
//! anything with findings goes through the corrector. Blocking errors do
//! not suppress output: a photo whose filename encodes no identifier is
//! still corrected and archived under the `SIN_ID` sentinel so the
//! registrar can see — and rename — it.

use crate::config::PhotoSpec;
use crate::error::FotocheckError;
use crate::pipeline::identifier::{self, SIN_ID_FILENAME};
use crate::pipeline::{correct, package, validate};
use crate::progress::ProgressCallback;
use crate::report::{BatchOutput, BatchStats, ItemResult};
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// One uploaded photo: raw bytes plus the original filename.
#[derive(Debug, Clone)]
pub struct UploadedItem {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadedItem {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// Process a batch of uploads into per-item reports and a ZIP archive.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// `Ok(BatchOutput)` even when some items failed terminally — check
/// `output.stats.failed` and the per-item `error` fields.
///
/// # Errors
/// Only batch-level failures: archive assembly ([`FotocheckError::ArchiveWrite`]).
pub fn process_batch(
    items: &[UploadedItem],
    spec: &PhotoSpec,
    progress: Option<&ProgressCallback>,
) -> Result<BatchOutput, FotocheckError> {
    let start = Instant::now();
    info!(items = items.len(), "starting batch");
    if let Some(cb) = progress {
        cb.on_batch_start(items.len());
    }

    let mut results: Vec<ItemResult> = Vec::with_capacity(items.len());
    let mut entries: Vec<(String, Vec<u8>)> = Vec::new();
    let mut name_counts: HashMap<String, u32> = HashMap::new();
    let total = items.len();

    for (index, item) in items.iter().enumerate() {
        if let Some(cb) = progress {
            cb.on_item_start(index, total, &item.filename);
        }

        let id = identifier::extract(&item.filename);
        let report = validate::validate(&item.bytes, &item.filename, id.as_ref(), spec);
        let desired_name = id
            .as_ref()
            .map(|i| i.output_filename())
            .unwrap_or_else(|| SIN_ID_FILENAME.to_string());

        if report.is_clean() {
            // Already conforming: archive the original bytes untouched.
            let name = claim_name(&mut name_counts, &desired_name);
            debug!(filename = %item.filename, entry = %name, "pass-through");
            entries.push((name.clone(), item.bytes.clone()));
            if let Some(cb) = progress {
                cb.on_item_complete(index, total, &item.filename, &report, false);
            }
            results.push(ItemResult {
                filename: item.filename.clone(),
                identifier: id,
                output_filename: Some(name),
                report,
                passed_through: true,
                correction: None,
                error: None,
            });
            continue;
        }

        match correct::correct(&item.bytes, spec) {
            Ok(correction) => {
                let name = claim_name(&mut name_counts, &desired_name);
                debug!(
                    filename = %item.filename,
                    entry = %name,
                    quality = correction.quality,
                    size = correction.size_bytes,
                    "corrected"
                );
                entries.push((name.clone(), correction.bytes.clone()));
                if let Some(cb) = progress {
                    cb.on_item_complete(index, total, &item.filename, &report, true);
                }
                results.push(ItemResult {
                    filename: item.filename.clone(),
                    identifier: id,
                    output_filename: Some(name),
                    report,
                    passed_through: false,
                    correction: Some(correction),
                    error: None,
                });
            }
            Err(e) => {
                warn!(filename = %item.filename, error = %e, "item failed, skipping");
                if let Some(cb) = progress {
                    cb.on_item_error(index, total, &item.filename, &e.to_string());
                }
                results.push(ItemResult {
                    filename: item.filename.clone(),
                    identifier: id,
                    output_filename: None,
                    report,
                    passed_through: false,
                    correction: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    let archive = package::package(&entries)?;

    let stats = BatchStats {
        total_items: total,
        corrected: results.iter().filter(|r| r.correction.is_some()).count(),
        passed_through: results.iter().filter(|r| r.passed_through).count(),
        failed: results.iter().filter(|r| r.error.is_some()).count(),
        archive_size_bytes: archive.len(),
        duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        corrected = stats.corrected,
        passed_through = stats.passed_through,
        failed = stats.failed,
        archive_size = stats.archive_size_bytes,
        duration_ms = stats.duration_ms,
        "batch complete"
    );
    if let Some(cb) = progress {
        cb.on_batch_complete(total, stats.failed);
    }

    Ok(BatchOutput {
        items: results,
        archive,
        stats,
    })
}

/// Process a batch and write the archive to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial archives.
pub fn process_batch_to_file(
    items: &[UploadedItem],
    spec: &PhotoSpec,
    output_path: impl AsRef<Path>,
    progress: Option<&ProgressCallback>,
) -> Result<BatchOutput, FotocheckError> {
    let output = process_batch(items, spec, progress)?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| FotocheckError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    let tmp_path = path.with_extension("zip.tmp");
    std::fs::write(&tmp_path, &output.archive).map_err(|e| FotocheckError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    std::fs::rename(&tmp_path, path).map_err(|e| FotocheckError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(output)
}

/// Reserve an output name, disambiguating duplicates with a numeric suffix.
///
/// Two uploads resolving to the same identifier (or both lacking one) must
/// not silently overwrite each other in the archive: the second becomes
/// `{stem}_2.{ext}`, the third `{stem}_3.{ext}`, and so on.
fn claim_name(counts: &mut HashMap<String, u32>, desired: &str) -> String {
    let n = counts.entry(desired.to_string()).or_insert(0);
    *n += 1;
    if *n == 1 {
        return desired.to_string();
    }
    match desired.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}_{n}.{ext}"),
        None => format!("{desired}_{n}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_claim_is_verbatim() {
        let mut counts = HashMap::new();
        assert_eq!(claim_name(&mut counts, "41803077.jpg"), "41803077.jpg");
    }

    #[test]
    fn duplicates_get_numeric_suffixes() {
        let mut counts = HashMap::new();
        claim_name(&mut counts, "SIN_ID.jpg");
        assert_eq!(claim_name(&mut counts, "SIN_ID.jpg"), "SIN_ID_2.jpg");
        assert_eq!(claim_name(&mut counts, "SIN_ID.jpg"), "SIN_ID_3.jpg");
    }

    #[test]
    fn distinct_names_stay_independent() {
        let mut counts = HashMap::new();
        claim_name(&mut counts, "a.jpg");
        assert_eq!(claim_name(&mut counts, "b.jpg"), "b.jpg");
    }
}
