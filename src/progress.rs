//! Progress-callback trait for per-item batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] into
//! [`crate::process_batch`] to receive events as the pipeline works
//! through a batch. The callback approach keeps the library ignorant of
//! how the host reports progress — the bundled CLI forwards events to an
//! indicatif progress bar, a web frontend could forward them to a
//! WebSocket, and tests count them.
//!
//! All methods have default no-op implementations so callers only override
//! what they care about. Processing is strictly sequential, but the trait
//! is `Send + Sync` so one callback can be shared across batch invocations.

use crate::report::ValidationReport;
use std::sync::Arc;

/// Shared handle to a progress callback.
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;

/// Called by the batch driver as it processes each item.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once before the first item.
    fn on_batch_start(&self, total_items: usize) {
        let _ = total_items;
    }

    /// Called before an item's validation begins. `index` is 0-based.
    fn on_item_start(&self, index: usize, total_items: usize, filename: &str) {
        let _ = (index, total_items, filename);
    }

    /// Called when an item produced an archive entry.
    ///
    /// `corrected` is false for pass-through items.
    fn on_item_complete(
        &self,
        index: usize,
        total_items: usize,
        filename: &str,
        report: &ValidationReport,
        corrected: bool,
    ) {
        let _ = (index, total_items, filename, report, corrected);
    }

    /// Called when an item failed terminally and produced no entry.
    fn on_item_error(&self, index: usize, total_items: usize, filename: &str, error: &str) {
        let _ = (index, total_items, filename, error);
    }

    /// Called once after the archive is assembled.
    fn on_batch_complete(&self, total_items: usize, failed_items: usize) {
        let _ = (total_items, failed_items);
    }
}
