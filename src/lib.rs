//! # fotocheck
//!
//! Validation and automatic correction of credential photos for academic
//! registry submission, in four stages:
//!
//! ```text
//! ┌────────────┐   ┌───────────┐   ┌───────────┐   ┌───────────┐
//! │ identifier │──▶│ validate  │──▶│  correct  │──▶│  package  │
//! │ (filename) │   │ (report)  │   │ (re-encode│   │  (ZIP)    │
//! └────────────┘   └───────────┘   │  if dirty)│   └───────────┘
//!                                  └───────────┘
//! ```
//!
//! Every upload is checked against the target profile (240×288 px,
//! 300 DPI, JPEG, ≤ 50 KB, white background) and the document identifier
//! encoded in its filename. Clean uploads are archived byte-for-byte;
//! everything else is resized onto a white canvas and re-encoded with a
//! bounded quality walk, then archived under its canonical
//! `{IDENTIFIER}.jpg` name.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fotocheck::{process_batch, PhotoSpec, UploadedItem};
//!
//! fn main() -> Result<(), fotocheck::FotocheckError> {
//!     let items = vec![UploadedItem::new(
//!         "41803077.jpg",
//!         std::fs::read("41803077.jpg").unwrap(),
//!     )];
//!     let output = process_batch(&items, &PhotoSpec::default(), None)?;
//!     std::fs::write("fotos_corregidas.zip", &output.archive).unwrap();
//!     println!(
//!         "corrected {}, passed through {}, failed {}",
//!         output.stats.corrected, output.stats.passed_through, output.stats.failed
//!     );
//!     Ok(())
//! }
//! ```
//!
//! Individual stages are exposed for callers that want less than the full
//! batch run: [`extract_identifier`], [`validate`], [`correct`] and
//! [`package`] compose in exactly the order [`process_batch`] uses them.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod process;
pub mod progress;
pub mod report;

pub use config::{PhotoSpec, PhotoSpecBuilder, ARCHIVE_FILENAME};
pub use error::FotocheckError;
pub use pipeline::correct::correct;
pub use pipeline::identifier::{extract as extract_identifier, Identifier, SIN_ID_FILENAME};
pub use pipeline::package::package;
pub use pipeline::validate::validate;
pub use process::{process_batch, process_batch_to_file, UploadedItem};
pub use progress::{BatchProgressCallback, ProgressCallback};
pub use report::{BatchOutput, BatchStats, CorrectionResult, ItemResult, ValidationReport};
