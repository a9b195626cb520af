//! Packaging: ordered (filename, bytes) pairs → one ZIP buffer.
//!
//! The archive is the single artefact handed back to the caller, built
//! entirely in memory — batches are tens of photos of ≤ 50 KB each, so
//! streaming to disk would buy nothing. Entry order is the processing
//! order, deflate compression throughout (JPEG payloads barely shrink, but
//! deflate keeps every unzip tool happy and costs microseconds at this
//! scale).
//!
//! Names are written exactly as given: the packager does not police
//! duplicates. The batch driver disambiguates duplicate output names with
//! a numeric suffix *before* calling in, so a duplicate reaching this
//! function is a deliberate caller choice, not silent data loss.

use crate::error::FotocheckError;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Assemble an in-memory ZIP with one entry per pair, in order.
pub fn package(entries: &[(String, Vec<u8>)]) -> Result<Vec<u8>, FotocheckError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, bytes) in entries {
        writer
            .start_file(name.as_str(), options)
            .map_err(|e| FotocheckError::ArchiveWrite {
                detail: format!("entry '{name}': {e}"),
            })?;
        writer
            .write_all(bytes)
            .map_err(|e| FotocheckError::ArchiveWrite {
                detail: format!("entry '{name}': {e}"),
            })?;
    }

    let cursor = writer.finish().map_err(|e| FotocheckError::ArchiveWrite {
        detail: e.to_string(),
    })?;
    let buf = cursor.into_inner();
    debug!(entries = entries.len(), size = buf.len(), "archive assembled");
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn entries_round_trip_in_order() {
        let entries = vec![
            ("a.jpg".to_string(), vec![1u8, 2, 3]),
            ("b.jpg".to_string(), vec![4u8, 5]),
        ];
        let buf = package(&entries).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(buf)).unwrap();
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.by_index(0).unwrap().name(), "a.jpg");
        assert_eq!(archive.by_index(1).unwrap().name(), "b.jpg");

        let mut data = Vec::new();
        archive.by_name("a.jpg").unwrap().read_to_end(&mut data).unwrap();
        assert_eq!(data, vec![1, 2, 3]);
        data.clear();
        archive.by_name("b.jpg").unwrap().read_to_end(&mut data).unwrap();
        assert_eq!(data, vec![4, 5]);
    }

    #[test]
    fn empty_batch_is_a_valid_empty_archive() {
        let buf = package(&[]).unwrap();
        let archive = ZipArchive::new(Cursor::new(buf)).unwrap();
        assert_eq!(archive.len(), 0);
    }

    #[test]
    fn names_are_written_exactly_as_given() {
        let entries = vec![("SIN_ID.jpg".to_string(), vec![0u8])];
        let buf = package(&entries).unwrap();
        let archive = ZipArchive::new(Cursor::new(buf)).unwrap();
        assert_eq!(archive.file_names().collect::<Vec<_>>(), vec!["SIN_ID.jpg"]);
    }
}
