//! End-to-end pipeline tests: uploads in, reports and a ZIP archive out.

use fotocheck::{
    correct, extract_identifier, package, process_batch, process_batch_to_file, validate,
    Identifier, PhotoSpec, UploadedItem, SIN_ID_FILENAME,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::{Cursor, Read};
use zip::ZipArchive;

// ── fixtures ─────────────────────────────────────────────────────────────────

fn png_bytes(img: DynamicImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

fn white_png(width: u32, height: u32) -> Vec<u8> {
    png_bytes(DynamicImage::ImageRgb8(RgbImage::from_pixel(
        width,
        height,
        Rgb([255, 255, 255]),
    )))
}

fn transparent_png(width: u32, height: u32) -> Vec<u8> {
    png_bytes(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        width,
        height,
        Rgba([0, 0, 0, 0]),
    )))
}

/// A fully conforming upload: run the corrector once and keep its output.
fn conforming_jpeg(spec: &PhotoSpec) -> Vec<u8> {
    correct(&white_png(480, 576), spec).unwrap().bytes
}

// ── identifier extraction ────────────────────────────────────────────────────

#[test]
fn extractor_handles_the_documented_filename_shapes() {
    assert_eq!(
        extract_identifier("41803077.jpg"),
        Some(Identifier::Dni("41803077".into()))
    );
    assert_eq!(
        extract_identifier("001234567-2.png"),
        Some(Identifier::ForeignCard("001234567".into()))
    );
    assert_eq!(
        extract_identifier("scan_final_AB123456.jpg"),
        Some(Identifier::Passport("AB123456".into()))
    );
    assert_eq!(extract_identifier("xx.png"), None);
}

// ── correction ───────────────────────────────────────────────────────────────

#[test]
fn correction_forces_exact_geometry_from_any_aspect_ratio() {
    let spec = PhotoSpec::default();
    for (w, h) in [(100, 100), (1000, 300), (240, 288), (33, 900)] {
        let result = correct(&white_png(w, h), &spec).unwrap();
        let img = image::load_from_memory(&result.bytes).unwrap();
        assert_eq!((img.width(), img.height()), (240, 288), "input {w}x{h}");
    }
}

#[test]
fn correction_flattens_transparency_onto_white() {
    let spec = PhotoSpec::default();
    let result = correct(&transparent_png(100, 100), &spec).unwrap();
    let img = image::load_from_memory(&result.bytes).unwrap().to_rgb8();
    let center = img.get_pixel(120, 144);
    assert!(
        center.0.iter().all(|&c| c > 240),
        "expected white-ish, got {:?}",
        center
    );
}

#[test]
fn corrected_output_validates_clean() {
    let spec = PhotoSpec::default();
    let bytes = conforming_jpeg(&spec);
    let id = extract_identifier("41803077.jpg");
    let report = validate(&bytes, "41803077.jpg", id.as_ref(), &spec);
    assert!(
        report.is_clean(),
        "errors: {:?} warnings: {:?}",
        report.errors,
        report.warnings
    );
}

#[test]
fn recorrecting_a_conforming_photo_stays_at_start_quality() {
    let spec = PhotoSpec::default();
    let first = correct(&white_png(480, 576), &spec).unwrap();
    let second = correct(&first.bytes, &spec).unwrap();
    assert_eq!(second.quality, spec.start_quality);
    assert!(second.size_bytes <= spec.max_bytes);
}

// ── validation ───────────────────────────────────────────────────────────────

#[test]
fn transparent_png_without_identifier_has_exactly_one_error() {
    let spec = PhotoSpec::default();
    let bytes = transparent_png(100, 100);
    let id = extract_identifier("xx.png");
    let report = validate(&bytes, "xx.png", id.as_ref(), &spec);
    assert_eq!(report.errors.len(), 1, "errors: {:?}", report.errors);
    assert!(report.errors[0].contains("identifier"));
    assert!(!report.warnings.is_empty());
}

// ── batch processing ─────────────────────────────────────────────────────────

#[test]
fn batch_archives_every_item_under_its_canonical_name() {
    let spec = PhotoSpec::default();
    let items = vec![
        UploadedItem::new("41803077.jpg", conforming_jpeg(&spec)),
        UploadedItem::new("001234567-2.png", white_png(100, 120)),
        UploadedItem::new("xx.png", transparent_png(50, 50)),
    ];
    let output = process_batch(&items, &spec, None).unwrap();

    assert_eq!(output.stats.total_items, 3);
    assert_eq!(output.stats.passed_through, 1);
    assert_eq!(output.stats.corrected, 2);
    assert_eq!(output.stats.failed, 0);

    let mut archive = ZipArchive::new(Cursor::new(output.archive)).unwrap();
    assert_eq!(archive.len(), 3);
    assert_eq!(archive.by_index(0).unwrap().name(), "41803077.jpg");
    assert_eq!(archive.by_index(1).unwrap().name(), "001234567.jpg");
    assert_eq!(archive.by_index(2).unwrap().name(), SIN_ID_FILENAME);
}

#[test]
fn pass_through_keeps_the_original_bytes() {
    let spec = PhotoSpec::default();
    let bytes = conforming_jpeg(&spec);
    let items = vec![UploadedItem::new("41803077.jpg", bytes.clone())];
    let output = process_batch(&items, &spec, None).unwrap();

    assert!(output.items[0].passed_through);
    let mut archive = ZipArchive::new(Cursor::new(output.archive)).unwrap();
    let mut entry = Vec::new();
    archive
        .by_name("41803077.jpg")
        .unwrap()
        .read_to_end(&mut entry)
        .unwrap();
    assert_eq!(entry, bytes);
}

#[test]
fn duplicate_identifiers_get_suffixed_entries() {
    let spec = PhotoSpec::default();
    let items = vec![
        UploadedItem::new("41803077.jpg", white_png(100, 100)),
        UploadedItem::new("41803077-old.png", white_png(100, 100)),
    ];
    let output = process_batch(&items, &spec, None).unwrap();

    let archive = ZipArchive::new(Cursor::new(output.archive)).unwrap();
    let names: Vec<&str> = archive.file_names().collect();
    assert!(names.contains(&"41803077.jpg"));
    assert!(names.contains(&"41803077_2.jpg"));
}

#[test]
fn undecodable_item_is_isolated_and_the_rest_proceed() {
    let spec = PhotoSpec::default();
    let items = vec![
        UploadedItem::new("99999999.jpg", b"not an image at all".to_vec()),
        UploadedItem::new("41803077.png", white_png(100, 100)),
    ];
    let output = process_batch(&items, &spec, None).unwrap();

    assert_eq!(output.stats.failed, 1);
    assert_eq!(output.stats.corrected, 1);
    assert!(output.items[0].error.is_some());
    assert!(output.items[0].output_filename.is_none());
    assert!(output.items[1].error.is_none());

    let archive = ZipArchive::new(Cursor::new(output.archive)).unwrap();
    assert_eq!(archive.len(), 1);
    assert_eq!(
        archive.file_names().collect::<Vec<_>>(),
        vec!["41803077.jpg"]
    );
}

#[test]
fn batch_to_file_writes_a_readable_archive() {
    let spec = PhotoSpec::default();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("fotos_corregidas.zip");

    let items = vec![UploadedItem::new("41803077.png", white_png(100, 100))];
    let output = process_batch_to_file(&items, &spec, &path, None).unwrap();

    let on_disk = std::fs::read(&path).unwrap();
    assert_eq!(on_disk, output.archive);
    assert!(ZipArchive::new(Cursor::new(on_disk)).is_ok());
}

#[test]
fn empty_batch_produces_an_empty_archive() {
    let output = process_batch(&[], &PhotoSpec::default(), None).unwrap();
    assert_eq!(output.stats.total_items, 0);
    let archive = ZipArchive::new(Cursor::new(output.archive)).unwrap();
    assert_eq!(archive.len(), 0);
}

// ── packaging ────────────────────────────────────────────────────────────────

#[test]
fn package_preserves_entry_order_and_payloads() {
    let entries = vec![
        ("b.jpg".to_string(), vec![9u8, 8, 7]),
        ("a.jpg".to_string(), vec![1u8]),
    ];
    let buf = package(&entries).unwrap();
    let mut archive = ZipArchive::new(Cursor::new(buf)).unwrap();
    assert_eq!(archive.by_index(0).unwrap().name(), "b.jpg");
    let mut data = Vec::new();
    archive
        .by_name("b.jpg")
        .unwrap()
        .read_to_end(&mut data)
        .unwrap();
    assert_eq!(data, vec![9, 8, 7]);
}
