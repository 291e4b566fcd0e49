//! Typed access to decoded directories.
//!
//! Tests verify:
//! - Typed getters coerce decoded values or report the stored kind
//! - Dates parse from EXIF strings
//! - Tag handles carry names and descriptions

use chrono::{Datelike, Timelike};

use exif_ifd::{decode, Directory, DirectoryKind, TagError};

use super::test_utils::{create_camera_exif, ByteOrderType};

fn camera() -> exif_ifd::Metadata {
    decode(&create_camera_exif(ByteOrderType::LittleEndian))
}

// =============================================================================
// Typed Getter Tests
// =============================================================================

#[test]
fn test_date_time_original() {
    let metadata = camera();
    let exif = metadata.first_of_kind(DirectoryKind::Exif).unwrap();

    let date = exif.get_date(0x9003).unwrap();
    assert_eq!((date.year(), date.month(), date.day()), (2019, 3, 12));
    assert_eq!((date.hour(), date.minute(), date.second()), (14, 5, 1));
}

#[test]
fn test_coercion_errors_name_the_stored_kind() {
    let metadata = camera();
    let ifd0 = metadata.first_of_kind(DirectoryKind::Ifd0).unwrap();

    assert!(matches!(
        ifd0.get_rational(0x010F),
        Err(TagError::Coercion { tag: 0x010F, expected: "rational", .. })
    ));
    assert_eq!(ifd0.get_int(0x9999), Err(TagError::MissingTag(0x9999)));
    assert!(matches!(ifd0.get_date(0x010F), Err(TagError::InvalidDate { .. })));
}

#[test]
fn test_rational_views() {
    let metadata = camera();
    let exif = metadata.first_of_kind(DirectoryKind::Exif).unwrap();

    assert_eq!(exif.get_int(0x829A), Ok(0));
    assert_eq!(exif.get_int(0x829D), Ok(2));
    assert!((exif.get_float(0x829A).unwrap() - 1.0 / 77.0).abs() < 1e-6);
}

#[test]
fn test_version_bytes() {
    let metadata = camera();
    let exif = metadata.first_of_kind(DirectoryKind::Exif).unwrap();

    assert_eq!(exif.get_bytes(0x9000).unwrap().to_vec(), b"0230".to_vec());
    let version = exif.tags().find(|t| t.id() == 0x9000).unwrap();
    assert_eq!(version.description().as_deref(), Some("2.30"));
}

// =============================================================================
// Tag Handle Tests
// =============================================================================

#[test]
fn test_tags_follow_entry_order() {
    let metadata = camera();
    let ifd0 = metadata.first_of_kind(DirectoryKind::Ifd0).unwrap();

    let ids: Vec<_> = ifd0.tag_ids().collect();
    assert_eq!(ids, vec![0x010F, 0x0110, 0x0128, 0x8769]);

    let lines: Vec<_> = ifd0.tags().map(|t| t.to_string()).collect();
    assert_eq!(lines[0], "[Exif IFD0] Make - Canon");
    assert_eq!(lines[1], "[Exif IFD0] Model - Canon EOS 5D");
}

#[test]
fn test_thumbnail_directory_names() {
    let metadata = camera();
    let thumbnail = metadata.first_of_kind(DirectoryKind::Thumbnail).unwrap();

    assert_eq!(thumbnail.name(), "Exif Thumbnail");
    let names: Vec<_> = thumbnail.tags().map(|t| t.name_or_hex()).collect();
    assert_eq!(names, vec!["Compression", "Thumbnail Offset", "Thumbnail Length"]);
}

#[test]
fn test_error_directory_rejects_values() {
    let mut error = Directory::error("boom");
    assert!(error.set(0x0100, 1u32).is_err());
    assert!(error.is_empty());
    assert_eq!(error.errors(), ["boom".to_string()]);
}
