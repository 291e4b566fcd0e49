//! End-to-end decoding tests.
//!
//! Tests verify:
//! - Little-endian and big-endian payloads decode to the same directories
//! - Header failures follow the configured fatal policy
//! - Cyclic and out-of-range offsets never escape the buffer or loop
//! - Thumbnails, SubIFDs, GPS and MakerNotes are reached

use exif_ifd::{
    decode, decode_tiff, DecodeOptions, Decoder, DirectoryKind, FatalPolicy, NoMakernotes,
    Rational, Vendor,
};

use super::test_utils::{create_camera_exif, ByteOrderType, Entry, ExifBuilder, THUMBNAIL_JPEG};

fn kinds(metadata: &exif_ifd::Metadata) -> Vec<DirectoryKind> {
    metadata.iter().map(|d| d.kind()).collect()
}

// =============================================================================
// Byte Order Tests
// =============================================================================

#[test]
fn test_camera_exif_little_endian() {
    let metadata = decode(&create_camera_exif(ByteOrderType::LittleEndian));

    assert!(!metadata.has_errors(), "{:?}", metadata.errors().collect::<Vec<_>>());
    assert_eq!(
        kinds(&metadata),
        vec![DirectoryKind::Ifd0, DirectoryKind::Exif, DirectoryKind::Thumbnail]
    );

    let ifd0 = metadata.first_of_kind(DirectoryKind::Ifd0).unwrap();
    assert_eq!(ifd0.get_string(0x010F).as_deref(), Some("Canon"));
    assert_eq!(ifd0.get_int(0x0128), Ok(2));

    let exif = metadata.first_of_kind(DirectoryKind::Exif).unwrap();
    assert_eq!(exif.get_rational(0x829A), Ok(Rational::new(1, 77)));
}

#[test]
fn test_both_byte_orders_produce_equivalent_results() {
    let le = decode(&create_camera_exif(ByteOrderType::LittleEndian));
    let be = decode(&create_camera_exif(ByteOrderType::BigEndian));

    assert_eq!(kinds(&le), kinds(&be));
    for (a, b) in le.iter().zip(be.iter()) {
        assert_eq!(a, b);
    }
    assert_eq!(le.thumbnail(), be.thumbnail());
}

#[test]
fn test_exposure_time_and_resolution_unit_round_trip() {
    let metadata = decode(&create_camera_exif(ByteOrderType::BigEndian));

    let exif = metadata.first_of_kind(DirectoryKind::Exif).unwrap();
    let exposure = exif.tags().find(|t| t.id() == 0x829A).unwrap();
    assert_eq!(exposure.to_string(), "[Exif SubIFD] Exposure Time - 1/77 sec");
    assert_eq!(exif.get_double(0x829D), Ok(2.8));

    let ifd0 = metadata.first_of_kind(DirectoryKind::Ifd0).unwrap();
    let unit = ifd0.tags().find(|t| t.id() == 0x0128).unwrap();
    assert_eq!(unit.description().as_deref(), Some("Inch"));
}

// =============================================================================
// Header Tests
// =============================================================================

#[test]
fn test_truncated_header_is_fatal() {
    let full = create_camera_exif(ByteOrderType::LittleEndian);
    let metadata = decode(&full[..13]);

    assert_eq!(kinds(&metadata), vec![DirectoryKind::Error]);
    assert!(metadata.errors().next().unwrap().1.contains("too small"));
}

#[test]
fn test_bad_byte_order_marker_is_fatal() {
    let mut data = create_camera_exif(ByteOrderType::LittleEndian);
    data[6] = b'X';
    data[7] = b'X';

    assert_eq!(kinds(&decode(&data)), vec![DirectoryKind::Error]);

    let quiet = Decoder::new()
        .with_options(DecodeOptions::new().with_fatal_policy(FatalPolicy::Empty))
        .decode(&data);
    assert!(quiet.is_empty());
}

#[test]
fn test_exif_signature_required() {
    let mut b = ExifBuilder::new(ByteOrderType::BigEndian);
    b.ifd(&[Entry::short(0x0128, 3)], 0);
    let tiff = b.build_tiff();

    assert_eq!(kinds(&decode(&tiff)), vec![DirectoryKind::Error]);

    let metadata = decode_tiff(&tiff);
    let ifd0 = metadata.first_of_kind(DirectoryKind::Ifd0).unwrap();
    assert_eq!(ifd0.get_int(0x0128), Ok(3));
}

// =============================================================================
// Resource Guard Tests
// =============================================================================

#[test]
fn test_pointer_cycle_terminates() {
    let mut b = ExifBuilder::new(ByteOrderType::LittleEndian);
    // IFD0 lands at offset 8; Exif points back at it, IFD0's next points at Exif
    let exif_offset = 8 + 2 + 12 + 4;
    b.ifd(&[Entry::long(0x8769, exif_offset)], exif_offset);
    b.ifd(&[Entry::long(0xA005, 8)], 8);
    let metadata = decode(&b.build_exif());

    assert_eq!(kinds(&metadata), vec![DirectoryKind::Ifd0, DirectoryKind::Exif]);
    assert!(!metadata.has_errors());
}

#[test]
fn test_offsets_beyond_buffer_are_recorded() {
    let mut b = ExifBuilder::new(ByteOrderType::BigEndian);
    b.ifd(
        &[
            Entry::short(0x0128, 2),
            Entry::at(0x829A, 5, 1, 0xFFFF_FFF0),
            Entry::long(0x8769, 0xFFFF_FFFF),
            Entry::at(0x0110, 2, u32::MAX, 16),
        ],
        0x7FFF_FFFF,
    );
    let metadata = decode(&b.build_exif());

    assert_eq!(kinds(&metadata), vec![DirectoryKind::Ifd0]);
    let ifd0 = metadata.first_of_kind(DirectoryKind::Ifd0).unwrap();
    assert_eq!(ifd0.get_int(0x0128), Ok(2));
    assert!(!ifd0.contains(0x829A));
    assert!(!ifd0.contains(0x0110));
    assert_eq!(ifd0.errors().len(), 4);
}

#[test]
fn test_every_truncation_decodes_without_panic() {
    for order in [ByteOrderType::LittleEndian, ByteOrderType::BigEndian] {
        let full = create_camera_exif(order);
        for len in 0..=full.len() {
            let metadata = decode(&full[..len]);
            if len < full.len() - 2 {
                assert!(metadata.has_errors(), "length {}", len);
            }
        }
    }
}

#[test]
fn test_jhead_truncation_is_tolerated() {
    let mut b = ExifBuilder::new(ByteOrderType::LittleEndian);
    b.ifd(&[Entry::short(0x0128, 2), Entry::short(0x0112, 1)], 0);
    let mut data = b.build_exif();
    data.truncate(data.len() - 2);

    let metadata = decode(&data);
    assert!(!metadata.has_errors());
    assert_eq!(metadata.first_of_kind(DirectoryKind::Ifd0).unwrap().len(), 2);
}

// =============================================================================
// Linked Directory Tests
// =============================================================================

#[test]
fn test_thumbnail_extraction() {
    let metadata = decode(&create_camera_exif(ByteOrderType::LittleEndian));
    assert_eq!(metadata.thumbnail().map(|t| t.to_vec()), Some(THUMBNAIL_JPEG.to_vec()));
}

#[test]
fn test_thumbnail_out_of_bounds() {
    let mut b = ExifBuilder::new(ByteOrderType::LittleEndian);
    let ifd1 = b.ifd(&[Entry::long(0x0201, 4), Entry::long(0x0202, 5000)], 0);
    let ifd0 = b.ifd(&[Entry::short(0x0128, 2)], ifd1);
    b.set_first_ifd(ifd0);
    let metadata = decode(&b.build_exif());

    assert!(metadata.thumbnail().is_none());
    let thumbnail = metadata.first_of_kind(DirectoryKind::Thumbnail).unwrap();
    assert_eq!(thumbnail.errors().len(), 1);
}

#[test]
fn test_sub_ifds() {
    let mut b = ExifBuilder::new(ByteOrderType::BigEndian);
    let first = b.ifd(&[Entry::long(0x0100, 4000)], 0);
    let second = b.ifd(&[Entry::long(0x0100, 160)], 0);
    let pointers = b.longs(&[first, second]);
    let ifd0 = b.ifd(&[Entry::at(0x014A, 4, 2, pointers)], 0);
    b.set_first_ifd(ifd0);
    let metadata = decode(&b.build_exif());

    let widths: Vec<_> = metadata
        .stores_of_kind(DirectoryKind::SubIfd)
        .map(|d| d.get_int(0x0100).unwrap())
        .collect();
    assert_eq!(widths, vec![4000, 160]);
    assert_eq!(
        metadata
            .first_of_kind(DirectoryKind::SubIfd)
            .unwrap()
            .get_int(0x0100),
        Ok(4000)
    );
}

#[test]
fn test_gps_location() {
    let mut b = ExifBuilder::new(ByteOrderType::LittleEndian);
    let latitude = b.rationals(&[(48, 1), (51, 1), (2940, 100)]);
    let longitude = b.rationals(&[(2, 1), (17, 1), (4020, 100)]);
    let gps = b.ifd(
        &[
            Entry::raw(0x0001, 2, 2, *b"N\0\0\0"),
            Entry::at(0x0002, 5, 3, latitude),
            Entry::raw(0x0003, 2, 2, *b"W\0\0\0"),
            Entry::at(0x0004, 5, 3, longitude),
        ],
        0,
    );
    let ifd0 = b.ifd(&[Entry::long(0x8825, gps)], 0);
    b.set_first_ifd(ifd0);
    let metadata = decode(&b.build_exif());

    let (lat, lon) = metadata.geo_location().unwrap();
    assert!((lat - 48.858_166).abs() < 1e-5);
    assert!((lon + 2.294_5).abs() < 1e-5);
}

// =============================================================================
// MakerNote Tests
// =============================================================================

/// IFD0 with Make, an EXIF IFD holding `makernote` as its MakerNote.
fn exif_with_makernote(
    make: &str,
    makernote: impl FnOnce(&mut ExifBuilder) -> (u32, u32),
) -> Vec<u8> {
    let mut b = ExifBuilder::new(ByteOrderType::LittleEndian);
    let make_offset = b.ascii(make);
    let (offset, len) = makernote(&mut b);
    let exif = b.ifd(&[Entry::at(0x927C, 7, len, offset)], 0);
    let ifd0 = b.ifd(
        &[
            Entry::at(0x010F, 2, make.len() as u32 + 1, make_offset),
            Entry::long(0x8769, exif),
        ],
        0,
    );
    b.set_first_ifd(ifd0);
    b.build_exif()
}

#[test]
fn test_canon_makernote() {
    let data = exif_with_makernote("Canon", |b| {
        let ifd = b.ifd(&[Entry::short(0x0001, 42)], 0);
        (ifd, 2 + 12 + 4)
    });
    let metadata = decode(&data);

    assert!(!metadata.has_errors());
    let makernote = metadata
        .first_of_kind(DirectoryKind::Makernote(Vendor::Canon))
        .unwrap();
    assert_eq!(makernote.name(), "Canon Makernote");
    assert_eq!(makernote.get_int(0x0001), Ok(42));
}

#[test]
fn test_nikon_type2_makernote_uses_embedded_header() {
    // Big-endian TIFF header inside a little-endian file; offsets below are
    // relative to that header
    let mut makernote = b"Nikon\0\x02\x10\0\0MM\0*\0\0\0\x08".to_vec();
    makernote.extend_from_slice(&2u16.to_be_bytes());
    makernote.extend_from_slice(&[0x00, 0x02, 0x00, 0x03, 0, 0, 0, 1, 0x00, 0xC8, 0, 0]);
    makernote.extend_from_slice(&[0x00, 0x04, 0x00, 0x02, 0, 0, 0, 8, 0, 0, 0, 38]);
    makernote.extend_from_slice(&[0, 0, 0, 0]);
    makernote.extend_from_slice(b"NORMAL\0\0");

    let data = exif_with_makernote("NIKON CORPORATION", |b| {
        (b.bytes(&makernote), makernote.len() as u32)
    });
    let metadata = decode(&data);

    assert!(!metadata.has_errors(), "{:?}", metadata.errors().collect::<Vec<_>>());
    let nikon = metadata
        .first_of_kind(DirectoryKind::Makernote(Vendor::NikonType2))
        .unwrap();
    assert_eq!(nikon.get_int(0x0002), Ok(200));
    assert_eq!(nikon.get_string(0x0004).as_deref(), Some("NORMAL"));
}

#[test]
fn test_unknown_makernote_kept_as_bytes() {
    let data = exif_with_makernote("Acme", |b| (b.bytes(b"whatever"), 8));

    for decoder in [Decoder::new(), Decoder::new().with_resolver(NoMakernotes)] {
        let metadata = decoder.decode(&data);
        assert_eq!(kinds(&metadata), vec![DirectoryKind::Ifd0, DirectoryKind::Exif]);
        let exif = metadata.first_of_kind(DirectoryKind::Exif).unwrap();
        assert_eq!(exif.get_bytes(0x927C).unwrap().to_vec(), b"whatever".to_vec());
    }
}
