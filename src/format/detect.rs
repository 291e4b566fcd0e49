//! Payload detection for files handed to the decoder.
//!
//! EXIF metadata arrives in three shapes:
//!
//! - **EXIF segment**: the `Exif\0\0` signature followed by a TIFF structure
//! - **Bare TIFF**: TIFF-based files (raw formats, DNG) starting with `II*\0` or `MM\0*`
//! - **JPEG**: an APP1 segment carrying an EXIF segment

use super::tiff::{ByteOrder, EXIF_SIGNATURE, TIFF_HEADER_SIZE};

// =============================================================================
// PayloadKind
// =============================================================================

/// Shape of a located EXIF payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// Starts with `Exif\0\0`; decode with `decode`
    Exif,

    /// Starts with a TIFF header; decode with `decode_tiff`
    Tiff,
}

impl PayloadKind {
    pub const fn name(&self) -> &'static str {
        match self {
            PayloadKind::Exif => "EXIF segment",
            PayloadKind::Tiff => "TIFF",
        }
    }
}

// =============================================================================
// Detection
// =============================================================================

const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];
const JPEG_APP1: u8 = 0xE1;
const JPEG_SOS: u8 = 0xDA;
const JPEG_EOI: u8 = 0xD9;

/// Locate the EXIF payload in `data`.
///
/// Returns the payload kind and the slice to hand to the decoder, or `None`
/// when the data holds no recognisable EXIF structure.
pub fn detect_payload(data: &[u8]) -> Option<(PayloadKind, &[u8])> {
    if data.starts_with(EXIF_SIGNATURE) {
        return Some((PayloadKind::Exif, data));
    }
    if is_tiff_header(data) {
        return Some((PayloadKind::Tiff, data));
    }
    if data.starts_with(&JPEG_SOI) {
        return find_jpeg_exif(data).map(|segment| (PayloadKind::Exif, segment));
    }
    None
}

/// Walk the JPEG marker segments up to the start of scan, returning the
/// first APP1 segment that carries EXIF data.
fn find_jpeg_exif(data: &[u8]) -> Option<&[u8]> {
    let mut pos = JPEG_SOI.len();

    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];
        if marker == 0xFF {
            // Fill byte
            pos += 1;
            continue;
        }
        if marker == JPEG_SOS || marker == JPEG_EOI {
            return None;
        }

        let length = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        if length < 2 {
            return None;
        }
        let start = pos + 4;
        let end = (pos + 2 + length).min(data.len());

        if marker == JPEG_APP1 && data[start..end].starts_with(EXIF_SIGNATURE) {
            return Some(&data[start..end]);
        }
        pos += 2 + length;
    }

    None
}

/// Check if bytes represent a classic TIFF header.
pub fn is_tiff_header(bytes: &[u8]) -> bool {
    if bytes.len() < TIFF_HEADER_SIZE {
        return false;
    }

    match ByteOrder::from_marker([bytes[0], bytes[1]]) {
        Some(byte_order) => byte_order.read_u16(&bytes[2..4]) == 42,
        None => false,
    }
}

// =============================================================================
// Tests
// =============================================================================
