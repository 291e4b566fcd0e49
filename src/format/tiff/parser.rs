//! TIFF header and directory entry parsing.
//!
//! # EXIF/TIFF Header Structure
//!
//! ```text
//! Bytes 0-5:   "Exif\0\0" identifier (EXIF payloads only)
//! Bytes 0-1:   Byte order (0x4949 = little-endian "II", 0x4D4D = big-endian "MM")
//! Bytes 2-3:   Magic (42 = 0x002A)
//! Bytes 4-7:   Offset to first IFD, relative to the TIFF base
//! ```
//!
//! The "TIFF base" is the first byte of the byte order marker. Every offset
//! stored inside the structure is relative to it.

use crate::error::{ReadError, TiffError};
use crate::io::ByteReader;

use super::tags::FieldType;

// =============================================================================
// Constants
// =============================================================================

/// Magic bytes indicating little-endian byte order ("II" for Intel)
const BYTE_ORDER_LITTLE_ENDIAN: u16 = 0x4949;

/// Magic bytes indicating big-endian byte order ("MM" for Motorola)
const BYTE_ORDER_BIG_ENDIAN: u16 = 0x4D4D;

/// Magic number for classic TIFF
const TIFF_MAGIC: u16 = 0x002A;

/// Identifier preceding the TIFF header inside an EXIF segment
pub const EXIF_SIGNATURE: &[u8] = b"Exif\0\0";

/// Size of the classic TIFF header in bytes
pub const TIFF_HEADER_SIZE: usize = 8;

/// Size of the EXIF identifier plus the TIFF header
pub const EXIF_HEADER_SIZE: usize = EXIF_SIGNATURE.len() + TIFF_HEADER_SIZE;

/// Size of a single IFD entry
pub const IFD_ENTRY_SIZE: usize = 12;

// =============================================================================
// ByteOrder
// =============================================================================

/// Byte order (endianness) of a TIFF structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Little-endian ("II" = Intel)
    LittleEndian,
    /// Big-endian ("MM" = Motorola)
    BigEndian,
}

impl ByteOrder {
    /// Interpret a two byte marker (`II` or `MM`).
    pub fn from_marker(marker: [u8; 2]) -> Option<Self> {
        match u16::from_be_bytes(marker) {
            BYTE_ORDER_LITTLE_ENDIAN => Some(ByteOrder::LittleEndian),
            BYTE_ORDER_BIG_ENDIAN => Some(ByteOrder::BigEndian),
            _ => None,
        }
    }

    /// Decode the first 2 bytes of `bytes`. Panics on shorter slices;
    /// callers pass ranges already checked by the reader.
    #[inline]
    pub(crate) fn read_u16(self, bytes: &[u8]) -> u16 {
        let raw = [bytes[0], bytes[1]];
        match self {
            ByteOrder::LittleEndian => u16::from_le_bytes(raw),
            ByteOrder::BigEndian => u16::from_be_bytes(raw),
        }
    }

    /// Decode the first 4 bytes of `bytes`.
    #[inline]
    pub(crate) fn read_u32(self, bytes: &[u8]) -> u32 {
        let raw = [bytes[0], bytes[1], bytes[2], bytes[3]];
        match self {
            ByteOrder::LittleEndian => u32::from_le_bytes(raw),
            ByteOrder::BigEndian => u32::from_be_bytes(raw),
        }
    }

    /// Decode the first 8 bytes of `bytes`.
    #[inline]
    pub(crate) fn read_u64(self, bytes: &[u8]) -> u64 {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&bytes[..8]);
        match self {
            ByteOrder::LittleEndian => u64::from_le_bytes(raw),
            ByteOrder::BigEndian => u64::from_be_bytes(raw),
        }
    }
}

// =============================================================================
// TiffHeader
// =============================================================================

/// Parsed TIFF header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffHeader {
    /// Byte order for all multi-byte values
    pub byte_order: ByteOrder,

    /// Offset to the first IFD, relative to the TIFF base
    pub first_ifd_offset: u32,
}

impl TiffHeader {
    /// Parse a TIFF header from bytes starting at the TIFF base.
    ///
    /// # Errors
    /// - `FileTooSmall` if fewer than 8 bytes are available
    /// - `InvalidByteOrder` if the marker is not II or MM
    /// - `InvalidMagic` if the magic number is not 42
    pub fn parse(bytes: &[u8]) -> Result<Self, TiffError> {
        if bytes.len() < TIFF_HEADER_SIZE {
            return Err(TiffError::FileTooSmall {
                required: TIFF_HEADER_SIZE,
                actual: bytes.len(),
            });
        }

        let marker = [bytes[0], bytes[1]];
        let byte_order = ByteOrder::from_marker(marker)
            .ok_or(TiffError::InvalidByteOrder(u16::from_be_bytes(marker)))?;

        let magic = byte_order.read_u16(&bytes[2..4]);
        if magic != TIFF_MAGIC {
            return Err(TiffError::InvalidMagic(magic));
        }

        Ok(TiffHeader {
            byte_order,
            first_ifd_offset: byte_order.read_u32(&bytes[4..8]),
        })
    }

    /// Parse the `Exif\0\0` identifier followed by a TIFF header.
    pub fn parse_exif(bytes: &[u8]) -> Result<Self, TiffError> {
        if bytes.len() < EXIF_HEADER_SIZE {
            return Err(TiffError::FileTooSmall {
                required: EXIF_HEADER_SIZE,
                actual: bytes.len(),
            });
        }
        if !bytes.starts_with(EXIF_SIGNATURE) {
            return Err(TiffError::MissingSignature);
        }
        Self::parse(&bytes[EXIF_SIGNATURE.len()..])
    }
}

// =============================================================================
// IfdEntry
// =============================================================================

/// A raw 12 byte directory entry.
///
/// ```text
/// Bytes 0-1:  Tag id
/// Bytes 2-3:  Field type code
/// Bytes 4-7:  Component count
/// Bytes 8-11: Value (if it fits in 4 bytes) or offset to the value
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfdEntry {
    /// Tag id
    pub tag: u16,

    /// Field type code as stored
    pub field_type_raw: u16,

    /// Decoded field type, `None` for unrecognised codes
    pub field_type: Option<FieldType>,

    /// Number of components
    pub count: u32,

    /// Absolute buffer position of the 4 byte value/offset field
    pub value_field_position: usize,

    /// Raw value/offset field
    pub value_offset_bytes: [u8; 4],
}

impl IfdEntry {
    /// Read the entry starting at absolute `position`.
    pub fn read(reader: &ByteReader, position: usize) -> Result<Self, ReadError> {
        let tag = reader.read_u16(position)?;
        let field_type_raw = reader.read_u16(position + 2)?;
        let count = reader.read_u32(position + 4)?;
        let raw = reader.read_bytes(position + 8, 4)?;

        Ok(IfdEntry {
            tag,
            field_type_raw,
            field_type: FieldType::from_u16(field_type_raw),
            count,
            value_field_position: position + 8,
            value_offset_bytes: [raw[0], raw[1], raw[2], raw[3]],
        })
    }

    /// Total value size in bytes, `None` for unknown field types.
    pub fn value_byte_size(&self) -> Option<u64> {
        self.field_type
            .map(|ft| ft.size_in_bytes() as u64 * self.count as u64)
    }

    /// Whether the value is stored in the entry itself.
    pub fn is_inline(&self) -> bool {
        self.field_type
            .is_some_and(|ft| ft.fits_inline(self.count))
    }

    /// The value/offset field interpreted as an offset.
    #[inline]
    pub fn value_offset(&self, byte_order: ByteOrder) -> u32 {
        byte_order.read_u32(&self.value_offset_bytes)
    }
}

// =============================================================================
// Tests
// =============================================================================
