//! Test utilities for integration tests.
//!
//! [`ExifBuilder`] lays out a TIFF structure byte by byte. Everything is
//! appended in order and each append returns its offset relative to the TIFF
//! base, so tests write children before the directories that point to them.

// =============================================================================
// Byte order
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrderType {
    LittleEndian,
    BigEndian,
}

impl ByteOrderType {
    pub fn marker(self) -> &'static [u8; 2] {
        match self {
            ByteOrderType::LittleEndian => b"II",
            ByteOrderType::BigEndian => b"MM",
        }
    }

    pub fn u16(self, value: u16) -> [u8; 2] {
        match self {
            ByteOrderType::LittleEndian => value.to_le_bytes(),
            ByteOrderType::BigEndian => value.to_be_bytes(),
        }
    }

    pub fn u32(self, value: u32) -> [u8; 4] {
        match self {
            ByteOrderType::LittleEndian => value.to_le_bytes(),
            ByteOrderType::BigEndian => value.to_be_bytes(),
        }
    }
}

// =============================================================================
// Entries
// =============================================================================

/// One 12 byte IFD entry.
#[derive(Debug, Clone, Copy)]
pub struct Entry {
    tag: u16,
    field_type: u16,
    count: u32,
    field: Field,
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Short(u16),
    Long(u32),
    Raw([u8; 4]),
}

impl Entry {
    /// SHORT value stored inline.
    pub fn short(tag: u16, value: u16) -> Self {
        Self { tag, field_type: 3, count: 1, field: Field::Short(value) }
    }

    /// LONG value stored inline.
    pub fn long(tag: u16, value: u32) -> Self {
        Self { tag, field_type: 4, count: 1, field: Field::Long(value) }
    }

    /// Value stored at `offset` from the TIFF base.
    pub fn at(tag: u16, field_type: u16, count: u32, offset: u32) -> Self {
        Self { tag, field_type, count, field: Field::Long(offset) }
    }

    /// Value field copied verbatim, e.g. short ASCII strings.
    pub fn raw(tag: u16, field_type: u16, count: u32, field: [u8; 4]) -> Self {
        Self { tag, field_type, count, field: Field::Raw(field) }
    }
}

// =============================================================================
// ExifBuilder
// =============================================================================

/// Builder for test EXIF segments and TIFF files.
pub struct ExifBuilder {
    byte_order: ByteOrderType,
    /// TIFF structure, starting with the header
    data: Vec<u8>,
}

impl ExifBuilder {
    /// Header only, with the first IFD offset set to 8.
    pub fn new(byte_order: ByteOrderType) -> Self {
        let mut data = byte_order.marker().to_vec();
        data.extend_from_slice(&byte_order.u16(42));
        data.extend_from_slice(&byte_order.u32(8));
        Self { byte_order, data }
    }

    pub fn byte_order(&self) -> ByteOrderType {
        self.byte_order
    }

    /// Offset of the next byte to be appended.
    pub fn position(&self) -> u32 {
        self.data.len() as u32
    }

    pub fn set_first_ifd(&mut self, offset: u32) -> &mut Self {
        let field = self.byte_order.u32(offset);
        self.data[4..8].copy_from_slice(&field);
        self
    }

    /// Append an IFD and return its offset.
    pub fn ifd(&mut self, entries: &[Entry], next: u32) -> u32 {
        let offset = self.position();
        let order = self.byte_order;

        self.data.extend_from_slice(&order.u16(entries.len() as u16));
        for entry in entries {
            self.data.extend_from_slice(&order.u16(entry.tag));
            self.data.extend_from_slice(&order.u16(entry.field_type));
            self.data.extend_from_slice(&order.u32(entry.count));
            match entry.field {
                Field::Short(value) => {
                    self.data.extend_from_slice(&order.u16(value));
                    self.data.extend_from_slice(&[0, 0]);
                }
                Field::Long(value) => self.data.extend_from_slice(&order.u32(value)),
                Field::Raw(bytes) => self.data.extend_from_slice(&bytes),
            }
        }
        self.data.extend_from_slice(&order.u32(next));
        offset
    }

    /// Append raw bytes and return their offset.
    pub fn bytes(&mut self, bytes: &[u8]) -> u32 {
        let offset = self.position();
        self.data.extend_from_slice(bytes);
        offset
    }

    /// Append a NUL-terminated string and return its offset.
    pub fn ascii(&mut self, text: &str) -> u32 {
        let offset = self.bytes(text.as_bytes());
        self.data.push(0);
        offset
    }

    /// Append unsigned rationals and return their offset.
    pub fn rationals(&mut self, values: &[(u32, u32)]) -> u32 {
        let offset = self.position();
        for &(numerator, denominator) in values {
            self.data.extend_from_slice(&self.byte_order.u32(numerator));
            self.data.extend_from_slice(&self.byte_order.u32(denominator));
        }
        offset
    }

    /// Append LONGs and return their offset.
    pub fn longs(&mut self, values: &[u32]) -> u32 {
        let offset = self.position();
        for &value in values {
            self.data.extend_from_slice(&self.byte_order.u32(value));
        }
        offset
    }

    /// The bare TIFF structure.
    pub fn build_tiff(&self) -> Vec<u8> {
        self.data.clone()
    }

    /// The TIFF structure behind the `Exif\0\0` signature.
    pub fn build_exif(&self) -> Vec<u8> {
        let mut segment = b"Exif\0\0".to_vec();
        segment.extend_from_slice(&self.data);
        segment
    }
}

// =============================================================================
// Sample payloads
// =============================================================================

/// A camera-like EXIF segment:
///
/// - IFD0: Make "Canon", Model, ResolutionUnit 2, ExifOffset
/// - EXIF: ExposureTime 1/77, FNumber 28/10, DateTimeOriginal, ExifVersion
/// - IFD1 (thumbnail): JPEGInterchangeFormat and its length
pub fn create_camera_exif(byte_order: ByteOrderType) -> Vec<u8> {
    let mut b = ExifBuilder::new(byte_order);

    let make = b.ascii("Canon");
    let model = b.ascii("Canon EOS 5D");
    let exposure = b.rationals(&[(1, 77)]);
    let f_number = b.rationals(&[(28, 10)]);
    let date = b.ascii("2019:03:12 14:05:01");
    let thumbnail = b.bytes(&THUMBNAIL_JPEG);

    let exif = b.ifd(
        &[
            Entry::at(0x829A, 5, 1, exposure),
            Entry::at(0x829D, 5, 1, f_number),
            Entry::raw(0x9000, 7, 4, *b"0230"),
            Entry::at(0x9003, 2, 20, date),
        ],
        0,
    );
    let ifd1 = b.ifd(
        &[
            Entry::short(0x0103, 6),
            Entry::long(0x0201, thumbnail),
            Entry::long(0x0202, THUMBNAIL_JPEG.len() as u32),
        ],
        0,
    );
    let ifd0 = b.ifd(
        &[
            Entry::at(0x010F, 2, 6, make),
            Entry::at(0x0110, 2, 13, model),
            Entry::short(0x0128, 2),
            Entry::long(0x8769, exif),
        ],
        ifd1,
    );
    b.set_first_ifd(ifd0);
    b.build_exif()
}

/// Smallest plausible JPEG: SOI, a comment, EOI.
pub const THUMBNAIL_JPEG: [u8; 10] = [0xFF, 0xD8, 0xFF, 0xFE, 0x00, 0x04, b'h', b'i', 0xFF, 0xD9];
