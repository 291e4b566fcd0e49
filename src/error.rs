use thiserror::Error;

/// Errors raised by the bounded byte reader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// Requested range falls outside the buffer
    #[error("Range out of bounds: requested {len} bytes at offset {offset}, size is {size}")]
    OutOfBounds { offset: usize, len: usize, size: usize },
}

/// Fatal, header-level errors. No directory can be decoded when one of these occurs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TiffError {
    /// Buffer is too small to contain the signature and TIFF header
    #[error("Data too small: need at least {required} bytes, got {actual}")]
    FileTooSmall { required: usize, actual: usize },

    /// The EXIF identifier is missing
    #[error("Missing EXIF signature: expected \"Exif\\0\\0\"")]
    MissingSignature,

    /// Byte order marker is neither II nor MM
    #[error("Invalid byte order marker: expected 0x4949 (II) or 0x4D4D (MM), got 0x{0:04X}")]
    InvalidByteOrder(u16),

    /// TIFF magic number is not 42
    #[error("Invalid TIFF magic: expected 0x002A, got 0x{0:04X}")]
    InvalidMagic(u16),
}

/// Errors returned when reading from or writing to a tag store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// Tag is not present in the directory
    #[error("Tag 0x{0:04X} is not present")]
    MissingTag(u16),

    /// Stored value cannot be represented as the requested type
    #[error("Tag 0x{tag:04X} cannot be read as {expected}: stored value is {actual}")]
    Coercion {
        tag: u16,
        expected: &'static str,
        actual: &'static str,
    },

    /// The store refuses the write
    #[error("Cannot set tag 0x{tag:04X}: {reason}")]
    InvalidValue { tag: u16, reason: &'static str },

    /// String value matched none of the supported date layouts
    #[error("Tag 0x{tag:04X} value {value:?} is not a recognised date")]
    InvalidDate { tag: u16, value: String },
}
