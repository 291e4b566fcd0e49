//! TIFF structure decoding for EXIF metadata.
//!
//! # Key Concepts
//!
//! - **Byte order**: the header declares its endianness (II = little-endian,
//!   MM = big-endian). Every multi-byte value is read in that order, except
//!   inside MakerNotes that declare their own.
//!
//! - **TIFF base**: offsets stored in the data are relative to the first
//!   byte of the TIFF header. For an EXIF segment that is 6 bytes in, after
//!   the `Exif\0\0` signature.
//!
//! - **IFD (Image File Directory)**: a counted table of 12 byte entries
//!   followed by the offset of the next IFD. Some entries point at further
//!   IFDs (EXIF, GPS, interoperability, SubIFDs, MakerNote).
//!
//! - **Inline vs offset values**: values of up to 4 bytes are stored in the
//!   entry itself, larger values at an offset from the TIFF base.

mod parser;
mod tags;
mod values;
mod walker;

pub use parser::{
    ByteOrder, IfdEntry, TiffHeader, EXIF_HEADER_SIZE, EXIF_SIGNATURE, IFD_ENTRY_SIZE,
    TIFF_HEADER_SIZE,
};
pub use tags::{ExifTag, FieldType, GpsTag};
pub use values::decode_value;
pub use walker::{decode, decode_tiff, Decoder};
