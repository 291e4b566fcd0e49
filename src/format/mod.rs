//! Decoding of EXIF and TIFF payloads.
//!
//! Use [`detect::detect_payload`] to locate the EXIF data in a file, then
//! [`tiff::decode`] or [`tiff::decode_tiff`] depending on its shape.

pub mod detect;
pub mod tiff;

pub use detect::{detect_payload, is_tiff_header, PayloadKind};
