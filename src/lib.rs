//! # exif-ifd
//!
//! A decoder for the EXIF metadata embedded in JPEG and TIFF-based images.
//!
//! EXIF data is a TIFF structure: a header naming the byte order, then a
//! graph of Image File Directories (IFDs) linked by offsets. This crate
//! walks that graph defensively. Every read is bounds checked, every
//! directory offset is visited at most once, and problems inside a
//! directory are recorded on it instead of aborting the decode.
//!
//! ## Architecture
//!
//! - [`io`] - Bounded byte reader honouring the declared byte order
//! - [`mod@format`] - Header parsing, the IFD walker and payload detection
//! - [`directory`] - Typed tag values and per-directory stores
//! - [`makernote`] - Vendor MakerNote layout resolution
//! - [`metadata`] - The collection of decoded directories
//! - [`describe`] - Tag names and human-readable descriptions
//! - [`config`] - Decoder options and CLI arguments
//!
//! ## Example
//!
//! ```rust,no_run
//! use exif_ifd::{decode, DirectoryKind};
//!
//! let segment = std::fs::read("photo.exif").unwrap();
//! let metadata = decode(&segment);
//!
//! if let Some(exif) = metadata.first_of_kind(DirectoryKind::Exif) {
//!     for tag in exif.tags() {
//!         println!("{}", tag);
//!     }
//! }
//! for (kind, message) in metadata.errors() {
//!     eprintln!("{}: {}", kind, message);
//! }
//! ```

pub mod config;
pub mod describe;
pub mod directory;
pub mod error;
pub mod format;
pub mod io;
pub mod makernote;
pub mod metadata;

// Re-export commonly used types
pub use config::{DecodeOptions, FatalPolicy};
pub use directory::{
    Directory, DirectoryKind, EncodedString, Encoding, Rational, Tag, TagArray, TagValue,
    ValueSink,
};
pub use error::{ReadError, TagError, TiffError};
pub use format::tiff::{decode, decode_tiff, ByteOrder, Decoder, ExifTag, FieldType, GpsTag};
pub use format::{detect_payload, is_tiff_header, PayloadKind};
pub use io::ByteReader;
pub use makernote::{
    MakernoteBase, MakernoteLayout, MakernoteResolver, NoMakernotes, SignatureResolver, Vendor,
};
pub use metadata::Metadata;
