//! MakerNote layout resolution.
//!
//! The walker does not know vendors. When it meets a MakerNote it asks a
//! [`MakernoteResolver`] where the vendor IFD starts, which offset origin its
//! pointers use, and which store kind to decode it into.
//!
//! [`SignatureResolver`] recognises the common layouts by the header bytes at
//! the start of the MakerNote, falling back to the camera make for vendors
//! that write a bare IFD.

use crate::directory::DirectoryKind;
use crate::format::tiff::ByteOrder;

// =============================================================================
// Vendor
// =============================================================================

/// Camera vendors with a known MakerNote layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vendor {
    Olympus,
    NikonType1,
    NikonType2,
    Sony,
    Fujifilm,
    Pentax,
    Panasonic,
    Canon,
}

impl Vendor {
    pub const fn directory_name(self) -> &'static str {
        match self {
            Vendor::Olympus => "Olympus Makernote",
            Vendor::NikonType1 | Vendor::NikonType2 => "Nikon Makernote",
            Vendor::Sony => "Sony Makernote",
            Vendor::Fujifilm => "Fujifilm Makernote",
            Vendor::Pentax => "Pentax Makernote",
            Vendor::Panasonic => "Panasonic Makernote",
            Vendor::Canon => "Canon Makernote",
        }
    }
}

// =============================================================================
// Layout
// =============================================================================

/// Origin that offsets inside a MakerNote IFD are relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MakernoteBase {
    /// Same TIFF base as the enclosing EXIF data
    Tiff,
    /// First byte of the MakerNote value
    Makernote,
    /// A fixed distance into the MakerNote value
    MakernoteOffset(usize),
}

/// Where and how to decode a MakerNote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MakernoteLayout {
    /// Store kind to decode into
    pub kind: DirectoryKind,

    /// Start of the IFD, relative to the first byte of the MakerNote value
    pub ifd_offset: usize,

    /// Offset origin for pointers inside the IFD
    pub base: MakernoteBase,

    /// Byte order override, `None` keeps the enclosing order
    pub byte_order: Option<ByteOrder>,
}

impl MakernoteLayout {
    fn new(vendor: Vendor, ifd_offset: usize, base: MakernoteBase) -> Self {
        Self {
            kind: DirectoryKind::Makernote(vendor),
            ifd_offset,
            base,
            byte_order: None,
        }
    }

    fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = Some(byte_order);
        self
    }
}

// =============================================================================
// Resolver
// =============================================================================

/// Chooses how a MakerNote is decoded.
///
/// `make` and `model` come from IFD0 when they were decoded before the
/// MakerNote was reached. `makernote` is the MakerNote value, bounded to the
/// entry's declared size.
pub trait MakernoteResolver: Send + Sync {
    fn resolve(
        &self,
        make: Option<&str>,
        model: Option<&str>,
        makernote: &[u8],
    ) -> Option<MakernoteLayout>;
}

/// Resolver that never follows MakerNotes; they stay as raw bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMakernotes;

impl MakernoteResolver for NoMakernotes {
    fn resolve(&self, _: Option<&str>, _: Option<&str>, _: &[u8]) -> Option<MakernoteLayout> {
        None
    }
}

/// Header-signature based resolver for the common vendors.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureResolver;

impl MakernoteResolver for SignatureResolver {
    fn resolve(
        &self,
        make: Option<&str>,
        _model: Option<&str>,
        data: &[u8],
    ) -> Option<MakernoteLayout> {
        let make = make.map(|m| m.trim().to_ascii_uppercase()).unwrap_or_default();

        if data.starts_with(b"OLYMPUS\0") {
            // Newer Olympus: own byte order marker, offsets relative to the makernote
            let byte_order = ByteOrder::from_marker(marker_at(data, 8)?)?;
            return Some(
                MakernoteLayout::new(Vendor::Olympus, 12, MakernoteBase::Makernote)
                    .with_byte_order(byte_order),
            );
        }
        if data.starts_with(b"OLYMP\0") || data.starts_with(b"EPSON") || data.starts_with(b"AGFA")
        {
            return Some(MakernoteLayout::new(Vendor::Olympus, 8, MakernoteBase::Tiff));
        }
        if data.starts_with(b"Nikon\0\x02") {
            // Embedded TIFF header 10 bytes in; it is the base for everything below it
            let header = data.get(10..18)?;
            let byte_order = ByteOrder::from_marker([header[0], header[1]])?;
            let first_ifd = byte_order.read_u32(&header[4..8]) as usize;
            return Some(
                MakernoteLayout::new(
                    Vendor::NikonType2,
                    10usize.checked_add(first_ifd)?,
                    MakernoteBase::MakernoteOffset(10),
                )
                .with_byte_order(byte_order),
            );
        }
        if data.starts_with(b"Nikon\0\x01") {
            return Some(MakernoteLayout::new(Vendor::NikonType1, 8, MakernoteBase::Tiff));
        }
        if data.starts_with(b"SONY CAM") || data.starts_with(b"SONY DSC") {
            return Some(MakernoteLayout::new(Vendor::Sony, 12, MakernoteBase::Tiff));
        }
        if data.starts_with(b"FUJIFILM") {
            // Always little-endian, IFD offset stored right after the signature
            let offset = data.get(8..12)?;
            let ifd_offset = ByteOrder::LittleEndian.read_u32(offset) as usize;
            return Some(
                MakernoteLayout::new(Vendor::Fujifilm, ifd_offset, MakernoteBase::Makernote)
                    .with_byte_order(ByteOrder::LittleEndian),
            );
        }
        if data.starts_with(b"AOC\0") {
            return Some(MakernoteLayout::new(Vendor::Pentax, 6, MakernoteBase::Makernote));
        }
        if data.starts_with(b"Panasonic\0\0\0") {
            return Some(MakernoteLayout::new(Vendor::Panasonic, 12, MakernoteBase::Tiff));
        }

        // Header-less layouts, identified by make
        if make.starts_with("NIKON") {
            return Some(MakernoteLayout::new(Vendor::NikonType2, 0, MakernoteBase::Tiff));
        }
        if make.starts_with("PENTAX") || make.starts_with("ASAHI") {
            return Some(MakernoteLayout::new(Vendor::Pentax, 0, MakernoteBase::Makernote));
        }
        if make.starts_with("CANON") {
            return Some(MakernoteLayout::new(Vendor::Canon, 0, MakernoteBase::Tiff));
        }

        None
    }
}

fn marker_at(data: &[u8], offset: usize) -> Option<[u8; 2]> {
    let bytes = data.get(offset..offset + 2)?;
    Some([bytes[0], bytes[1]])
}

// =============================================================================
// Tests
// =============================================================================
