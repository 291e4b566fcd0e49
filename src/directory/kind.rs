use crate::makernote::Vendor;

use super::store::Directory;

/// The closed set of directory kinds a decode pass can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectoryKind {
    /// The main image directory (IFD0)
    Ifd0,
    /// IFD1, linked from IFD0, describing the embedded thumbnail
    Thumbnail,
    /// The EXIF sub-IFD
    Exif,
    /// A directory listed by the SubIFDs tag (0x014A)
    SubIfd,
    Gps,
    Interop,
    /// A vendor MakerNote directory
    Makernote(Vendor),
    /// Pseudo-directory carrying a fatal decode error; holds no tags
    Error,
}

impl DirectoryKind {
    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            DirectoryKind::Ifd0 => "Exif IFD0",
            DirectoryKind::Thumbnail => "Exif Thumbnail",
            DirectoryKind::Exif => "Exif SubIFD",
            DirectoryKind::SubIfd => "Exif Image",
            DirectoryKind::Gps => "GPS",
            DirectoryKind::Interop => "Interoperability",
            DirectoryKind::Makernote(vendor) => vendor.directory_name(),
            DirectoryKind::Error => "Error",
        }
    }

    /// Kind of the directory reached through this one's next-IFD link.
    pub const fn chained(self) -> Self {
        match self {
            DirectoryKind::Ifd0 => DirectoryKind::Thumbnail,
            other => other,
        }
    }

    /// Whether stores of this kind accept tag values.
    pub const fn accepts_tags(self) -> bool {
        !matches!(self, DirectoryKind::Error)
    }
}

impl std::fmt::Display for DirectoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Create an empty store for `kind`.
pub fn new_store(kind: DirectoryKind) -> Directory {
    Directory::new(kind)
}
