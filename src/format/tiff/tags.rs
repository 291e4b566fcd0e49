//! TIFF field types and tag identifiers.
//!
//! Tag ids are plain `u16`s on the wire and in the tag stores. The enums here
//! name the ones the decoder itself cares about (directory pointers, make and
//! model, thumbnail location) plus the common EXIF and GPS vocabulary used by
//! the description tables. Unknown ids are not an error.

// =============================================================================
// TIFF Field Types
// =============================================================================

/// The twelve TIFF 6.0 field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum FieldType {
    /// Unsigned 8-bit integer
    Byte = 1,
    /// 8-bit character, NUL terminated
    Ascii = 2,
    /// Unsigned 16-bit integer
    Short = 3,
    /// Unsigned 32-bit integer
    Long = 4,
    /// Two unsigned 32-bit integers: numerator, denominator
    Rational = 5,
    /// Signed 8-bit integer
    SByte = 6,
    /// Opaque bytes
    Undefined = 7,
    /// Signed 16-bit integer
    SShort = 8,
    /// Signed 32-bit integer
    SLong = 9,
    /// Two signed 32-bit integers
    SRational = 10,
    /// IEEE single precision
    Float = 11,
    /// IEEE double precision
    Double = 12,
}

impl FieldType {
    /// Maximum bytes stored inline in an IFD entry.
    pub const INLINE_THRESHOLD: usize = 4;

    /// Size of a single component in bytes.
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            FieldType::Byte | FieldType::Ascii | FieldType::SByte | FieldType::Undefined => 1,
            FieldType::Short | FieldType::SShort => 2,
            FieldType::Long | FieldType::SLong | FieldType::Float => 4,
            FieldType::Rational | FieldType::SRational | FieldType::Double => 8,
        }
    }

    /// Returns `None` for codes outside 1..=12.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(FieldType::Byte),
            2 => Some(FieldType::Ascii),
            3 => Some(FieldType::Short),
            4 => Some(FieldType::Long),
            5 => Some(FieldType::Rational),
            6 => Some(FieldType::SByte),
            7 => Some(FieldType::Undefined),
            8 => Some(FieldType::SShort),
            9 => Some(FieldType::SLong),
            10 => Some(FieldType::SRational),
            11 => Some(FieldType::Float),
            12 => Some(FieldType::Double),
            _ => None,
        }
    }

    /// Whether `count` components fit in the 4 byte value field.
    #[inline]
    pub fn fits_inline(self, count: u32) -> bool {
        self.size_in_bytes() as u64 * count as u64 <= Self::INLINE_THRESHOLD as u64
    }

    pub const fn name(self) -> &'static str {
        match self {
            FieldType::Byte => "BYTE",
            FieldType::Ascii => "ASCII",
            FieldType::Short => "SHORT",
            FieldType::Long => "LONG",
            FieldType::Rational => "RATIONAL",
            FieldType::SByte => "SBYTE",
            FieldType::Undefined => "UNDEFINED",
            FieldType::SShort => "SSHORT",
            FieldType::SLong => "SLONG",
            FieldType::SRational => "SRATIONAL",
            FieldType::Float => "FLOAT",
            FieldType::Double => "DOUBLE",
        }
    }
}

// =============================================================================
// Tag vocabularies
// =============================================================================

macro_rules! tag_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $variant:ident = $value:literal => $label:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u16)]
        pub enum $name {
            $( $variant = $value, )*
        }

        impl $name {
            /// Returns `None` for ids outside this vocabulary.
            pub fn from_u16(value: u16) -> Option<Self> {
                match value {
                    $( $value => Some($name::$variant), )*
                    _ => None,
                }
            }

            #[inline]
            pub const fn as_u16(self) -> u16 {
                self as u16
            }

            /// Human readable tag name.
            pub const fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )*
                }
            }
        }
    };
}

tag_enum! {
    /// Tags of IFD0, the thumbnail IFD, the EXIF sub-IFD and the
    /// interoperability IFD.
    pub enum ExifTag {
        InteropIndex = 0x0001 => "Interoperability Index",
        InteropVersion = 0x0002 => "Interoperability Version",
        NewSubfileType = 0x00FE => "New Subfile Type",
        ImageWidth = 0x0100 => "Image Width",
        ImageHeight = 0x0101 => "Image Height",
        BitsPerSample = 0x0102 => "Bits Per Sample",
        Compression = 0x0103 => "Compression",
        PhotometricInterpretation = 0x0106 => "Photometric Interpretation",
        ImageDescription = 0x010E => "Image Description",
        Make = 0x010F => "Make",
        Model = 0x0110 => "Model",
        StripOffsets = 0x0111 => "Strip Offsets",
        Orientation = 0x0112 => "Orientation",
        SamplesPerPixel = 0x0115 => "Samples Per Pixel",
        RowsPerStrip = 0x0116 => "Rows Per Strip",
        StripByteCounts = 0x0117 => "Strip Byte Counts",
        XResolution = 0x011A => "X Resolution",
        YResolution = 0x011B => "Y Resolution",
        PlanarConfiguration = 0x011C => "Planar Configuration",
        ResolutionUnit = 0x0128 => "Resolution Unit",
        Software = 0x0131 => "Software",
        DateTime = 0x0132 => "Date/Time",
        Artist = 0x013B => "Artist",
        SubIfds = 0x014A => "Sub IFD Pointers",
        ThumbnailOffset = 0x0201 => "Thumbnail Offset",
        ThumbnailLength = 0x0202 => "Thumbnail Length",
        YCbCrPositioning = 0x0213 => "YCbCr Positioning",
        Copyright = 0x8298 => "Copyright",
        ExposureTime = 0x829A => "Exposure Time",
        FNumber = 0x829D => "F-Number",
        ExifOffset = 0x8769 => "Exif IFD Pointer",
        ExposureProgram = 0x8822 => "Exposure Program",
        GpsInfo = 0x8825 => "GPS Info Pointer",
        IsoSpeed = 0x8827 => "ISO Speed Ratings",
        ExifVersion = 0x9000 => "Exif Version",
        DateTimeOriginal = 0x9003 => "Date/Time Original",
        DateTimeDigitized = 0x9004 => "Date/Time Digitized",
        ComponentsConfiguration = 0x9101 => "Components Configuration",
        ShutterSpeedValue = 0x9201 => "Shutter Speed Value",
        ApertureValue = 0x9202 => "Aperture Value",
        ExposureBiasValue = 0x9204 => "Exposure Bias Value",
        MaxApertureValue = 0x9205 => "Max Aperture Value",
        MeteringMode = 0x9207 => "Metering Mode",
        Flash = 0x9209 => "Flash",
        FocalLength = 0x920A => "Focal Length",
        MakerNote = 0x927C => "Makernote",
        UserComment = 0x9286 => "User Comment",
        SubSecTime = 0x9290 => "Sub-Sec Time",
        FlashpixVersion = 0xA000 => "FlashPix Version",
        ColorSpace = 0xA001 => "Color Space",
        ExifImageWidth = 0xA002 => "Exif Image Width",
        ExifImageHeight = 0xA003 => "Exif Image Height",
        InteropOffset = 0xA005 => "Interoperability IFD Pointer",
        SensingMethod = 0xA217 => "Sensing Method",
        SceneType = 0xA301 => "Scene Type",
        ExposureMode = 0xA402 => "Exposure Mode",
        WhiteBalance = 0xA403 => "White Balance Mode",
        FocalLengthIn35mm = 0xA405 => "Focal Length 35",
        SceneCaptureType = 0xA406 => "Scene Capture Type",
        LensModel = 0xA434 => "Lens Model",
    }
}

tag_enum! {
    /// Tags of the GPS IFD.
    pub enum GpsTag {
        VersionId = 0x0000 => "GPS Version ID",
        LatitudeRef = 0x0001 => "GPS Latitude Ref",
        Latitude = 0x0002 => "GPS Latitude",
        LongitudeRef = 0x0003 => "GPS Longitude Ref",
        Longitude = 0x0004 => "GPS Longitude",
        AltitudeRef = 0x0005 => "GPS Altitude Ref",
        Altitude = 0x0006 => "GPS Altitude",
        TimeStamp = 0x0007 => "GPS Time-Stamp",
        Satellites = 0x0008 => "GPS Satellites",
        Status = 0x0009 => "GPS Status",
        MeasureMode = 0x000A => "GPS Measure Mode",
        Dop = 0x000B => "GPS DOP",
        SpeedRef = 0x000C => "GPS Speed Ref",
        Speed = 0x000D => "GPS Speed",
        ImgDirectionRef = 0x0010 => "GPS Img Direction Ref",
        ImgDirection = 0x0011 => "GPS Img Direction",
        MapDatum = 0x0012 => "GPS Map Datum",
        DateStamp = 0x001D => "GPS Date Stamp",
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // FieldType Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_field_type_sizes() {
        let expected = [1, 1, 2, 4, 8, 1, 1, 2, 4, 8, 4, 8];
        for (code, size) in (1u16..=12).zip(expected) {
            let ft = FieldType::from_u16(code).unwrap();
            assert_eq!(ft.size_in_bytes(), size, "type code {}", code);
            assert_eq!(ft as u16, code);
        }
    }

    #[test]
    fn test_field_type_unknown_codes() {
        assert_eq!(FieldType::from_u16(0), None);
        assert_eq!(FieldType::from_u16(13), None);
        assert_eq!(FieldType::from_u16(16), None);
    }

    #[test]
    fn test_fits_inline() {
        assert!(FieldType::Byte.fits_inline(4));
        assert!(FieldType::Short.fits_inline(2));
        assert!(FieldType::Long.fits_inline(1));
        assert!(FieldType::Ascii.fits_inline(0));

        assert!(!FieldType::Byte.fits_inline(5));
        assert!(!FieldType::Short.fits_inline(3));
        assert!(!FieldType::Rational.fits_inline(1));
        assert!(!FieldType::Double.fits_inline(1));
        assert!(!FieldType::Long.fits_inline(u32::MAX));
    }

    // -------------------------------------------------------------------------
    // Tag vocabulary Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_exif_tag_from_u16() {
        assert_eq!(ExifTag::from_u16(0x010F), Some(ExifTag::Make));
        assert_eq!(ExifTag::from_u16(0x8769), Some(ExifTag::ExifOffset));
        assert_eq!(ExifTag::from_u16(0x927C), Some(ExifTag::MakerNote));
        assert_eq!(ExifTag::from_u16(0xBEEF), None);
    }

    #[test]
    fn test_tag_names() {
        assert_eq!(ExifTag::ExposureTime.name(), "Exposure Time");
        assert_eq!(ExifTag::ResolutionUnit.as_u16(), 0x0128);
        assert_eq!(GpsTag::Latitude.name(), "GPS Latitude");
        assert_eq!(GpsTag::from_u16(0x0001), Some(GpsTag::LatitudeRef));
    }
}
