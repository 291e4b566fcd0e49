//! Tag names and human-readable descriptions.
//!
//! Names come from the tag vocabularies in [`crate::format::tiff`], chosen by
//! directory kind since the GPS and interoperability directories reuse small
//! tag ids. Descriptions render well-known tags the way photographers read
//! them (`1/77 sec`, `f/2.8`, `Inch`); anything without a dedicated
//! describer falls back to the value's string form.

use crate::directory::{Directory, DirectoryKind, Rational};
use crate::format::tiff::{ExifTag, GpsTag};

/// Renders one tag of a directory, `None` when the value does not fit the
/// tag's expected shape.
type Describer = fn(&Directory, u16) -> Option<String>;

// =============================================================================
// Names
// =============================================================================

/// Name of `id` within directories of `kind`.
pub fn tag_name(kind: DirectoryKind, id: u16) -> Option<&'static str> {
    match kind {
        DirectoryKind::Ifd0
        | DirectoryKind::Thumbnail
        | DirectoryKind::Exif
        | DirectoryKind::SubIfd
        | DirectoryKind::Interop => ExifTag::from_u16(id).map(ExifTag::name),
        DirectoryKind::Gps => GpsTag::from_u16(id).map(GpsTag::name),
        DirectoryKind::Makernote(_) | DirectoryKind::Error => None,
    }
}

// =============================================================================
// Descriptions
// =============================================================================

/// Description of tag `id` of `directory`, `None` when the tag is absent.
pub fn describe(directory: &Directory, id: u16) -> Option<String> {
    if let Some(describer) = describer(directory.kind(), id) {
        if let Some(description) = describer(directory, id) {
            return Some(description);
        }
    }
    directory.get_string(id)
}

fn describer(kind: DirectoryKind, id: u16) -> Option<Describer> {
    match kind {
        DirectoryKind::Gps => match GpsTag::from_u16(id)? {
            GpsTag::Latitude | GpsTag::Longitude => Some(coordinate),
            GpsTag::AltitudeRef => Some(altitude_ref),
            GpsTag::Altitude => Some(altitude),
            _ => None,
        },
        DirectoryKind::Makernote(_) | DirectoryKind::Error => None,
        _ => match ExifTag::from_u16(id)? {
            ExifTag::ExposureTime => Some(exposure_time),
            ExifTag::FNumber => Some(f_number),
            ExifTag::FocalLength => Some(focal_length),
            ExifTag::ResolutionUnit => Some(resolution_unit),
            ExifTag::Orientation => Some(orientation),
            ExifTag::ColorSpace => Some(color_space),
            ExifTag::ExifVersion | ExifTag::FlashpixVersion | ExifTag::InteropVersion => {
                Some(version)
            }
            _ => None,
        },
    }
}

fn exposure_time(directory: &Directory, id: u16) -> Option<String> {
    let value = directory.get_rational(id).ok()?;
    if value.denominator == 0 {
        return None;
    }
    Some(format!("{} sec", value.to_simple_string()))
}

fn f_number(directory: &Directory, id: u16) -> Option<String> {
    let value = finite(directory.get_double(id).ok()?)?;
    Some(format!("f/{:.1}", value))
}

fn focal_length(directory: &Directory, id: u16) -> Option<String> {
    let value = finite(directory.get_double(id).ok()?)?;
    Some(format!("{:.1} mm", value))
}

fn resolution_unit(directory: &Directory, id: u16) -> Option<String> {
    let text = match directory.get_int(id).ok()? {
        1 => "(No unit)",
        2 => "Inch",
        3 => "cm",
        _ => return None,
    };
    Some(text.to_string())
}

fn orientation(directory: &Directory, id: u16) -> Option<String> {
    let text = match directory.get_int(id).ok()? {
        1 => "Top, left side (Horizontal / normal)",
        2 => "Top, right side (Mirror horizontal)",
        3 => "Bottom, right side (Rotate 180)",
        4 => "Bottom, left side (Mirror vertical)",
        5 => "Left side, top (Mirror horizontal and rotate 270 CW)",
        6 => "Right side, top (Rotate 90 CW)",
        7 => "Right side, bottom (Mirror horizontal and rotate 90 CW)",
        8 => "Left side, bottom (Rotate 270 CW)",
        _ => return None,
    };
    Some(text.to_string())
}

fn color_space(directory: &Directory, id: u16) -> Option<String> {
    let text = match directory.get_int(id).ok()? {
        1 => "sRGB",
        0xFFFF => "Undefined",
        _ => return None,
    };
    Some(text.to_string())
}

/// Four ASCII digits, `"0230"` → `"2.30"`.
fn version(directory: &Directory, id: u16) -> Option<String> {
    let bytes = directory.get_bytes(id).ok()?;
    if bytes.len() != 4 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let text: String = bytes.iter().map(|&b| b as char).collect();
    let major = text[..2].trim_start_matches('0');
    let major = if major.is_empty() { "0" } else { major };
    Some(format!("{}.{}", major, &text[2..]))
}

fn coordinate(directory: &Directory, id: u16) -> Option<String> {
    let decimal = dms_to_decimal(&directory.get_rational_array(id).ok()?)?;
    let degrees = decimal.trunc();
    let minutes = (decimal - degrees) * 60.0;
    let seconds = (minutes - minutes.trunc()) * 60.0;
    Some(format!(
        "{}° {}' {:.2}\"",
        degrees as i64,
        minutes.trunc() as i64,
        seconds
    ))
}

fn altitude_ref(directory: &Directory, id: u16) -> Option<String> {
    let text = match directory.get_int(id).ok()? {
        0 => "Sea level",
        1 => "Below sea level",
        _ => return None,
    };
    Some(text.to_string())
}

fn altitude(directory: &Directory, id: u16) -> Option<String> {
    let value = finite(directory.get_double(id).ok()?)?;
    Some(format!("{} metres", value))
}

// =============================================================================
// Geo location
// =============================================================================

/// Signed decimal `(latitude, longitude)` of a GPS directory.
///
/// Southern latitudes and western longitudes are negative. `None` unless
/// both coordinates are present as three finite rationals.
pub fn geo_location(gps: &Directory) -> Option<(f64, f64)> {
    let latitude = dms_to_decimal(&gps.get_rational_array(GpsTag::Latitude.as_u16()).ok()?)?;
    let longitude = dms_to_decimal(&gps.get_rational_array(GpsTag::Longitude.as_u16()).ok()?)?;

    let latitude = match reference(gps, GpsTag::LatitudeRef).as_deref() {
        Some("S") => -latitude,
        _ => latitude,
    };
    let longitude = match reference(gps, GpsTag::LongitudeRef).as_deref() {
        Some("W") => -longitude,
        _ => longitude,
    };
    Some((latitude, longitude))
}

fn reference(gps: &Directory, tag: GpsTag) -> Option<String> {
    let text = gps.get_string(tag.as_u16())?;
    Some(text.trim().to_ascii_uppercase())
}

fn dms_to_decimal(parts: &[Rational]) -> Option<f64> {
    let [degrees, minutes, seconds] = parts else {
        return None;
    };
    if [degrees, minutes, seconds].iter().any(|r| r.denominator == 0) {
        return None;
    }
    finite(degrees.to_f64() + minutes.to_f64() / 60.0 + seconds.to_f64() / 3600.0)
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

// =============================================================================
// Tests
// =============================================================================
