//! Decoding of entry values into [`TagValue`]s.
//!
//! Counts of one decode to scalars, any other count to an array, except
//! for ASCII (a string read up to the first NUL) and UNDEFINED (raw bytes).

use crate::directory::{EncodedString, Encoding, Rational, TagArray, TagValue};
use crate::error::ReadError;
use crate::io::ByteReader;

use super::tags::FieldType;

/// Decode `count` components of `field_type` starting at absolute `position`.
///
/// The whole value range is bounds checked before anything is read.
pub fn decode_value(
    reader: &ByteReader,
    field_type: FieldType,
    count: u32,
    position: usize,
) -> Result<TagValue, ReadError> {
    let count = count as usize;
    let size = field_type.size_in_bytes();
    let byte_count = count.checked_mul(size).ok_or(ReadError::OutOfBounds {
        offset: position,
        len: usize::MAX,
        size: reader.len(),
    })?;
    if !reader.contains(position, byte_count) {
        return Err(ReadError::OutOfBounds {
            offset: position,
            len: byte_count,
            size: reader.len(),
        });
    }

    let value = match field_type {
        FieldType::Ascii => TagValue::String(EncodedString::new(
            reader.read_ascii(position, count)?,
            Encoding::Ascii,
        )),
        FieldType::Undefined => TagValue::Bytes(reader.read_bytes(position, count)?),
        FieldType::Byte => scalar_or_array(
            read_array(count, size, position, |p| reader.read_u8(p).map(u32::from))?,
            TagValue::Unsigned,
            TagArray::Unsigned,
        ),
        FieldType::Short => scalar_or_array(
            read_array(count, size, position, |p| reader.read_u16(p).map(u32::from))?,
            TagValue::Unsigned,
            TagArray::Unsigned,
        ),
        FieldType::Long => scalar_or_array(
            read_array(count, size, position, |p| reader.read_u32(p))?,
            TagValue::Unsigned,
            TagArray::Unsigned,
        ),
        FieldType::SByte => scalar_or_array(
            read_array(count, size, position, |p| reader.read_i8(p).map(i32::from))?,
            TagValue::Signed,
            TagArray::Signed,
        ),
        FieldType::SShort => scalar_or_array(
            read_array(count, size, position, |p| reader.read_i16(p).map(i32::from))?,
            TagValue::Signed,
            TagArray::Signed,
        ),
        FieldType::SLong => scalar_or_array(
            read_array(count, size, position, |p| reader.read_i32(p))?,
            TagValue::Signed,
            TagArray::Signed,
        ),
        FieldType::Rational => scalar_or_array(
            read_array(count, size, position, |p| {
                Ok(Rational::new(
                    reader.read_u32(p)? as i64,
                    reader.read_u32(p + 4)? as i64,
                ))
            })?,
            TagValue::Rational,
            TagArray::Rational,
        ),
        FieldType::SRational => scalar_or_array(
            read_array(count, size, position, |p| {
                Ok(Rational::new(
                    reader.read_i32(p)? as i64,
                    reader.read_i32(p + 4)? as i64,
                ))
            })?,
            TagValue::Rational,
            TagArray::Rational,
        ),
        FieldType::Float => scalar_or_array(
            read_array(count, size, position, |p| reader.read_f32(p))?,
            TagValue::Float,
            TagArray::Float,
        ),
        FieldType::Double => scalar_or_array(
            read_array(count, size, position, |p| reader.read_f64(p))?,
            TagValue::Double,
            TagArray::Double,
        ),
    };

    Ok(value)
}

fn read_array<T>(
    count: usize,
    size: usize,
    position: usize,
    read: impl Fn(usize) -> Result<T, ReadError>,
) -> Result<Vec<T>, ReadError> {
    (0..count).map(|i| read(position + i * size)).collect()
}

fn scalar_or_array<T: Copy>(
    values: Vec<T>,
    scalar: impl FnOnce(T) -> TagValue,
    array: impl FnOnce(Vec<T>) -> TagArray,
) -> TagValue {
    if values.len() == 1 {
        scalar(values[0])
    } else {
        TagValue::Array(array(values))
    }
}

// =============================================================================
// Tests
// =============================================================================
