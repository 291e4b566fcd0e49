//! Decoded tag values.
//!
//! A [`TagValue`] keeps the physical representation it was decoded with. The
//! `to_*` helpers perform the read-time coercions used by the store accessors
//! and return `None` when the stored kind cannot be represented as the
//! requested one; they never modify the value.

use std::fmt;

use bytes::Bytes;
use chrono::NaiveDateTime;

/// Layout used when rendering timestamps as strings.
pub const DATE_TIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

// =============================================================================
// Rational
// =============================================================================

/// An exact fraction. Holds both the unsigned and signed TIFF rationals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    pub numerator: i64,
    pub denominator: i64,
}

impl Rational {
    pub const fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub fn to_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Integer part, truncated toward zero. `None` for a zero denominator.
    pub fn truncate(self) -> Option<i64> {
        self.numerator.checked_div(self.denominator)
    }

    pub fn is_zero(self) -> bool {
        self.numerator == 0
    }

    /// Reduce by the greatest common divisor, keeping the sign on the numerator.
    pub fn simplified(self) -> Self {
        if self.denominator == 0 {
            return self;
        }
        let divisor = gcd(self.numerator.unsigned_abs(), self.denominator.unsigned_abs()) as i64;
        let sign = if self.denominator < 0 { -1 } else { 1 };
        Self {
            numerator: sign * self.numerator / divisor,
            denominator: sign * self.denominator / divisor,
        }
    }

    /// `"1/2"` for 10/20, `"2"` for 20/10, `"0"` for 0/n. A zero denominator
    /// is rendered unchanged.
    pub fn to_simple_string(self) -> String {
        if self.denominator == 0 {
            return self.to_string();
        }
        let reduced = self.simplified();
        if reduced.denominator == 1 {
            reduced.numerator.to_string()
        } else {
            reduced.to_string()
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a.max(1)
}

// =============================================================================
// EncodedString
// =============================================================================

/// Character encoding a string value was stored with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    Ascii,
    Utf8,
    Latin1,
}

/// Raw string bytes plus their source encoding.
///
/// The bytes are kept as stored so that callers can fall back to them (see
/// [`TagValue::to_i64`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedString {
    bytes: Bytes,
    encoding: Encoding,
}

impl EncodedString {
    pub fn new(bytes: impl Into<Bytes>, encoding: Encoding) -> Self {
        Self {
            bytes: bytes.into(),
            encoding,
        }
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Decode to a `String`, replacing invalid sequences.
    pub fn to_string_lossy(&self) -> String {
        match self.encoding {
            Encoding::Ascii | Encoding::Utf8 => String::from_utf8_lossy(&self.bytes).into_owned(),
            Encoding::Latin1 => self.bytes.iter().map(|&b| b as char).collect(),
        }
    }
}

impl fmt::Display for EncodedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

// =============================================================================
// TagArray
// =============================================================================

/// A homogeneous array of values.
#[derive(Debug, Clone, PartialEq)]
pub enum TagArray {
    Unsigned(Vec<u32>),
    Signed(Vec<i32>),
    Long(Vec<i64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    Rational(Vec<Rational>),
    String(Vec<EncodedString>),
}

impl TagArray {
    pub fn len(&self) -> usize {
        match self {
            TagArray::Unsigned(v) => v.len(),
            TagArray::Signed(v) => v.len(),
            TagArray::Long(v) => v.len(),
            TagArray::Float(v) => v.len(),
            TagArray::Double(v) => v.len(),
            TagArray::Rational(v) => v.len(),
            TagArray::String(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element `index` as a scalar value.
    pub fn get(&self, index: usize) -> Option<TagValue> {
        Some(match self {
            TagArray::Unsigned(v) => TagValue::Unsigned(*v.get(index)?),
            TagArray::Signed(v) => TagValue::Signed(*v.get(index)?),
            TagArray::Long(v) => TagValue::Long(*v.get(index)?),
            TagArray::Float(v) => TagValue::Float(*v.get(index)?),
            TagArray::Double(v) => TagValue::Double(*v.get(index)?),
            TagArray::Rational(v) => TagValue::Rational(*v.get(index)?),
            TagArray::String(v) => TagValue::String(v.get(index)?.clone()),
        })
    }

    /// The sole element of a one-element array.
    pub fn single(&self) -> Option<TagValue> {
        if self.len() == 1 {
            self.get(0)
        } else {
            None
        }
    }

    pub const fn kind_name(&self) -> &'static str {
        match self {
            TagArray::Unsigned(_) => "unsigned integer array",
            TagArray::Signed(_) => "signed integer array",
            TagArray::Long(_) => "long array",
            TagArray::Float(_) => "float array",
            TagArray::Double(_) => "double array",
            TagArray::Rational(_) => "rational array",
            TagArray::String(_) => "string array",
        }
    }
}

impl fmt::Display for TagArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", item)?;
            }
            Ok(())
        }

        match self {
            TagArray::Unsigned(v) => join(f, v),
            TagArray::Signed(v) => join(f, v),
            TagArray::Long(v) => join(f, v),
            TagArray::Float(v) => join(f, v),
            TagArray::Double(v) => join(f, v),
            TagArray::Rational(v) => join(f, v),
            TagArray::String(v) => join(f, v),
        }
    }
}

// =============================================================================
// TagValue
// =============================================================================

/// A decoded tag value in its stored representation.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Unsigned(u32),
    Signed(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Rational(Rational),
    String(EncodedString),
    Bytes(Bytes),
    Array(TagArray),
    Timestamp(NaiveDateTime),
}

impl TagValue {
    /// Name of the stored kind, used in coercion errors.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            TagValue::Unsigned(_) => "unsigned integer",
            TagValue::Signed(_) => "signed integer",
            TagValue::Long(_) => "long",
            TagValue::Float(_) => "float",
            TagValue::Double(_) => "double",
            TagValue::Rational(_) => "rational",
            TagValue::String(_) => "string",
            TagValue::Bytes(_) => "byte sequence",
            TagValue::Array(array) => array.kind_name(),
            TagValue::Timestamp(_) => "timestamp",
        }
    }

    /// Sole element of a one-element array or byte sequence.
    fn single(&self) -> Option<TagValue> {
        match self {
            TagValue::Array(array) => array.single(),
            TagValue::Bytes(b) if b.len() == 1 => Some(TagValue::Unsigned(b[0] as u32)),
            _ => None,
        }
    }

    /// Integer coercion.
    ///
    /// Integers as-is, rationals truncated toward zero, strings parsed as
    /// decimal or else folded big-endian from their raw bytes, one-element
    /// arrays via their element.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            TagValue::Unsigned(n) => Some(*n as i64),
            TagValue::Signed(n) => Some(*n as i64),
            TagValue::Long(n) => Some(*n),
            TagValue::Rational(r) => r.truncate(),
            TagValue::String(s) => Some(
                s.to_string_lossy()
                    .trim()
                    .parse::<i64>()
                    .unwrap_or_else(|_| fold_big_endian(s.bytes())),
            ),
            _ => self.single()?.to_i64(),
        }
    }

    pub fn to_f64(&self) -> Option<f64> {
        match self {
            TagValue::Unsigned(n) => Some(*n as f64),
            TagValue::Signed(n) => Some(*n as f64),
            TagValue::Long(n) => Some(*n as f64),
            TagValue::Float(n) => Some(*n as f64),
            TagValue::Double(n) => Some(*n),
            TagValue::Rational(r) if r.denominator != 0 => Some(r.to_f64()),
            TagValue::String(s) => s.to_string_lossy().trim().parse().ok(),
            _ => self.single()?.to_f64(),
        }
    }

    pub fn to_f32(&self) -> Option<f32> {
        match self {
            TagValue::Float(n) => Some(*n),
            _ => self.to_f64().map(|n| n as f32),
        }
    }

    pub fn to_bool(&self) -> Option<bool> {
        match self {
            TagValue::String(s) => {
                let text = s.to_string_lossy();
                let text = text.trim();
                if text.eq_ignore_ascii_case("true") {
                    Some(true)
                } else if text.eq_ignore_ascii_case("false") {
                    Some(false)
                } else {
                    text.parse::<i64>().ok().map(|n| n != 0)
                }
            }
            TagValue::Unsigned(_) | TagValue::Signed(_) | TagValue::Long(_) => {
                self.to_i64().map(|n| n != 0)
            }
            _ => self.single()?.to_bool(),
        }
    }

    pub fn to_rational(&self) -> Option<Rational> {
        match self {
            TagValue::Rational(r) => Some(*r),
            TagValue::Unsigned(_) | TagValue::Signed(_) | TagValue::Long(_) => {
                self.to_i64().map(|n| Rational::new(n, 1))
            }
            _ => self.single()?.to_rational(),
        }
    }

    pub fn to_i64_vec(&self) -> Option<Vec<i64>> {
        match self {
            TagValue::Unsigned(_) | TagValue::Signed(_) | TagValue::Long(_) => {
                self.to_i64().map(|n| vec![n])
            }
            TagValue::Bytes(b) => Some(b.iter().map(|&x| x as i64).collect()),
            TagValue::String(s) => Some(s.bytes().iter().map(|&x| x as i64).collect()),
            TagValue::Array(TagArray::Unsigned(v)) => Some(v.iter().map(|&x| x as i64).collect()),
            TagValue::Array(TagArray::Signed(v)) => Some(v.iter().map(|&x| x as i64).collect()),
            TagValue::Array(TagArray::Long(v)) => Some(v.clone()),
            TagValue::Array(TagArray::Rational(v)) => v.iter().map(|r| r.truncate()).collect(),
            _ => None,
        }
    }

    pub fn to_f64_vec(&self) -> Option<Vec<f64>> {
        match self {
            TagValue::Array(TagArray::Float(v)) => Some(v.iter().map(|&x| x as f64).collect()),
            TagValue::Array(TagArray::Double(v)) => Some(v.clone()),
            TagValue::Array(TagArray::Rational(v)) => Some(v.iter().map(|r| r.to_f64()).collect()),
            TagValue::Array(TagArray::String(_)) | TagValue::String(_) => None,
            TagValue::Array(_) | TagValue::Bytes(_) => self
                .to_i64_vec()
                .map(|v| v.into_iter().map(|x| x as f64).collect()),
            _ => self.to_f64().map(|n| vec![n]),
        }
    }

    pub fn to_rational_vec(&self) -> Option<Vec<Rational>> {
        match self {
            TagValue::Array(TagArray::Rational(v)) => Some(v.clone()),
            TagValue::Rational(r) => Some(vec![*r]),
            TagValue::Array(TagArray::Unsigned(_))
            | TagValue::Array(TagArray::Signed(_))
            | TagValue::Array(TagArray::Long(_)) => self
                .to_i64_vec()
                .map(|v| v.into_iter().map(|n| Rational::new(n, 1)).collect()),
            _ => None,
        }
    }

    pub fn to_bytes(&self) -> Option<Bytes> {
        match self {
            TagValue::Bytes(b) => Some(b.clone()),
            TagValue::String(s) => Some(s.bytes().clone()),
            TagValue::Array(TagArray::Unsigned(v)) => {
                Some(v.iter().map(|&x| x as u8).collect::<Vec<u8>>().into())
            }
            TagValue::Array(TagArray::Signed(v)) => {
                Some(v.iter().map(|&x| x as u8).collect::<Vec<u8>>().into())
            }
            _ => None,
        }
    }

    pub fn to_string_vec(&self) -> Option<Vec<String>> {
        match self {
            TagValue::String(s) => Some(vec![s.to_string_lossy()]),
            TagValue::Array(TagArray::String(v)) => {
                Some(v.iter().map(EncodedString::to_string_lossy).collect())
            }
            _ => None,
        }
    }
}

fn fold_big_endian(bytes: &[u8]) -> i64 {
    bytes
        .iter()
        .fold(0i64, |acc, &b| acc.wrapping_shl(8) | b as i64)
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Unsigned(n) => write!(f, "{}", n),
            TagValue::Signed(n) => write!(f, "{}", n),
            TagValue::Long(n) => write!(f, "{}", n),
            TagValue::Float(n) => write!(f, "{}", n),
            TagValue::Double(n) => write!(f, "{}", n),
            TagValue::Rational(r) => f.write_str(&r.to_simple_string()),
            TagValue::String(s) => write!(f, "{}", s),
            TagValue::Bytes(b) => {
                for (i, byte) in b.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", byte)?;
                }
                Ok(())
            }
            TagValue::Array(array) => write!(f, "{}", array),
            TagValue::Timestamp(t) => write!(f, "{}", t.format(DATE_TIME_FORMAT)),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for TagValue {
                fn from(value: $ty) -> Self {
                    TagValue::$variant(value.into())
                }
            }
        )*
    };
}

impl_from! {
    u8 => Unsigned,
    u16 => Unsigned,
    u32 => Unsigned,
    i8 => Signed,
    i16 => Signed,
    i32 => Signed,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    Rational => Rational,
    EncodedString => String,
    Bytes => Bytes,
    NaiveDateTime => Timestamp,
    TagArray => Array,
}

impl From<bool> for TagValue {
    fn from(value: bool) -> Self {
        TagValue::Unsigned(value as u32)
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::String(EncodedString::new(value.to_owned().into_bytes(), Encoding::Utf8))
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        TagValue::String(EncodedString::new(value.into_bytes(), Encoding::Utf8))
    }
}

impl From<Vec<u8>> for TagValue {
    fn from(value: Vec<u8>) -> Self {
        TagValue::Bytes(value.into())
    }
}

macro_rules! impl_from_vec {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Vec<$ty>> for TagValue {
                fn from(value: Vec<$ty>) -> Self {
                    TagValue::Array(TagArray::$variant(value))
                }
            }
        )*
    };
}

impl_from_vec! {
    u32 => Unsigned,
    i32 => Signed,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    Rational => Rational,
}

// =============================================================================
// Tests
// =============================================================================
