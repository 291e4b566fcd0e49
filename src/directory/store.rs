//! The tag value store.
//!
//! A [`Directory`] accumulates the values decoded from one IFD. Values are
//! stored as decoded; the typed accessors coerce at read time and report the
//! stored kind when they cannot.

use bytes::Bytes;
use chrono::NaiveDateTime;
use indexmap::IndexMap;

use crate::error::TagError;

use super::kind::DirectoryKind;
use super::tag::Tag;
use super::value::{Rational, TagValue};

/// Date layouts tried, in order, when a string is read as a date.
pub const DATE_FORMATS: [&str; 4] = [
    "%Y:%m:%d %H:%M:%S",
    "%Y:%m:%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

// =============================================================================
// ValueSink
// =============================================================================

/// Write side of a tag store, as used by the decoder.
pub trait ValueSink {
    /// Insert or overwrite a value.
    fn set_value(&mut self, tag: u16, value: TagValue) -> Result<(), TagError>;

    /// Record a decode problem that is not tied to a stored value.
    fn record_error(&mut self, message: String);
}

// =============================================================================
// Directory
// =============================================================================

/// Decoded tags of a single directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Directory {
    kind: DirectoryKind,
    /// Keyed by tag id, in first-insertion order
    values: IndexMap<u16, TagValue>,
    errors: Vec<String>,
}

impl Directory {
    pub fn new(kind: DirectoryKind) -> Self {
        Self {
            kind,
            values: IndexMap::new(),
            errors: Vec::new(),
        }
    }

    /// An error-only pseudo-directory holding `message`.
    pub fn error(message: impl Into<String>) -> Self {
        let mut directory = Self::new(DirectoryKind::Error);
        directory.errors.push(message.into());
        directory
    }

    #[inline]
    pub fn kind(&self) -> DirectoryKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Number of distinct tags.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, tag: u16) -> bool {
        self.values.contains_key(&tag)
    }

    /// Insert or overwrite a value. Iteration order is fixed by the first insertion.
    pub fn set(&mut self, tag: u16, value: impl Into<TagValue>) -> Result<(), TagError> {
        if !self.kind.accepts_tags() {
            return Err(TagError::InvalidValue {
                tag,
                reason: "error directories accept no tags",
            });
        }
        self.values.insert(tag, value.into());
        Ok(())
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Tag ids in first-insertion order.
    pub fn tag_ids(&self) -> impl Iterator<Item = u16> + '_ {
        self.values.keys().copied()
    }

    /// Tag handles in first-insertion order.
    pub fn tags(&self) -> impl Iterator<Item = Tag<'_>> + '_ {
        self.values.keys().map(move |&id| Tag::new(id, self))
    }

    /// The stored value, without coercion.
    pub fn get(&self, tag: u16) -> Option<&TagValue> {
        self.values.get(&tag)
    }

    fn require(&self, tag: u16) -> Result<&TagValue, TagError> {
        self.get(tag).ok_or(TagError::MissingTag(tag))
    }

    fn coerce<T>(
        &self,
        tag: u16,
        expected: &'static str,
        convert: impl FnOnce(&TagValue) -> Option<T>,
    ) -> Result<T, TagError> {
        let value = self.require(tag)?;
        convert(value).ok_or(TagError::Coercion {
            tag,
            expected,
            actual: value.kind_name(),
        })
    }

    // -------------------------------------------------------------------------
    // Typed accessors
    // -------------------------------------------------------------------------

    /// Integer view of the tag. See [`TagValue::to_i64`] for the rules.
    pub fn get_int(&self, tag: u16) -> Result<i64, TagError> {
        self.coerce(tag, "integer", TagValue::to_i64)
    }

    pub fn get_float(&self, tag: u16) -> Result<f32, TagError> {
        self.coerce(tag, "float", TagValue::to_f32)
    }

    pub fn get_double(&self, tag: u16) -> Result<f64, TagError> {
        self.coerce(tag, "double", TagValue::to_f64)
    }

    pub fn get_bool(&self, tag: u16) -> Result<bool, TagError> {
        self.coerce(tag, "boolean", TagValue::to_bool)
    }

    pub fn get_rational(&self, tag: u16) -> Result<Rational, TagError> {
        self.coerce(tag, "rational", TagValue::to_rational)
    }

    pub fn get_int_array(&self, tag: u16) -> Result<Vec<i64>, TagError> {
        self.coerce(tag, "integer array", TagValue::to_i64_vec)
    }

    pub fn get_double_array(&self, tag: u16) -> Result<Vec<f64>, TagError> {
        self.coerce(tag, "double array", TagValue::to_f64_vec)
    }

    pub fn get_rational_array(&self, tag: u16) -> Result<Vec<Rational>, TagError> {
        self.coerce(tag, "rational array", TagValue::to_rational_vec)
    }

    pub fn get_bytes(&self, tag: u16) -> Result<Bytes, TagError> {
        self.coerce(tag, "byte sequence", TagValue::to_bytes)
    }

    pub fn get_string_array(&self, tag: u16) -> Result<Vec<String>, TagError> {
        self.coerce(tag, "string array", TagValue::to_string_vec)
    }

    /// String form of the tag, `None` only when the tag is absent.
    pub fn get_string(&self, tag: u16) -> Option<String> {
        self.get(tag).map(TagValue::to_string)
    }

    /// Timestamp view of the tag.
    ///
    /// Strings are matched against [`DATE_FORMATS`] in order; the first
    /// layout that parses wins.
    pub fn get_date(&self, tag: u16) -> Result<NaiveDateTime, TagError> {
        match self.require(tag)? {
            TagValue::Timestamp(t) => Ok(*t),
            TagValue::String(s) => {
                let text = s.to_string_lossy();
                let text = text.trim_end_matches('\0').trim();
                DATE_FORMATS
                    .iter()
                    .find_map(|layout| NaiveDateTime::parse_from_str(text, layout).ok())
                    .ok_or_else(|| TagError::InvalidDate {
                        tag,
                        value: text.to_owned(),
                    })
            }
            other => Err(TagError::Coercion {
                tag,
                expected: "date",
                actual: other.kind_name(),
            }),
        }
    }
}

impl ValueSink for Directory {
    fn set_value(&mut self, tag: u16, value: TagValue) -> Result<(), TagError> {
        self.set(tag, value)
    }

    fn record_error(&mut self, message: String) {
        Directory::record_error(self, message);
    }
}

// =============================================================================
// Tests
// =============================================================================
