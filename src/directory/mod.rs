//! Typed tag value stores.
//!
//! Each decoded IFD becomes one [`Directory`] of a given [`DirectoryKind`].
//! Values keep the representation they were decoded with ([`TagValue`]);
//! the `get_*` accessors coerce on read.

mod kind;
mod store;
mod tag;
mod value;

pub use kind::{new_store, DirectoryKind};
pub use store::{Directory, ValueSink, DATE_FORMATS};
pub use tag::Tag;
pub use value::{EncodedString, Encoding, Rational, TagArray, TagValue, DATE_TIME_FORMAT};
