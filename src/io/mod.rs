//! In-memory byte access for the decoder.

mod byte_reader;

pub use byte_reader::ByteReader;
