use bytes::Bytes;

use crate::error::ReadError;
use crate::format::tiff::ByteOrder;

/// Endianness-aware reader over an in-memory buffer.
///
/// This is the trust boundary between arbitrary input bytes and the rest of
/// the decoder: every read checks `offset + size <= len` before touching the
/// buffer, and fails with [`ReadError::OutOfBounds`] otherwise. Cloning is
/// cheap since the buffer is reference counted.
#[derive(Debug, Clone)]
pub struct ByteReader {
    data: Bytes,
    byte_order: ByteOrder,
}

impl ByteReader {
    /// Create a reader over `data` using the given byte order.
    pub fn new(data: impl Into<Bytes>, byte_order: ByteOrder) -> Self {
        Self {
            data: data.into(),
            byte_order,
        }
    }

    /// Same buffer, different byte order.
    pub fn with_byte_order(&self, byte_order: ByteOrder) -> Self {
        Self {
            data: self.data.clone(),
            byte_order,
        }
    }

    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Total buffer length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether `len` bytes starting at `offset` lie inside the buffer.
    #[inline]
    pub fn contains(&self, offset: usize, len: usize) -> bool {
        offset
            .checked_add(len)
            .is_some_and(|end| end <= self.data.len())
    }

    fn slice(&self, offset: usize, len: usize) -> Result<&[u8], ReadError> {
        if !self.contains(offset, len) {
            return Err(ReadError::OutOfBounds {
                offset,
                len,
                size: self.data.len(),
            });
        }
        Ok(&self.data[offset..offset + len])
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, ReadError> {
        Ok(self.slice(offset, 1)?[0])
    }

    pub fn read_i8(&self, offset: usize) -> Result<i8, ReadError> {
        Ok(self.read_u8(offset)? as i8)
    }

    pub fn read_u16(&self, offset: usize) -> Result<u16, ReadError> {
        Ok(self.byte_order.read_u16(self.slice(offset, 2)?))
    }

    pub fn read_i16(&self, offset: usize) -> Result<i16, ReadError> {
        Ok(self.read_u16(offset)? as i16)
    }

    pub fn read_u32(&self, offset: usize) -> Result<u32, ReadError> {
        Ok(self.byte_order.read_u32(self.slice(offset, 4)?))
    }

    pub fn read_i32(&self, offset: usize) -> Result<i32, ReadError> {
        Ok(self.read_u32(offset)? as i32)
    }

    pub fn read_u64(&self, offset: usize) -> Result<u64, ReadError> {
        Ok(self.byte_order.read_u64(self.slice(offset, 8)?))
    }

    pub fn read_f32(&self, offset: usize) -> Result<f32, ReadError> {
        Ok(f32::from_bits(self.read_u32(offset)?))
    }

    pub fn read_f64(&self, offset: usize) -> Result<f64, ReadError> {
        Ok(f64::from_bits(self.read_u64(offset)?))
    }

    /// Read `count` raw bytes. The result shares the underlying buffer.
    pub fn read_bytes(&self, offset: usize, count: usize) -> Result<Bytes, ReadError> {
        self.slice(offset, count)?;
        Ok(self.data.slice(offset..offset + count))
    }

    /// Read up to `max_len` bytes, stopping early at the first NUL.
    ///
    /// A missing terminator is not an error: the read stops at `max_len` or
    /// at the end of the buffer, whichever comes first. The NUL itself is
    /// not included in the result.
    pub fn read_ascii(&self, offset: usize, max_len: usize) -> Result<Bytes, ReadError> {
        if offset > self.data.len() {
            return Err(ReadError::OutOfBounds {
                offset,
                len: max_len,
                size: self.data.len(),
            });
        }
        let available = max_len.min(self.data.len() - offset);
        let window = &self.data[offset..offset + available];
        let end = window.iter().position(|&b| b == 0).unwrap_or(available);
        Ok(self.data.slice(offset..offset + end))
    }
}
