//! Bounds-checked binary cursor over a byte slice.
//!
//! Every format in this workspace is little-endian and packed without
//! delimiters, so all decoders walk a [`BinaryReader`] forward through
//! fixed-width fields. A read past the end is always an error, never a
//! short value.

use zerocopy::FromBytes;

use crate::text::decode_text;
use crate::{Error, Result};

/// A cursor that reads little-endian values from a byte slice without copying.
///
/// # Example
///
/// ```
/// use lodestar_common::BinaryReader;
///
/// let data = [0x42, 0x49, 0x4E, 0x49, 0x01, 0x00, 0x00, 0x00];
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.read_bytes(4).unwrap(), b"BINI");
/// assert_eq!(reader.read_i32().unwrap(), 1);
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Create a new reader starting at `position`.
    ///
    /// Fails if `position` lies beyond the end of `data`.
    pub fn new_at(data: &'a [u8], position: usize) -> Result<Self> {
        let mut reader = Self::new(data);
        reader.seek(position)?;
        Ok(reader)
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the total length of the underlying buffer.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Seek to an absolute position. Seeking to the very end is allowed.
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.data.len() {
            return Err(Error::OffsetOutOfBounds {
                offset: position,
                size: self.data.len(),
            });
        }
        self.position = position;
        Ok(())
    }

    /// Skip `count` bytes.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.read_bytes(count).map(|_| ())
    }

    /// Borrow `len` bytes at an absolute `offset` without moving the cursor.
    pub fn slice_at(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        let end = offset.checked_add(len).ok_or(Error::OffsetOutOfBounds {
            offset,
            size: self.data.len(),
        })?;
        if end > self.data.len() {
            return Err(Error::UnexpectedEof {
                offset,
                needed: len,
                available: self.data.len().saturating_sub(offset),
            });
        }
        Ok(&self.data[offset..end])
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        self.slice_at(self.position, count)
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Read a fixed-size byte array.
    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_array::<1>().map(|b| b[0])
    }

    /// Read a little-endian u16.
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_array().map(u16::from_le_bytes)
    }

    /// Read a little-endian i16.
    #[inline]
    pub fn read_i16(&mut self) -> Result<i16> {
        self.read_array().map(i16::from_le_bytes)
    }

    /// Read a little-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    /// Read a little-endian i32.
    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_array().map(i32::from_le_bytes)
    }

    /// Read a little-endian f32.
    #[inline]
    pub fn read_f32(&mut self) -> Result<f32> {
        self.read_array().map(f32::from_le_bytes)
    }

    /// Read a string from a fixed-size buffer, stopping at the first NUL.
    pub fn read_string_in_buffer(&mut self, buffer_size: usize) -> Result<String> {
        let bytes = self.read_bytes(buffer_size)?;
        let end = memchr::memchr(0, bytes).unwrap_or(buffer_size);
        Ok(decode_text(&bytes[..end]))
    }

    /// Read a packed struct using zerocopy.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let offset = self.position;
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            offset,
            needed: size,
            available: bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_primitives() {
        let data = [
            0x01u8, 0x02, 0x03, 0x04, // u32: 0x04030201
            0xFF, 0xFF, // i16: -1
            0x00, 0x00, 0x80, 0x3F, // f32: 1.0
        ];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_u32().unwrap(), 0x04030201);
        assert_eq!(reader.read_i16().unwrap(), -1);
        assert_eq!(reader.read_f32().unwrap(), 1.0);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_eof_error_reports_offset() {
        let data = [0x01, 0x02, 0x03];
        let mut reader = BinaryReader::new(&data);
        reader.skip(2).unwrap();

        match reader.read_u32() {
            Err(Error::UnexpectedEof {
                offset,
                needed,
                available,
            }) => {
                assert_eq!((offset, needed, available), (2, 4, 1));
            }
            other => panic!("expected EOF, got {:?}", other),
        }
        // A failed read does not move the cursor.
        assert_eq!(reader.position(), 2);
    }

    #[test]
    fn test_seek_bounds() {
        let data = [0u8; 4];
        let mut reader = BinaryReader::new(&data);

        assert!(reader.seek(4).is_ok());
        assert!(reader.is_empty());
        assert!(matches!(
            reader.seek(5),
            Err(Error::OffsetOutOfBounds { offset: 5, size: 4 })
        ));
        assert!(BinaryReader::new_at(&data, 9).is_err());
    }

    #[test]
    fn test_slice_at_overflow() {
        let data = [0u8; 8];
        let reader = BinaryReader::new(&data);

        assert_eq!(reader.slice_at(2, 6).unwrap().len(), 6);
        assert!(reader.slice_at(2, 7).is_err());
        assert!(reader.slice_at(usize::MAX, 2).is_err());
    }

    #[test]
    fn test_read_string_in_buffer() {
        let mut data = [0u8; 16];
        data[..4].copy_from_slice(b"Root");
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_string_in_buffer(16).unwrap(), "Root");
        assert_eq!(reader.position(), 16);
    }
}
