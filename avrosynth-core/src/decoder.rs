//! Avro binary wire decoder.
//!
//! [`DecoderBuffer`] is the read-side counterpart of
//! [`EncoderBuffer`](crate::encoder::EncoderBuffer). Every read is bounds
//! checked and advances the cursor only on success.

use crate::encoder::MAX_VARINT_LEN;
use crate::error::{Error, Result};

/// Inverse of [`zigzag_encode`](crate::encoder::zigzag_encode).
#[inline]
#[must_use]
pub const fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Cursor over an encoded byte slice.
#[derive(Debug, Clone)]
pub struct DecoderBuffer<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> DecoderBuffer<'a> {
    /// Wraps a byte slice for decoding, starting at offset 0.
    #[must_use]
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Returns the current read position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns the number of unread bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    /// Returns true once every byte has been consumed.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::BufferTooShort {
                required: self.position + count,
                available: self.buffer.len(),
            });
        }
        let slice = &self.buffer[self.position..self.position + count];
        self.position += count;
        Ok(slice)
    }

    /// Reads a boolean byte.
    ///
    /// # Errors
    /// Returns an error if the buffer is exhausted or the byte is not 0 or 1.
    pub fn read_boolean(&mut self) -> Result<bool> {
        let offset = self.position;
        match self.take(1)?[0] {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(Error::InvalidBoolean { offset, value }),
        }
    }

    /// Reads a zig-zag varint `long`.
    ///
    /// # Errors
    /// Returns an error if the buffer ends mid-varint or the varint is longer
    /// than ten bytes.
    pub fn read_long(&mut self) -> Result<i64> {
        let start = self.position;
        let mut value: u64 = 0;
        let mut shift = 0;
        for _ in 0..MAX_VARINT_LEN {
            let byte = self.take(1)?[0];
            value |= u64::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(zigzag_decode(value));
            }
            shift += 7;
        }
        self.position = start;
        Err(Error::VarintOverflow { offset: start })
    }

    /// Reads a zig-zag varint `int`.
    ///
    /// # Errors
    /// Same as [`read_long`](Self::read_long), plus [`Error::IntOverflow`]
    /// for values outside the `i32` range.
    pub fn read_int(&mut self) -> Result<i32> {
        let offset = self.position;
        let value = self.read_long()?;
        i32::try_from(value).map_err(|_| {
            self.position = offset;
            Error::IntOverflow { value, offset }
        })
    }

    /// Reads a little-endian `float`.
    ///
    /// # Errors
    /// Returns an error if fewer than four bytes remain.
    pub fn read_float(&mut self) -> Result<f32> {
        let bytes = self.take(4)?;
        Ok(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads a little-endian `double`.
    ///
    /// # Errors
    /// Returns an error if fewer than eight bytes remain.
    pub fn read_double(&mut self) -> Result<f64> {
        let bytes = self.take(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(f64::from_le_bytes(raw))
    }

    /// Reads a non-negative length prefix.
    ///
    /// # Errors
    /// Returns an error for truncated or negative lengths.
    pub fn read_length(&mut self) -> Result<usize> {
        let offset = self.position;
        let length = self.read_long()?;
        usize::try_from(length).map_err(|_| Error::NegativeLength { length, offset })
    }

    /// Reads a length-prefixed byte sequence.
    ///
    /// # Errors
    /// Returns an error if the prefix or payload is truncated.
    pub fn read_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.read_length()?;
        self.take(len)
    }

    /// Reads a length-prefixed UTF-8 string.
    ///
    /// # Errors
    /// Returns an error if the payload is truncated or not valid UTF-8.
    pub fn read_string(&mut self) -> Result<&'a str> {
        let bytes = self.read_bytes()?;
        let offset = self.position - bytes.len();
        std::str::from_utf8(bytes).map_err(|_| Error::InvalidUtf8 { offset })
    }

    /// Reads `size` raw bytes (`fixed`).
    ///
    /// # Errors
    /// Returns an error if fewer than `size` bytes remain.
    pub fn read_fixed(&mut self, size: usize) -> Result<&'a [u8]> {
        self.take(size)
    }

    /// Reads the item count of the next array or map block.
    ///
    /// A negative count is followed by the block's byte size, which is read
    /// and discarded.
    ///
    /// # Errors
    /// Returns an error if the count or size is truncated.
    pub fn read_block_count(&mut self) -> Result<usize> {
        let offset = self.position;
        let count = self.read_long()?;
        if count < 0 {
            let _byte_size = self.read_long()?;
            return usize::try_from(count.unsigned_abs()).map_err(|_| Error::NegativeLength {
                length: count,
                offset,
            });
        }
        Ok(count as usize)
    }

    /// Reads an index and checks it against `len` entries.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfRange`] for indexes outside `0..len`.
    pub fn read_index(&mut self, kind: &'static str, len: usize) -> Result<usize> {
        let index = self.read_long()?;
        match usize::try_from(index) {
            Ok(i) if i < len => Ok(i),
            _ => Err(Error::IndexOutOfRange { kind, index, len }),
        }
    }
}
