//! Avro binary wire encoder.
//!
//! [`EncoderBuffer`] writes the primitive encodings of the Avro binary format
//! into a growable buffer:
//! - `int` / `long` as zig-zag variable-length integers
//! - `float` / `double` as little-endian IEEE-754
//! - `bytes` / `string` as a `long` length followed by the payload
//! - `fixed` as raw bytes with no prefix

use bytes::{BufMut, Bytes, BytesMut};

/// Maximum encoded size of a zig-zag `long`.
pub const MAX_VARINT_LEN: usize = 10;

/// Maps a signed integer onto an unsigned one so small magnitudes stay small.
#[inline]
#[must_use]
pub const fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Growable buffer that accumulates Avro binary output.
///
/// # Example
/// ```
/// use avrosynth_core::encoder::EncoderBuffer;
///
/// let mut encoder = EncoderBuffer::new();
/// encoder.write_long(-1);
/// encoder.write_string("hi");
/// assert_eq!(encoder.as_slice(), &[0x01, 0x04, b'h', b'i']);
/// ```
#[derive(Debug, Default)]
pub struct EncoderBuffer {
    buffer: BytesMut,
}

impl EncoderBuffer {
    /// Creates an empty encoder buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::new(),
        }
    }

    /// Creates an encoder buffer with room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    /// Returns the bytes written so far.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Returns the number of bytes written.
    #[must_use]
    pub fn bytes_written(&self) -> usize {
        self.buffer.len()
    }

    /// Discards everything written so far.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Consumes the encoder and returns the written bytes.
    #[must_use]
    pub fn freeze(self) -> Bytes {
        self.buffer.freeze()
    }

    /// Writes a boolean as a single byte.
    pub fn write_boolean(&mut self, value: bool) {
        self.buffer.put_u8(u8::from(value));
    }

    /// Writes an `int` as a zig-zag varint.
    pub fn write_int(&mut self, value: i32) {
        self.write_long(i64::from(value));
    }

    /// Writes a `long` as a zig-zag varint.
    pub fn write_long(&mut self, value: i64) {
        let mut n = zigzag_encode(value);
        while n >= 0x80 {
            self.buffer.put_u8((n as u8 & 0x7F) | 0x80);
            n >>= 7;
        }
        self.buffer.put_u8(n as u8);
    }

    /// Writes a `float` in little-endian.
    pub fn write_float(&mut self, value: f32) {
        self.buffer.put_f32_le(value);
    }

    /// Writes a `double` in little-endian.
    pub fn write_double(&mut self, value: f64) {
        self.buffer.put_f64_le(value);
    }

    /// Writes a length-prefixed byte sequence.
    pub fn write_bytes(&mut self, data: &[u8]) {
        self.write_length(data.len());
        self.buffer.put_slice(data);
    }

    /// Writes a length-prefixed UTF-8 string.
    pub fn write_string(&mut self, value: &str) {
        self.write_bytes(value.as_bytes());
    }

    /// Writes raw bytes with no length prefix (`fixed`).
    pub fn write_fixed(&mut self, data: &[u8]) {
        self.buffer.put_slice(data);
    }

    /// Writes a block count or byte length.
    pub fn write_length(&mut self, len: usize) {
        // Lengths above i64::MAX cannot be allocated in the first place.
        self.write_long(len as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zigzag_small_values() {
        assert_eq!(zigzag_encode(0), 0);
        assert_eq!(zigzag_encode(-1), 1);
        assert_eq!(zigzag_encode(1), 2);
        assert_eq!(zigzag_encode(-2), 3);
        assert_eq!(zigzag_encode(i64::MAX), u64::MAX - 1);
        assert_eq!(zigzag_encode(i64::MIN), u64::MAX);
    }

    #[test]
    fn test_write_long_multi_byte() {
        let mut encoder = EncoderBuffer::new();
        encoder.write_long(64);
        assert_eq!(encoder.as_slice(), &[0x80, 0x01]);

        encoder.clear();
        encoder.write_long(i64::MIN);
        assert_eq!(encoder.bytes_written(), MAX_VARINT_LEN);
    }

    #[test]
    fn test_write_boolean_and_int() {
        let mut encoder = EncoderBuffer::with_capacity(8);
        encoder.write_boolean(true);
        encoder.write_boolean(false);
        encoder.write_int(-3);
        assert_eq!(encoder.as_slice(), &[0x01, 0x00, 0x05]);
    }

    #[test]
    fn test_write_floats_little_endian() {
        let mut encoder = EncoderBuffer::new();
        encoder.write_float(1.0);
        encoder.write_double(1.0);
        assert_eq!(&encoder.as_slice()[..4], &1.0f32.to_le_bytes());
        assert_eq!(&encoder.as_slice()[4..], &1.0f64.to_le_bytes());
    }

    #[test]
    fn test_write_bytes_prefixed_fixed_raw() {
        let mut encoder = EncoderBuffer::new();
        encoder.write_bytes(&[]);
        encoder.write_bytes(&[0xAA, 0xBB]);
        encoder.write_fixed(&[0, 0, 0]);
        assert_eq!(encoder.as_slice(), &[0x00, 0x04, 0xAA, 0xBB, 0, 0, 0]);

        let frozen = encoder.freeze();
        assert_eq!(frozen.len(), 7);
    }
}
