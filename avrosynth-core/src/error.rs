//! Error types for avrosynth wire operations.

use thiserror::Error;

/// Core error type for binary encoding and decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Buffer is too short for the requested read.
    #[error("buffer too short: required {required} bytes, available {available} bytes")]
    BufferTooShort {
        /// Required buffer size in bytes.
        required: usize,
        /// Available buffer size in bytes.
        available: usize,
    },

    /// A variable-length integer ran past ten bytes.
    #[error("varint overflow at offset {offset}")]
    VarintOverflow {
        /// Byte offset where the varint started.
        offset: usize,
    },

    /// An `int` varint decoded to a value outside the `i32` range.
    #[error("int value {value} out of range at offset {offset}")]
    IntOverflow {
        /// Decoded value.
        value: i64,
        /// Byte offset of the varint.
        offset: usize,
    },

    /// A length prefix decoded to a negative number.
    #[error("negative length {length} at offset {offset}")]
    NegativeLength {
        /// Decoded length.
        length: i64,
        /// Byte offset of the length prefix.
        offset: usize,
    },

    /// Invalid UTF-8 encoding in a string value.
    #[error("invalid UTF-8 at offset {offset}")]
    InvalidUtf8 {
        /// Byte offset where the string payload started.
        offset: usize,
    },

    /// A boolean byte other than 0 or 1.
    #[error("invalid boolean byte {value:#04x} at offset {offset}")]
    InvalidBoolean {
        /// Byte offset of the boolean.
        offset: usize,
        /// Byte found.
        value: u8,
    },

    /// An enum symbol or union branch index outside the declared range.
    #[error("{kind} index {index} out of range (0..{len})")]
    IndexOutOfRange {
        /// What was being indexed (`enum`, `union`).
        kind: &'static str,
        /// Decoded index.
        index: i64,
        /// Number of valid entries.
        len: usize,
    },
}

/// Result type alias for avrosynth core operations.
pub type Result<T> = std::result::Result<T, Error>;
