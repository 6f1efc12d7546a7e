//! Error types for example synthesis.

use avrosynth_schema::{AvroTypeError, DecodeError, SchemaParseError};
use thiserror::Error;

/// Error type for synthesis and verification.
///
/// Everything except [`SynthError::Parse`] and [`SynthError::Config`] is
/// scoped to a single target.
#[derive(Debug, Error)]
pub enum SynthError {
    /// Schema text could not be parsed.
    #[error("schema parse error: {0}")]
    Parse(#[from] SchemaParseError),

    /// The synthesized value does not conform to its schema.
    #[error(transparent)]
    Type(#[from] AvroTypeError),

    /// The encoded value could not be read back.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Re-encoding the decoded value produced different bytes.
    #[error("binary round trip changed the encoding ({original} vs {reencoded} bytes)")]
    RoundTrip {
        /// Length of the first encoding.
        original: usize,
        /// Length of the second encoding.
        reencoded: usize,
    },

    /// The value read back is not the value that was written.
    #[error("binary round trip changed the value: wrote {written}, read {read}")]
    Lossy {
        /// Value that was encoded.
        written: String,
        /// Value decoded from the encoding.
        read: String,
    },

    /// An enum without symbols has no value to pick.
    #[error("enum {fullname} has no symbols")]
    EmptyEnum {
        /// Enum fullname.
        fullname: String,
    },

    /// A union without members has no branch to expand.
    #[error("cannot synthesize a value for an empty union")]
    EmptyUnion,

    /// Unrecognized union policy name.
    #[error("unknown union policy {value:?}, expected \"last-non-null\" or \"first\"")]
    UnknownUnionPolicy {
        /// Offending name.
        value: String,
    },

    /// The `string` placeholder is empty.
    #[error("string placeholder must not be empty")]
    EmptyPlaceholder,

    /// Configuration document could not be read.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl SynthError {
    /// Creates an empty enum error.
    pub fn empty_enum(fullname: impl Into<String>) -> Self {
        Self::EmptyEnum {
            fullname: fullname.into(),
        }
    }
}
