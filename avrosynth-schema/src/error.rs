//! Error types for schema parsing and datum conformance.

use thiserror::Error;

/// Error type for schema parsing operations.
///
/// Any error aborts the whole parse; there is no partial result.
#[derive(Debug, Error)]
pub enum SchemaParseError {
    /// Schema text is not valid JSON.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Object schema without a `type` attribute.
    #[error("no \"type\" property: {fragment}")]
    MissingType {
        /// Offending JSON fragment.
        fragment: String,
    },

    /// `type` names something that is not a schema type.
    #[error("undefined type: {value}")]
    UnknownType {
        /// Offending type value.
        value: String,
    },

    /// A string that is neither a primitive nor a registered name.
    #[error("{name:?} is not a schema we know about")]
    UnresolvedName {
        /// Unresolved name as written.
        name: String,
    },

    /// Missing required attribute.
    #[error("missing required attribute '{attribute}' on {element}")]
    MissingAttribute {
        /// Schema kind or element.
        element: String,
        /// Attribute name.
        attribute: String,
    },

    /// Invalid attribute value.
    #[error("invalid value {value} for attribute '{attribute}' on {element}")]
    InvalidAttribute {
        /// Schema kind or element.
        element: String,
        /// Attribute name.
        attribute: String,
        /// Offending value.
        value: String,
    },

    /// Name or namespace component that is not a valid identifier.
    #[error("invalid name {name:?}")]
    InvalidName {
        /// Offending name.
        name: String,
    },

    /// Fullname collides with a type keyword.
    #[error("{fullname} is a reserved type name")]
    ReservedName {
        /// Offending fullname.
        fullname: String,
    },

    /// Fullname registered twice.
    #[error("the name \"{fullname}\" is already in use")]
    DuplicateName {
        /// Offending fullname.
        fullname: String,
    },

    /// Field name repeated within one record.
    #[error("field name {field:?} is already in use in record {record}")]
    DuplicateField {
        /// Record fullname.
        record: String,
        /// Repeated field name.
        field: String,
    },

    /// Symbol repeated within one enum.
    #[error("duplicate symbol {symbol:?} in enum {enum_name}")]
    DuplicateSymbol {
        /// Enum fullname.
        enum_name: String,
        /// Repeated symbol.
        symbol: String,
    },

    /// A union directly containing another union.
    #[error("unions cannot contain other unions: {fragment}")]
    NestedUnion {
        /// Offending union member.
        fragment: String,
    },

    /// Two union members of the same type.
    #[error("{type_name} is already in union")]
    DuplicateUnionMember {
        /// Type tag or fullname of the repeated member.
        type_name: String,
    },
}

impl SchemaParseError {
    /// Creates a missing attribute error.
    pub fn missing_attr(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an invalid attribute error, rendering the value as JSON.
    pub fn invalid_attr(
        element: impl Into<String>,
        attribute: impl Into<String>,
        value: &serde_json::Value,
    ) -> Self {
        Self::InvalidAttribute {
            element: element.into(),
            attribute: attribute.into(),
            value: value.to_string(),
        }
    }

    /// Creates a duplicate field error.
    pub fn duplicate_field(record: impl Into<String>, field: impl Into<String>) -> Self {
        Self::DuplicateField {
            record: record.into(),
            field: field.into(),
        }
    }
}

/// A datum does not conform to the schema it is being written with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a {expected}: {datum}")]
pub struct AvroTypeError {
    /// Canonical JSON of the expected schema.
    pub expected: String,
    /// Compact JSON of the offending datum.
    pub datum: String,
}

impl AvroTypeError {
    /// Creates a type error from already rendered parts.
    pub fn new(expected: impl Into<String>, datum: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            datum: datum.into(),
        }
    }
}

/// Error type for decoding a datum under a schema.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Wire-level failure.
    #[error("wire error: {0}")]
    Wire(#[from] avrosynth_core::Error),

    /// Bytes left over after the datum was read.
    #[error("{remaining} trailing bytes after datum")]
    TrailingBytes {
        /// Number of unread bytes.
        remaining: usize,
    },

    /// A block count larger than the input can hold.
    #[error("block of {count} items exceeds the {limit} the input allows")]
    BlockTooLarge {
        /// Decoded item count.
        count: usize,
        /// Largest count accepted at that point.
        limit: usize,
    },

    /// Nesting deeper than the reader allows.
    #[error("datum nesting exceeds {limit} levels")]
    DepthExceeded {
        /// Configured limit.
        limit: usize,
    },
}
