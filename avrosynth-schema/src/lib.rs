//! # avrosynth schema
//!
//! Avro schema model, parser and datum codec.
//!
//! This crate provides:
//! - JSON schema and protocol parsing into an arena-backed type graph
//! - Name resolution with namespace inheritance and forward/self references
//! - Schema serialization back to standalone JSON
//! - A structural conformance predicate
//! - Schema-driven binary datum writer and reader

pub mod canonical;
pub mod error;
pub mod parser;
pub mod protocol;
pub mod reader;
pub mod types;
pub mod validation;
pub mod writer;

pub use error::{AvroTypeError, DecodeError, SchemaParseError};
pub use parser::{parse_schema, parse_schema_value};
pub use protocol::{Protocol, Target, parse_protocol, parse_protocol_value};
pub use reader::DatumReader;
pub use types::{
    EnumSchema, Field, FixedSchema, Name, PrimitiveKind, RecordKind, RecordSchema, Schema,
    SchemaGraph, SchemaNode, SchemaRef, SortOrder,
};
pub use validation::{validate, validate_exact};
pub use writer::DatumWriter;
