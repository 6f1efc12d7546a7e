//! Prelude module for convenient imports.
//!
//! ```
//! use avrosynth::prelude::*;
//! ```

// Core types
pub use avrosynth_core::{DecoderBuffer, EncoderBuffer, Value};

// Schema types
pub use avrosynth_schema::{
    AvroTypeError, DatumReader, DatumWriter, Protocol, Schema, SchemaGraph, SchemaNode,
    SchemaParseError, SchemaRef, Target, parse_protocol, parse_schema, validate,
};

// Synthesis types
pub use avrosynth_synth::{
    CycleCut, SynthConfig, SynthError, Synthesis, Synthesizer, UnionPolicy, ValueProvider, verify,
};

// Pipeline types
pub use crate::collab::{FileSource, IdlCompiler, NoIdlCompiler, SchemaSource};
pub use crate::error::{CollaboratorError, PipelineError};
pub use crate::pipeline::{
    Artifact, InputKind, Pipeline, Report, TargetOutcome, generate_from_protocol,
    generate_from_schema,
};
