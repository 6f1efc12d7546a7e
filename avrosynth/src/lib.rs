//! # avrosynth
//!
//! Example-instance synthesis for Avro schemas and protocols.
//!
//! avrosynth parses Avro JSON schemas and protocol documents into a type
//! graph, synthesizes one deterministic example instance per target, and
//! proves each instance conforms by encoding it in the Avro binary format and
//! reading it back.
//!
//! ## Features
//!
//! - **Full name resolution** - Namespaces, dotted names, forward and self references
//! - **Cycle-safe synthesis** - Recursive records are cut at their own ancestry
//! - **Configurable unions** - Last non-null member or first member
//! - **Binary verification** - Every artifact is encoded and decoded before it is emitted
//!
//! ## Quick Start
//!
//! ```
//! use avrosynth::prelude::*;
//!
//! let schema = parse_schema(
//!     r#"{"type":"record","name":"Node","fields":[{"name":"next","type":["null","Node"]}]}"#,
//! )?;
//! let synthesis = Synthesizer::new(schema.graph(), SynthConfig::default())
//!     .synthesize(schema.root())?;
//! assert_eq!(synthesis.value.to_string(), r#"{"next":null}"#);
//! verify(schema.graph(), schema.root(), &synthesis.value)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Value model and Avro binary primitives
//! - [`schema`] - Schema model, parser, validator and datum codec
//! - [`synth`] - Synthesizer and its configuration
//! - [`collab`] - Schema retrieval and IDL compilation boundaries
//! - [`pipeline`] - End-to-end generation of (schema, example) artifacts

pub mod collab;
pub mod error;
pub mod pipeline;
pub mod prelude;

/// Value model and wire primitives.
pub mod core {
    pub use avrosynth_core::*;
}

/// Schema model, parsing and datum codec.
pub mod schema {
    pub use avrosynth_schema::*;
}

/// Example synthesis.
pub mod synth {
    pub use avrosynth_synth::*;
}

pub use collab::{FileSource, IdlCompiler, NoIdlCompiler, SchemaSource};
pub use error::{CollaboratorError, PipelineError};
pub use pipeline::{
    Artifact, InputKind, Pipeline, Report, TargetOutcome, generate_from_protocol,
    generate_from_schema,
};
