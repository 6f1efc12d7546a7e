//! # avrosynth synth
//!
//! Example-instance synthesis for Avro schemas.
//!
//! This crate provides:
//! - [`Synthesizer`], a deterministic recursive walk producing one conforming
//!   instance per schema, with cycle cuts for recursive records
//! - [`SynthConfig`] and [`UnionPolicy`] to tune the output
//! - [`verify`], which proves an instance conforms by encoding it and reading
//!   it back

pub mod config;
pub mod error;
pub mod provider;
pub mod synthesizer;

pub use config::{SynthConfig, UnionPolicy};
pub use error::SynthError;
pub use provider::{CanonicalValues, ValueProvider};
pub use synthesizer::{CycleCut, Synthesis, Synthesizer};

use avrosynth_core::Value;
use avrosynth_schema::{DatumReader, DatumWriter, SchemaGraph, SchemaRef, parse_schema};
use bytes::Bytes;

/// Synthesizes one instance of `schema` with the canonical value provider.
///
/// # Errors
/// Returns `SynthError` if a reachable type has no possible value.
pub fn synthesize(
    graph: &SchemaGraph,
    schema: SchemaRef,
    config: &SynthConfig,
) -> Result<Synthesis, SynthError> {
    Synthesizer::new(graph, config.clone()).synthesize(schema)
}

/// Checks that `value` conforms to `schema` and survives a binary round trip.
///
/// # Arguments
/// * `graph` - Graph owning `schema`
/// * `schema` - Schema the value claims to conform to
/// * `value` - Instance to check
///
/// # Returns
/// The Avro binary encoding of `value`.
///
/// # Errors
/// Returns [`SynthError::Type`] if the value does not conform,
/// [`SynthError::Lossy`] if it reads back as a different datum (an integer
/// written as a float, say), or a decode or round-trip error if the encoding
/// cannot be read back unchanged.
pub fn verify(graph: &SchemaGraph, schema: SchemaRef, value: &Value) -> Result<Bytes, SynthError> {
    let writer = DatumWriter::new(graph, schema);
    let encoded = writer.encode(value)?;
    let decoded = DatumReader::new(graph, schema).decode(&encoded)?;
    if !decoded.same_datum(value) {
        return Err(SynthError::Lossy {
            written: value.to_string(),
            read: decoded.to_string(),
        });
    }
    let reencoded = writer.encode(&decoded)?;
    if reencoded != encoded {
        return Err(SynthError::RoundTrip {
            original: encoded.len(),
            reencoded: reencoded.len(),
        });
    }
    Ok(encoded)
}

/// Parses a schema, synthesizes an instance and verifies it.
///
/// # Errors
/// Returns `SynthError` if any of the three steps fails.
pub fn synthesize_from_json(text: &str, config: &SynthConfig) -> Result<Value, SynthError> {
    let schema = parse_schema(text)?;
    let synthesis = synthesize(schema.graph(), schema.root(), config)?;
    verify(schema.graph(), schema.root(), &synthesis.value)?;
    Ok(synthesis.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_synthesize_from_json() {
        let value = synthesize_from_json(
            r#"{"type":"record","name":"User","fields":[
                {"name":"id","type":"long"},
                {"name":"emails","type":{"type":"array","items":"string"}},
                {"name":"avatar","type":["null","bytes"]}
            ]}"#,
            &SynthConfig::default(),
        )
        .expect("Failed to synthesize");
        assert_eq!(
            value.to_json(),
            json!({"id": 0, "emails": ["string"], "avatar": ""})
        );
    }

    #[test]
    fn test_verify_rejects_non_conforming_value() {
        let schema = parse_schema(r#"{"type":"record","name":"Loop","fields":[{"name":"again","type":"Loop"}]}"#)
            .expect("Failed to parse schema");
        let synthesis = synthesize(schema.graph(), schema.root(), &SynthConfig::default())
            .expect("Failed to synthesize");
        let err = verify(schema.graph(), schema.root(), &synthesis.value)
            .expect_err("fullname placeholder is not a record");
        match err {
            SynthError::Type(type_error) => {
                assert_eq!(type_error.expected, "Loop");
                assert_eq!(type_error.datum, r#""Loop""#);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_verify_returns_encoding() {
        let schema = parse_schema(r#"{"type":"map","values":"int"}"#).expect("parse");
        let value = Value::from_json(&json!({"key": 0}));
        let encoded = verify(schema.graph(), schema.root(), &value).expect("verify");
        assert_eq!(encoded.as_ref(), &[2, 6, b'k', b'e', b'y', 0, 0]);
    }

    #[test]
    fn test_verify_keeps_union_branch_types() {
        for text in [r#"["null","float","int"]"#, r#"["null","bytes","string"]"#] {
            let schema = parse_schema(text).expect("parse");
            let synthesis =
                synthesize(schema.graph(), schema.root(), &SynthConfig::default()).expect("synthesize");
            let encoded = verify(schema.graph(), schema.root(), &synthesis.value).expect("verify");
            let decoded = DatumReader::new(schema.graph(), schema.root())
                .decode(&encoded)
                .expect("decode");
            assert_eq!(decoded, synthesis.value, "{text}");
        }
    }

    #[test]
    fn test_verify_rejects_lossy_values() {
        let schema = parse_schema(r#"["null","float"]"#).expect("parse");
        let err = verify(schema.graph(), schema.root(), &Value::Long(1))
            .expect_err("integer reads back as a float");
        assert!(matches!(err, SynthError::Lossy { .. }), "{err}");

        let schema = parse_schema(r#""float""#).expect("parse");
        assert!(matches!(
            verify(schema.graph(), schema.root(), &Value::Double(0.1)),
            Err(SynthError::Lossy { .. })
        ));
        assert!(verify(schema.graph(), schema.root(), &Value::Double(0.5)).is_ok());
    }

    #[test]
    fn test_verify_accepts_latin1_bytes() {
        let schema = parse_schema(r#"{"type":"fixed","name":"Pair","size":2}"#).expect("parse");
        assert!(verify(schema.graph(), schema.root(), &Value::from("\u{0}\u{ff}")).is_ok());
    }

    #[test]
    fn test_parse_error_propagates() {
        assert!(matches!(
            synthesize_from_json(r#"{"type":"enum","name":"Color","symbols":["RED","RED"]}"#, &SynthConfig::default()),
            Err(SynthError::Parse(_))
        ));
    }
}
