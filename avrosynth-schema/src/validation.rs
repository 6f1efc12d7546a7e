//! Datum conformance validation.
//!
//! [`validate`] is the structural predicate deciding whether a [`Value`]
//! conforms to a schema node, and the synthesizer's output is checked against
//! it. [`validate_exact`] additionally requires the value to survive a binary
//! round trip unchanged; the writer tries it first when picking a union
//! branch.

use crate::types::{PrimitiveKind, SchemaGraph, SchemaNode, SchemaRef};
use avrosynth_core::Value;

/// Smallest value of an `int`.
pub const INT_MIN_VALUE: i64 = i32::MIN as i64;
/// Largest value of an `int`.
pub const INT_MAX_VALUE: i64 = i32::MAX as i64;

/// Validates a value against a schema node.
///
/// # Arguments
/// * `graph` - Graph owning `schema`
/// * `schema` - Expected schema
/// * `value` - Datum to check
///
/// # Returns
/// true if `value` conforms to `schema`.
#[must_use]
pub fn validate(graph: &SchemaGraph, schema: SchemaRef, value: &Value) -> bool {
    conforms(graph, schema, value, false)
}

/// Like [`validate`], but every leaf must already have the variant the
/// reader produces for it: integers for `float`/`double` and strings for
/// `bytes`/`fixed` are refused, and a record may not carry keys it does
/// not declare.
///
/// A value accepted here decodes back to an equal value.
#[must_use]
pub fn validate_exact(graph: &SchemaGraph, schema: SchemaRef, value: &Value) -> bool {
    conforms(graph, schema, value, true)
}

fn conforms(graph: &SchemaGraph, schema: SchemaRef, value: &Value, exact: bool) -> bool {
    match graph.node(schema) {
        SchemaNode::Primitive(kind) => conforms_primitive(*kind, value, exact),
        SchemaNode::Fixed(fixed) => match value {
            Value::Bytes(bytes) => bytes.len() == fixed.size,
            Value::String(_) if !exact => value
                .as_byte_slice()
                .is_some_and(|bytes| bytes.len() == fixed.size),
            _ => false,
        },
        SchemaNode::Enum(enum_schema) => value
            .as_str()
            .is_some_and(|s| enum_schema.symbols.iter().any(|sym| sym == s)),
        SchemaNode::Array { items } => match value {
            Value::Array(elements) => elements.iter().all(|e| conforms(graph, *items, e, exact)),
            _ => false,
        },
        SchemaNode::Map { values } => match value {
            Value::Map(entries) => entries.values().all(|v| conforms(graph, *values, v, exact)),
            _ => false,
        },
        SchemaNode::Union { members } => members.iter().any(|&m| conforms(graph, m, value, exact)),
        SchemaNode::Record(record) => match value {
            Value::Map(entries) => {
                let declared = !exact
                    || entries
                        .keys()
                        .all(|key| record.fields.iter().any(|f| &f.name == key));
                declared
                    && record.fields.iter().all(|field| {
                        conforms(
                            graph,
                            field.schema,
                            entries.get(&field.name).unwrap_or(&Value::Null),
                            exact,
                        )
                    })
            }
            _ => false,
        },
    }
}

fn conforms_primitive(kind: PrimitiveKind, value: &Value, exact: bool) -> bool {
    match kind {
        PrimitiveKind::Null => value.is_null(),
        PrimitiveKind::Boolean => matches!(value, Value::Boolean(_)),
        PrimitiveKind::Int => value
            .as_long()
            .is_some_and(|v| (INT_MIN_VALUE..=INT_MAX_VALUE).contains(&v)),
        PrimitiveKind::Long => value.as_long().is_some(),
        PrimitiveKind::Float | PrimitiveKind::Double if exact => matches!(value, Value::Double(_)),
        PrimitiveKind::Float | PrimitiveKind::Double => value.as_f64().is_some(),
        PrimitiveKind::Bytes if exact => matches!(value, Value::Bytes(_)),
        PrimitiveKind::Bytes => value.as_byte_slice().is_some(),
        PrimitiveKind::String => matches!(value, Value::String(_)),
    }
}
