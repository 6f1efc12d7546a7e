//! Avro protocol documents.
//!
//! A protocol is a JSON object with an optional `protocol` name, an optional
//! `namespace` and a `types` list. The types are parsed in order into one
//! shared [`SchemaGraph`], so later types can refer to earlier ones by name.
//! `messages` are not modelled.

use crate::error::SchemaParseError;
use crate::types::{SchemaGraph, SchemaNode, SchemaRef};
use serde_json::Value;

/// A parsed protocol document.
#[derive(Debug, Clone)]
pub struct Protocol {
    /// Protocol name, if the document declares one.
    pub name: Option<String>,
    /// Protocol namespace; inherited by unqualified type names.
    pub namespace: Option<String>,
    graph: SchemaGraph,
    types: Vec<SchemaRef>,
}

/// A protocol record selected for example generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Record node in the protocol graph.
    pub schema: SchemaRef,
    /// Simple record name.
    pub name: String,
    /// Record namespace, falling back to the protocol namespace.
    pub namespace: Option<String>,
    /// Rendered `version` property.
    pub version: String,
    /// `topic` property, when present.
    pub topic: Option<String>,
}

impl Target {
    /// Namespace-qualified record name.
    #[must_use]
    pub fn fullname(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}.{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Base file name for artifacts of this target.
    #[must_use]
    pub fn file_stem(&self) -> String {
        self.fullname()
    }
}

impl Protocol {
    /// Returns the shared graph of all protocol types.
    #[must_use]
    pub fn graph(&self) -> &SchemaGraph {
        &self.graph
    }

    /// Returns the declared types in document order.
    #[must_use]
    pub fn types(&self) -> &[SchemaRef] {
        &self.types
    }

    /// Records carrying a non-null `version` property, in document order.
    ///
    /// A `version` of `false` is treated as absent.
    #[must_use]
    pub fn targets(&self) -> Vec<Target> {
        self.types
            .iter()
            .filter_map(|&schema| {
                let SchemaNode::Record(record) = self.graph.node(schema) else {
                    return None;
                };
                let version = match record.property("version")? {
                    Value::Null | Value::Bool(false) => return None,
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                let topic = record.property("topic").and_then(|t| match t {
                    Value::String(s) => Some(s.clone()),
                    Value::Null => None,
                    other => Some(other.to_string()),
                });
                Some(Target {
                    schema,
                    name: record.name.name.clone(),
                    namespace: record
                        .name
                        .namespace
                        .clone()
                        .or_else(|| self.namespace.clone()),
                    version,
                    topic,
                })
            })
            .collect()
    }
}

/// Parses a protocol document from JSON text.
///
/// # Errors
/// Returns `SchemaParseError` if the text is not JSON, is not a protocol
/// object, or any declared type is invalid.
pub fn parse_protocol(text: &str) -> Result<Protocol, SchemaParseError> {
    let json: Value = serde_json::from_str(text)?;
    parse_protocol_value(&json)
}

/// Parses a protocol document from an already deserialized JSON tree.
///
/// # Errors
/// Returns `SchemaParseError` if the tree is not a valid protocol.
pub fn parse_protocol_value(json: &Value) -> Result<Protocol, SchemaParseError> {
    let Value::Object(obj) = json else {
        return Err(SchemaParseError::invalid_attr("protocol", "document", json));
    };

    let name = match obj.get("protocol") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => return Err(SchemaParseError::invalid_attr("protocol", "protocol", other)),
    };
    let namespace = match obj.get("namespace") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => return Err(SchemaParseError::invalid_attr("protocol", "namespace", other)),
    };
    let declared: &[Value] = match obj.get("types") {
        None | Some(Value::Null) => &[],
        Some(Value::Array(types)) => types,
        Some(other) => return Err(SchemaParseError::invalid_attr("protocol", "types", other)),
    };

    let mut graph = SchemaGraph::new();
    let types = declared
        .iter()
        .map(|t| graph.parse_into(t, namespace.as_deref()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Protocol {
        name,
        namespace,
        graph,
        types,
    })
}
