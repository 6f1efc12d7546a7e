//! Avro JSON schema parser.
//!
//! This module turns a JSON schema document into a [`SchemaGraph`]. Named
//! types are registered before their children are parsed, which is what lets
//! a record field refer to its own enclosing record.

use crate::error::SchemaParseError;
use crate::types::{
    EnumSchema, Field, FixedSchema, Name, PrimitiveKind, RecordKind, RecordSchema, Schema,
    SchemaGraph, SchemaNode, SchemaRef, SortOrder,
};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Record attributes that are part of the model rather than properties.
const RECORD_KEYWORDS: &[&str] = &["type", "name", "namespace", "fields"];

/// Parses an Avro schema from JSON text.
///
/// # Arguments
/// * `text` - Schema document
///
/// # Returns
/// Parsed schema or parse error.
///
/// # Errors
/// Returns `SchemaParseError` if the text is not JSON or describes an invalid
/// schema.
pub fn parse_schema(text: &str) -> Result<Schema, SchemaParseError> {
    let json: Value = serde_json::from_str(text)?;
    parse_schema_value(&json)
}

/// Parses an Avro schema from an already deserialized JSON tree.
///
/// # Errors
/// Returns `SchemaParseError` if the tree describes an invalid schema.
pub fn parse_schema_value(json: &Value) -> Result<Schema, SchemaParseError> {
    let mut graph = SchemaGraph::new();
    let root = graph.parse_into(json, None)?;
    Ok(Schema::new(graph, root))
}

impl SchemaGraph {
    /// Parses one schema into this graph.
    ///
    /// Names already registered in the graph can be referenced, and named
    /// types declared by `json` are added to the registry.
    ///
    /// # Arguments
    /// * `json` - Schema tree
    /// * `namespace` - Enclosing namespace for unqualified names
    ///
    /// # Errors
    /// Returns `SchemaParseError` on the first invalid fragment.
    pub fn parse_into(
        &mut self,
        json: &Value,
        namespace: Option<&str>,
    ) -> Result<SchemaRef, SchemaParseError> {
        match json {
            Value::String(name) => self.resolve_name(name, namespace),
            Value::Array(members) => self.parse_union(members, namespace),
            Value::Object(obj) => self.parse_object(json, obj, namespace),
            other => Err(SchemaParseError::UnresolvedName {
                name: other.to_string(),
            }),
        }
    }

    /// Resolves a bare type name: primitive first, then the registry.
    fn resolve_name(
        &mut self,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<SchemaRef, SchemaParseError> {
        if let Some(kind) = PrimitiveKind::from_name(name) {
            return Ok(self.add(SchemaNode::Primitive(kind)));
        }
        if !name.contains('.')
            && let Some(ns) = namespace
            && let Some(found) = self.lookup(&format!("{ns}.{name}"))
        {
            return Ok(found);
        }
        self.lookup(name)
            .ok_or_else(|| SchemaParseError::UnresolvedName {
                name: name.to_string(),
            })
    }

    fn parse_union(
        &mut self,
        members: &[Value],
        namespace: Option<&str>,
    ) -> Result<SchemaRef, SchemaParseError> {
        let mut parsed: Vec<SchemaRef> = Vec::with_capacity(members.len());
        let mut seen = HashSet::new();

        for member in members {
            let handle = self.parse_into(member, namespace)?;
            let node = self.node(handle);
            if node.is_union() {
                return Err(SchemaParseError::NestedUnion {
                    fragment: member.to_string(),
                });
            }
            let key = match node.name() {
                Some(name) => name.fullname(),
                None => node.type_name().to_string(),
            };
            if !seen.insert(key.clone()) {
                return Err(SchemaParseError::DuplicateUnionMember { type_name: key });
            }
            parsed.push(handle);
        }

        Ok(self.add(SchemaNode::Union { members: parsed }))
    }

    fn parse_object(
        &mut self,
        json: &Value,
        obj: &Map<String, Value>,
        namespace: Option<&str>,
    ) -> Result<SchemaRef, SchemaParseError> {
        let type_value = obj.get("type").ok_or_else(|| SchemaParseError::MissingType {
            fragment: json.to_string(),
        })?;

        let type_name = match type_value {
            Value::String(s) => s.as_str(),
            Value::Object(_) | Value::Array(_) => return self.parse_into(type_value, namespace),
            other => {
                return Err(SchemaParseError::UnknownType {
                    value: other.to_string(),
                });
            }
        };

        if let Some(kind) = PrimitiveKind::from_name(type_name) {
            return Ok(self.add(SchemaNode::Primitive(kind)));
        }

        match type_name {
            "record" => self.parse_record(obj, RecordKind::Record, namespace),
            "error" => self.parse_record(obj, RecordKind::Error, namespace),
            "enum" => self.parse_enum(obj, namespace),
            "fixed" => self.parse_fixed(obj, namespace),
            "array" => {
                let items = required(obj, "array", "items")?;
                let items = self.parse_into(items, namespace)?;
                Ok(self.add(SchemaNode::Array { items }))
            }
            "map" => {
                let values = required(obj, "map", "values")?;
                let values = self.parse_into(values, namespace)?;
                Ok(self.add(SchemaNode::Map { values }))
            }
            other => self
                .resolve_name(other, namespace)
                .map_err(|_| SchemaParseError::UnknownType {
                    value: other.to_string(),
                }),
        }
    }

    fn parse_record(
        &mut self,
        obj: &Map<String, Value>,
        kind: RecordKind,
        namespace: Option<&str>,
    ) -> Result<SchemaRef, SchemaParseError> {
        let name = parse_name(obj, kind.name(), namespace)?;
        let fields_json = match required(obj, kind.name(), "fields")? {
            Value::Array(fields) => fields,
            other => return Err(SchemaParseError::invalid_attr(kind.name(), "fields", other)),
        };
        let properties: IndexMap<String, Value> = obj
            .iter()
            .filter(|(k, _)| !RECORD_KEYWORDS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let record_namespace = name.namespace.clone();
        let record_fullname = name.fullname();
        let handle = self.add(SchemaNode::Record(RecordSchema {
            name,
            kind,
            fields: Vec::new(),
            properties,
        }));
        // Registered before the fields so they can refer back to it.
        self.register(handle)?;

        let mut fields = Vec::with_capacity(fields_json.len());
        let mut seen = HashSet::new();
        for field_json in fields_json {
            let field = self.parse_field(field_json, &record_fullname, record_namespace.as_deref())?;
            if !seen.insert(field.name.clone()) {
                return Err(SchemaParseError::duplicate_field(
                    record_fullname,
                    field.name,
                ));
            }
            fields.push(field);
        }

        if let SchemaNode::Record(record) = self.node_mut(handle) {
            record.fields = fields;
        }
        Ok(handle)
    }

    fn parse_field(
        &mut self,
        json: &Value,
        record: &str,
        namespace: Option<&str>,
    ) -> Result<Field, SchemaParseError> {
        let element = format!("field of {record}");
        let Value::Object(obj) = json else {
            return Err(SchemaParseError::invalid_attr(element, "fields", json));
        };
        let name = match required(obj, &element, "name")? {
            Value::String(s) => s.clone(),
            other => return Err(SchemaParseError::invalid_attr(element, "name", other)),
        };
        let schema = self.parse_into(required(obj, &element, "type")?, namespace)?;
        let order = match obj.get("order") {
            None => None,
            Some(value) => Some(
                value
                    .as_str()
                    .and_then(SortOrder::parse)
                    .ok_or_else(|| SchemaParseError::invalid_attr(&element, "order", value))?,
            ),
        };

        Ok(Field {
            name,
            schema,
            default: obj.get("default").cloned(),
            order,
        })
    }

    fn parse_enum(
        &mut self,
        obj: &Map<String, Value>,
        namespace: Option<&str>,
    ) -> Result<SchemaRef, SchemaParseError> {
        let name = parse_name(obj, "enum", namespace)?;
        let symbols_json = match required(obj, "enum", "symbols")? {
            Value::Array(symbols) => symbols,
            other => return Err(SchemaParseError::invalid_attr("enum", "symbols", other)),
        };

        let mut symbols = Vec::with_capacity(symbols_json.len());
        let mut seen = HashSet::new();
        for symbol in symbols_json {
            let Some(symbol) = symbol.as_str() else {
                return Err(SchemaParseError::invalid_attr("enum", "symbols", symbol));
            };
            if !seen.insert(symbol) {
                return Err(SchemaParseError::DuplicateSymbol {
                    enum_name: name.fullname(),
                    symbol: symbol.to_string(),
                });
            }
            symbols.push(symbol.to_string());
        }

        let handle = self.add(SchemaNode::Enum(EnumSchema { name, symbols }));
        self.register(handle)?;
        Ok(handle)
    }

    fn parse_fixed(
        &mut self,
        obj: &Map<String, Value>,
        namespace: Option<&str>,
    ) -> Result<SchemaRef, SchemaParseError> {
        let name = parse_name(obj, "fixed", namespace)?;
        let size_json = required(obj, "fixed", "size")?;
        let size = size_json
            .as_u64()
            .and_then(|s| usize::try_from(s).ok())
            .ok_or_else(|| SchemaParseError::invalid_attr("fixed", "size", size_json))?;

        let handle = self.add(SchemaNode::Fixed(FixedSchema { name, size }));
        self.register(handle)?;
        Ok(handle)
    }
}

/// Returns a required attribute or a `MissingAttribute` error.
fn required<'a>(
    obj: &'a Map<String, Value>,
    element: &str,
    attribute: &str,
) -> Result<&'a Value, SchemaParseError> {
    obj.get(attribute)
        .ok_or_else(|| SchemaParseError::missing_attr(element, attribute))
}

/// Extracts `name` / `namespace` of a named type.
fn parse_name(
    obj: &Map<String, Value>,
    element: &str,
    enclosing: Option<&str>,
) -> Result<Name, SchemaParseError> {
    let name = match required(obj, element, "name")? {
        Value::String(s) => s,
        other => return Err(SchemaParseError::invalid_attr(element, "name", other)),
    };
    let explicit = match obj.get("namespace") {
        None | Some(Value::Null) => None,
        Some(Value::String(ns)) => Some(ns.as_str()),
        Some(other) => return Err(SchemaParseError::invalid_attr(element, "namespace", other)),
    };
    Name::parse(name, explicit, enclosing)
}
