//! Schema serialization back to JSON.
//!
//! A named type is written in full the first time it is reached and by
//! fullname afterwards, so the output of [`SchemaGraph::to_json`] is a
//! self-contained document that parses back to an equivalent graph.

use crate::types::{Name, SchemaGraph, SchemaNode, SchemaRef, Schema};
use serde_json::{Map, Value};
use std::collections::HashSet;

impl SchemaGraph {
    /// Serializes the schema rooted at `root` as a standalone JSON document.
    #[must_use]
    pub fn to_json(&self, root: SchemaRef) -> Value {
        let mut written = HashSet::new();
        self.write_json(root, None, &mut written)
    }

    /// Serializes the schema rooted at `root` as compact JSON text.
    #[must_use]
    pub fn to_json_string(&self, root: SchemaRef) -> String {
        self.to_json(root).to_string()
    }

    /// Short description of a node for diagnostics: the fullname of a named
    /// type, the JSON form of anything else.
    #[must_use]
    pub fn describe(&self, schema: SchemaRef) -> String {
        match self.fullname(schema) {
            Some(fullname) => fullname,
            None => self.to_json_string(schema),
        }
    }

    fn write_json(
        &self,
        schema: SchemaRef,
        enclosing: Option<&str>,
        written: &mut HashSet<SchemaRef>,
    ) -> Value {
        let node = self.node(schema);
        if let Some(name) = node.name()
            && !written.insert(schema)
        {
            return Value::String(name.fullname());
        }

        match node {
            SchemaNode::Primitive(kind) => Value::String(kind.name().to_string()),
            SchemaNode::Array { items } => {
                let mut obj = Map::new();
                obj.insert("type".into(), "array".into());
                obj.insert("items".into(), self.write_json(*items, enclosing, written));
                Value::Object(obj)
            }
            SchemaNode::Map { values } => {
                let mut obj = Map::new();
                obj.insert("type".into(), "map".into());
                obj.insert("values".into(), self.write_json(*values, enclosing, written));
                Value::Object(obj)
            }
            SchemaNode::Union { members } => Value::Array(
                members
                    .iter()
                    .map(|&m| self.write_json(m, enclosing, written))
                    .collect(),
            ),
            SchemaNode::Fixed(fixed) => {
                let mut obj = named_header("fixed", &fixed.name, enclosing);
                obj.insert("size".into(), fixed.size.into());
                Value::Object(obj)
            }
            SchemaNode::Enum(enum_schema) => {
                let mut obj = named_header("enum", &enum_schema.name, enclosing);
                obj.insert("symbols".into(), enum_schema.symbols.clone().into());
                Value::Object(obj)
            }
            SchemaNode::Record(record) => {
                let mut obj = named_header(record.kind.name(), &record.name, enclosing);
                for (key, value) in &record.properties {
                    obj.insert(key.clone(), value.clone());
                }
                let namespace = record.name.namespace.as_deref();
                let fields = record
                    .fields
                    .iter()
                    .map(|field| {
                        let mut f = Map::new();
                        f.insert("name".into(), field.name.clone().into());
                        f.insert("type".into(), self.write_json(field.schema, namespace, written));
                        if let Some(default) = &field.default {
                            f.insert("default".into(), default.clone());
                        }
                        if let Some(order) = field.order {
                            f.insert("order".into(), order.name().into());
                        }
                        Value::Object(f)
                    })
                    .collect();
                obj.insert("fields".into(), Value::Array(fields));
                Value::Object(obj)
            }
        }
    }
}

impl Schema {
    /// Serializes the whole document.
    #[must_use]
    pub fn to_json(&self) -> Value {
        self.graph().to_json(self.root())
    }

    /// Serializes the whole document as compact JSON text.
    #[must_use]
    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }
}

/// `type`, `name` and `namespace` of a named type.
///
/// A type in the null namespace nested under a namespaced one gets an
/// explicit empty namespace so it does not inherit on re-parse.
fn named_header(type_name: &str, name: &Name, enclosing: Option<&str>) -> Map<String, Value> {
    let mut obj = Map::new();
    obj.insert("type".into(), type_name.into());
    obj.insert("name".into(), name.name.clone().into());
    match (&name.namespace, enclosing) {
        (Some(ns), _) => {
            obj.insert("namespace".into(), ns.clone().into());
        }
        (None, Some(_)) => {
            obj.insert("namespace".into(), "".into());
        }
        (None, None) => {}
    }
    obj
}
