//! Schema type definitions.
//!
//! This module contains the data structures representing a parsed Avro
//! schema. Nodes live in an arena owned by a [`SchemaGraph`] and refer to each
//! other through [`SchemaRef`] handles, so named types are shared rather than
//! copied and recursive schemas do not create reference cycles.

use crate::error::SchemaParseError;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Type keywords that may not be used as a fullname.
pub const RESERVED_NAMES: &[&str] = &[
    "null", "boolean", "int", "long", "float", "double", "bytes", "string", "fixed", "enum",
    "record", "error", "array", "map", "union", "request",
];

/// Handle to a node inside a [`SchemaGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaRef(usize);

impl SchemaRef {
    /// Returns the arena index of this handle.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Avro primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// No value.
    Null,
    /// Binary value.
    Boolean,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// Single precision IEEE-754.
    Float,
    /// Double precision IEEE-754.
    Double,
    /// Sequence of 8-bit bytes.
    Bytes,
    /// Unicode character sequence.
    String,
}

impl PrimitiveKind {
    /// All primitive kinds in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Null,
        Self::Boolean,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::Bytes,
        Self::String,
    ];

    /// Returns the schema type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Bytes => "bytes",
            Self::String => "string",
        }
    }

    /// Parses a primitive kind from its schema type name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// A name plus optional namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    /// Simple name.
    pub name: String,
    /// Namespace, `None` for the null namespace.
    pub namespace: Option<String>,
}

impl Name {
    /// Builds a name from a `name` attribute.
    ///
    /// A dotted `name` is split into namespace and simple name and overrides
    /// `explicit`. Otherwise the namespace is `explicit`, falling back to
    /// `enclosing`. An empty namespace means the null namespace.
    ///
    /// # Errors
    /// Returns [`SchemaParseError::InvalidName`] if any component is not an
    /// identifier.
    pub fn parse(
        raw: &str,
        explicit: Option<&str>,
        enclosing: Option<&str>,
    ) -> Result<Self, SchemaParseError> {
        let (namespace, name) = match raw.rsplit_once('.') {
            Some((ns, name)) => (Some(ns), name),
            None => (explicit.or(enclosing), raw),
        };
        let namespace = namespace.filter(|ns| !ns.is_empty());

        if !is_identifier(name) {
            return Err(SchemaParseError::InvalidName {
                name: raw.to_string(),
            });
        }
        if let Some(ns) = namespace
            && !ns.split('.').all(is_identifier)
        {
            return Err(SchemaParseError::InvalidName {
                name: ns.to_string(),
            });
        }

        Ok(Self {
            name: name.to_string(),
            namespace: namespace.map(str::to_string),
        })
    }

    /// Returns `namespace.name`, or the bare name without a namespace.
    #[must_use]
    pub fn fullname(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{ns}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Field sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Ascending (the implicit default).
    Ascending,
    /// Descending.
    Descending,
    /// Ignored when comparing.
    Ignore,
}

impl SortOrder {
    /// Returns the schema spelling.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
            Self::Ignore => "ignore",
        }
    }

    /// Parses the schema spelling.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ascending" => Some(Self::Ascending),
            "descending" => Some(Self::Descending),
            "ignore" => Some(Self::Ignore),
            _ => None,
        }
    }
}

/// Record field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Field type.
    pub schema: SchemaRef,
    /// Declared default, as written.
    pub default: Option<serde_json::Value>,
    /// Declared sort order.
    pub order: Option<SortOrder>,
}

/// Whether a record was declared as `record` or `error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordKind {
    /// Plain record.
    #[default]
    Record,
    /// Protocol error record.
    Error,
}

impl RecordKind {
    /// Returns the schema type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Record => "record",
            Self::Error => "error",
        }
    }
}

/// Record type definition.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    /// Record name.
    pub name: Name,
    /// `record` or `error`.
    pub kind: RecordKind,
    /// Fields in declaration order.
    pub fields: Vec<Field>,
    /// Every other attribute (`doc`, `aliases`, `version`, ...).
    pub properties: IndexMap<String, serde_json::Value>,
}

impl RecordSchema {
    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Looks up an extra attribute.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.get(key)
    }
}

/// Enum type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSchema {
    /// Enum name.
    pub name: Name,
    /// Symbols in declaration order, unique.
    pub symbols: Vec<String>,
}

/// Fixed type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedSchema {
    /// Fixed name.
    pub name: Name,
    /// Size in bytes.
    pub size: usize,
}

/// Schema node variants.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// Primitive type.
    Primitive(PrimitiveKind),
    /// Fixed-size byte block.
    Fixed(FixedSchema),
    /// Enumeration.
    Enum(EnumSchema),
    /// Array of `items`.
    Array {
        /// Item type.
        items: SchemaRef,
    },
    /// String-keyed map of `values`.
    Map {
        /// Value type.
        values: SchemaRef,
    },
    /// Union of member types.
    Union {
        /// Members in declaration order.
        members: Vec<SchemaRef>,
    },
    /// Record.
    Record(RecordSchema),
}

impl SchemaNode {
    /// Returns the type tag (`record`, `array`, `string`, ...).
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Primitive(kind) => kind.name(),
            Self::Fixed(_) => "fixed",
            Self::Enum(_) => "enum",
            Self::Array { .. } => "array",
            Self::Map { .. } => "map",
            Self::Union { .. } => "union",
            Self::Record(r) => r.kind.name(),
        }
    }

    /// Returns the name of a named type.
    #[must_use]
    pub const fn name(&self) -> Option<&Name> {
        match self {
            Self::Fixed(f) => Some(&f.name),
            Self::Enum(e) => Some(&e.name),
            Self::Record(r) => Some(&r.name),
            _ => None,
        }
    }

    /// Returns true for record, enum and fixed.
    #[must_use]
    pub const fn is_named(&self) -> bool {
        self.name().is_some()
    }

    /// Returns true for the `null` primitive.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Primitive(PrimitiveKind::Null))
    }

    /// Returns true if this is a union.
    #[must_use]
    pub const fn is_union(&self) -> bool {
        matches!(self, Self::Union { .. })
    }
}

/// Arena of schema nodes plus the fullname registry.
///
/// Built incrementally by the parser and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct SchemaGraph {
    nodes: Vec<SchemaNode>,
    names: HashMap<String, SchemaRef>,
}

impl SchemaGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no node has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node behind a handle.
    ///
    /// Handles are only minted by the graph that owns them; passing a handle
    /// from another graph is a logic error and panics if out of bounds.
    #[must_use]
    pub fn node(&self, schema: SchemaRef) -> &SchemaNode {
        &self.nodes[schema.0]
    }

    /// Looks up a named type by fullname.
    #[must_use]
    pub fn lookup(&self, fullname: &str) -> Option<SchemaRef> {
        self.names.get(fullname).copied()
    }

    /// Returns true if a named type with the given fullname exists.
    #[must_use]
    pub fn has_name(&self, fullname: &str) -> bool {
        self.names.contains_key(fullname)
    }

    /// Iterates over registered fullnames and their handles.
    pub fn named(&self) -> impl Iterator<Item = (&str, SchemaRef)> {
        self.names.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Returns the fullname of a named node.
    #[must_use]
    pub fn fullname(&self, schema: SchemaRef) -> Option<String> {
        self.node(schema).name().map(Name::fullname)
    }

    /// Returns true if the node is a union with a `null` member.
    #[must_use]
    pub fn union_has_null(&self, schema: SchemaRef) -> bool {
        match self.node(schema) {
            SchemaNode::Union { members } => members.iter().any(|&m| self.node(m).is_null()),
            _ => false,
        }
    }

    pub(crate) fn add(&mut self, node: SchemaNode) -> SchemaRef {
        let handle = SchemaRef(self.nodes.len());
        self.nodes.push(node);
        handle
    }

    pub(crate) fn node_mut(&mut self, schema: SchemaRef) -> &mut SchemaNode {
        &mut self.nodes[schema.0]
    }

    /// Adds the fullname of a named node to the registry.
    pub(crate) fn register(&mut self, schema: SchemaRef) -> Result<(), SchemaParseError> {
        let Some(fullname) = self.fullname(schema) else {
            return Ok(());
        };
        if RESERVED_NAMES.contains(&fullname.as_str()) {
            return Err(SchemaParseError::ReservedName { fullname });
        }
        if self.names.contains_key(&fullname) {
            return Err(SchemaParseError::DuplicateName { fullname });
        }
        self.names.insert(fullname, schema);
        Ok(())
    }

    /// Structural equality between a node of this graph and a node of
    /// `other`.
    ///
    /// Named nodes must have equal fullnames; each pair of named nodes is
    /// compared by content once, so recursive schemas terminate.
    #[must_use]
    pub fn equivalent(&self, a: SchemaRef, other: &SchemaGraph, b: SchemaRef) -> bool {
        let mut visited = HashSet::new();
        self.equivalent_inner(a, other, b, &mut visited)
    }

    fn equivalent_inner(
        &self,
        a: SchemaRef,
        other: &SchemaGraph,
        b: SchemaRef,
        visited: &mut HashSet<String>,
    ) -> bool {
        let (left, right) = (self.node(a), other.node(b));
        match (left.name(), right.name()) {
            (Some(l), Some(r)) => {
                let fullname = l.fullname();
                if fullname != r.fullname() {
                    return false;
                }
                if !visited.insert(fullname) {
                    return true;
                }
            }
            (None, None) => {}
            _ => return false,
        }

        match (left, right) {
            (SchemaNode::Primitive(l), SchemaNode::Primitive(r)) => l == r,
            (SchemaNode::Fixed(l), SchemaNode::Fixed(r)) => l.size == r.size,
            (SchemaNode::Enum(l), SchemaNode::Enum(r)) => l.symbols == r.symbols,
            (SchemaNode::Array { items: l }, SchemaNode::Array { items: r })
            | (SchemaNode::Map { values: l }, SchemaNode::Map { values: r }) => {
                self.equivalent_inner(*l, other, *r, visited)
            }
            (SchemaNode::Union { members: l }, SchemaNode::Union { members: r }) => {
                l.len() == r.len()
                    && l.iter()
                        .zip(r)
                        .all(|(&x, &y)| self.equivalent_inner(x, other, y, visited))
            }
            (SchemaNode::Record(l), SchemaNode::Record(r)) => {
                l.kind == r.kind
                    && l.properties == r.properties
                    && l.fields.len() == r.fields.len()
                    && l.fields.iter().zip(&r.fields).all(|(x, y)| {
                        x.name == y.name
                            && x.default == y.default
                            && x.order == y.order
                            && self.equivalent_inner(x.schema, other, y.schema, visited)
                    })
            }
            _ => false,
        }
    }
}

/// A parsed schema document: a graph plus its root node.
#[derive(Debug, Clone)]
pub struct Schema {
    graph: SchemaGraph,
    root: SchemaRef,
}

impl Schema {
    /// Wraps a graph and the node the document describes.
    #[must_use]
    pub fn new(graph: SchemaGraph, root: SchemaRef) -> Self {
        Self { graph, root }
    }

    /// Returns the underlying graph.
    #[must_use]
    pub fn graph(&self) -> &SchemaGraph {
        &self.graph
    }

    /// Returns the root handle.
    #[must_use]
    pub const fn root(&self) -> SchemaRef {
        self.root
    }

    /// Returns the root node.
    #[must_use]
    pub fn root_node(&self) -> &SchemaNode {
        self.graph.node(self.root)
    }

    /// Structural equality of the two roots.
    #[must_use]
    pub fn equivalent(&self, other: &Schema) -> bool {
        self.graph.equivalent(self.root, &other.graph, other.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_names_roundtrip() {
        for kind in PrimitiveKind::ALL {
            assert_eq!(PrimitiveKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(PrimitiveKind::from_name("record"), None);
    }

    #[test]
    fn test_name_dotted_overrides_namespace() {
        let name = Name::parse("a.b.Rec", Some("x.y"), Some("z")).expect("valid name");
        assert_eq!(name.name, "Rec");
        assert_eq!(name.namespace.as_deref(), Some("a.b"));
        assert_eq!(name.fullname(), "a.b.Rec");
    }

    #[test]
    fn test_name_inherits_enclosing_namespace() {
        let name = Name::parse("Rec", None, Some("outer")).expect("valid name");
        assert_eq!(name.fullname(), "outer.Rec");

        let explicit_empty = Name::parse("Rec", Some(""), Some("outer")).expect("valid name");
        assert_eq!(explicit_empty.namespace, None);
        assert_eq!(explicit_empty.to_string(), "Rec");
    }

    #[test]
    fn test_name_rejects_bad_identifiers() {
        assert!(Name::parse("1abc", None, None).is_err());
        assert!(Name::parse("a-b", None, None).is_err());
        assert!(Name::parse("Rec", Some("ns..x"), None).is_err());
        assert!(Name::parse("_ok", Some("a1.b_2"), None).is_ok());
    }

    #[test]
    fn test_register_rejects_reserved_and_duplicate() {
        let mut graph = SchemaGraph::new();
        let fixed = |name: &str| {
            SchemaNode::Fixed(FixedSchema {
                name: Name::parse(name, None, None).expect("valid name"),
                size: 4,
            })
        };

        let reserved = graph.add(fixed("record"));
        assert!(matches!(
            graph.register(reserved),
            Err(SchemaParseError::ReservedName { .. })
        ));

        let first = graph.add(fixed("Md5"));
        graph.register(first).expect("first registration");
        let second = graph.add(fixed("Md5"));
        assert!(matches!(
            graph.register(second),
            Err(SchemaParseError::DuplicateName { .. })
        ));
        assert_eq!(graph.lookup("Md5"), Some(first));
        assert!(graph.has_name("Md5"));
        assert_eq!(graph.named().count(), 1);
    }

    #[test]
    fn test_union_has_null() {
        let mut graph = SchemaGraph::new();
        let null = graph.add(SchemaNode::Primitive(PrimitiveKind::Null));
        let string = graph.add(SchemaNode::Primitive(PrimitiveKind::String));
        let union = graph.add(SchemaNode::Union {
            members: vec![null, string],
        });
        assert!(graph.union_has_null(union));
        assert!(!graph.union_has_null(string));
        assert_eq!(graph.node(union).type_name(), "union");
    }
}
