//! Recursive example-instance synthesizer.
//!
//! The synthesizer walks the schema graph from a root handle and builds one
//! [`Value`] for it. Recursion through named records is cut by keeping the
//! chain of records currently being expanded: when a record re-enters its own
//! ancestry, a placeholder is emitted instead of descending again. Siblings
//! are unaffected, so two fields of the same record type each expand fully.

use crate::config::{SynthConfig, UnionPolicy};
use crate::error::SynthError;
use crate::provider::{CanonicalValues, ValueProvider};
use avrosynth_core::Value;
use avrosynth_schema::{DatumReader, DatumWriter, RecordSchema, SchemaGraph, SchemaNode, SchemaRef};
use indexmap::IndexMap;

/// A point where recursion was cut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleCut {
    /// Fullname of the record that re-entered its ancestry.
    pub fullname: String,
    /// Records being expanded at the moment of the cut, outermost first.
    pub chain: Vec<String>,
}

/// Result of one synthesis run.
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    /// The synthesized instance.
    pub value: Value,
    /// Every cycle cut taken, in walk order.
    pub cuts: Vec<CycleCut>,
}

impl Synthesis {
    /// Returns true if no recursion had to be cut.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cuts.is_empty()
    }
}

/// Builds example instances for schemas of one graph.
///
/// # Example
/// ```
/// use avrosynth_schema::parse_schema;
/// use avrosynth_synth::{SynthConfig, Synthesizer};
///
/// let schema = parse_schema(r#"{"type":"array","items":"int"}"#).unwrap();
/// let synthesizer = Synthesizer::new(schema.graph(), SynthConfig::default());
/// let synthesis = synthesizer.synthesize(schema.root()).unwrap();
/// assert_eq!(synthesis.value.to_string(), "[0]");
/// ```
#[derive(Debug, Clone)]
pub struct Synthesizer<'a, P = CanonicalValues> {
    graph: &'a SchemaGraph,
    config: SynthConfig,
    provider: P,
}

impl<'a> Synthesizer<'a, CanonicalValues> {
    /// Creates a synthesizer using [`CanonicalValues`] configured from
    /// `config`.
    #[must_use]
    pub fn new(graph: &'a SchemaGraph, config: SynthConfig) -> Self {
        let provider = CanonicalValues::from_config(&config);
        Self::with_provider(graph, config, provider)
    }
}

/// In-progress state of one top-level call.
#[derive(Debug, Default)]
struct Walk {
    chain: Vec<String>,
    cuts: Vec<CycleCut>,
}

/// A synthesized subtree, marking whether it is a cycle placeholder.
enum Expanded {
    Value(Value),
    Cut(Value),
}

impl Expanded {
    fn is_cut(&self) -> bool {
        matches!(self, Self::Cut(_))
    }

    fn into_value(self) -> Value {
        match self {
            Self::Value(v) | Self::Cut(v) => v,
        }
    }
}

impl<'a, P: ValueProvider> Synthesizer<'a, P> {
    /// Creates a synthesizer with a custom leaf value provider.
    #[must_use]
    pub fn with_provider(graph: &'a SchemaGraph, config: SynthConfig, provider: P) -> Self {
        Self {
            graph,
            config,
            provider,
        }
    }

    /// Returns the configuration in use.
    #[must_use]
    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Synthesizes one instance of `schema`.
    ///
    /// # Errors
    /// Returns [`SynthError::EmptyEnum`] or [`SynthError::EmptyUnion`] when a
    /// reachable type has no possible value, and
    /// [`SynthError::EmptyPlaceholder`] for an invalid configuration.
    pub fn synthesize(&self, schema: SchemaRef) -> Result<Synthesis, SynthError> {
        self.config.check()?;
        let mut walk = Walk::default();
        let value = self.expand(schema, false, &mut walk)?.into_value();
        Ok(Synthesis {
            value,
            cuts: walk.cuts,
        })
    }

    /// Index of the union member to expand, or `None` for an empty union.
    #[must_use]
    pub fn pick_member(&self, members: &[SchemaRef]) -> Option<usize> {
        if members.is_empty() {
            return None;
        }
        match self.config.union_policy {
            UnionPolicy::First => Some(0),
            UnionPolicy::LastNonNull => {
                let is_null = |m: &SchemaRef| self.graph.node(*m).is_null();
                if members.len() > 1 && members.iter().any(is_null) {
                    members.iter().rposition(|m| !is_null(m))
                } else {
                    Some(0)
                }
            }
        }
    }

    fn expand(
        &self,
        schema: SchemaRef,
        nullable_parent: bool,
        walk: &mut Walk,
    ) -> Result<Expanded, SynthError> {
        let value = match self.graph.node(schema) {
            SchemaNode::Primitive(kind) => self.provider.primitive(*kind),
            SchemaNode::Fixed(fixed) => self.provider.fixed(fixed.size),
            SchemaNode::Enum(enum_schema) => match enum_schema.symbols.first() {
                Some(symbol) => Value::String(symbol.clone()),
                None => return Err(SynthError::empty_enum(enum_schema.name.fullname())),
            },
            SchemaNode::Array { items } => {
                let item = self.expand(*items, false, walk)?;
                if item.is_cut() && self.config.empty_collections_on_cycle {
                    Value::Array(Vec::new())
                } else {
                    Value::Array(vec![item.into_value()])
                }
            }
            SchemaNode::Map { values } => {
                let entry = self.expand(*values, false, walk)?;
                let mut entries = IndexMap::new();
                if !(entry.is_cut() && self.config.empty_collections_on_cycle) {
                    entries.insert(self.provider.map_key(), entry.into_value());
                }
                Value::Map(entries)
            }
            SchemaNode::Union { members } => {
                let Some(index) = self.pick_member(members) else {
                    return Err(SynthError::EmptyUnion);
                };
                tracing::debug!(
                    "union {} expands member {}",
                    self.graph.describe(schema),
                    index
                );
                return self.expand(members[index], self.graph.union_has_null(schema), walk);
            }
            SchemaNode::Record(record) => {
                let fullname = record.name.fullname();
                if walk.chain.contains(&fullname) {
                    tracing::debug!("cycle cut at {} via {}", fullname, walk.chain.join(" -> "));
                    walk.cuts.push(CycleCut {
                        fullname: fullname.clone(),
                        chain: walk.chain.clone(),
                    });
                    let placeholder = if nullable_parent {
                        Value::Null
                    } else {
                        Value::String(fullname)
                    };
                    return Ok(Expanded::Cut(placeholder));
                }

                walk.chain.push(fullname);
                let fields = self.expand_fields(record, walk);
                walk.chain.pop();
                Value::Map(fields?)
            }
        };
        Ok(Expanded::Value(value))
    }

    fn expand_fields(
        &self,
        record: &RecordSchema,
        walk: &mut Walk,
    ) -> Result<IndexMap<String, Value>, SynthError> {
        let mut fields = IndexMap::with_capacity(record.fields.len());
        for field in &record.fields {
            if self.config.use_field_defaults
                && let Some(default) = &field.default
            {
                if let Some(value) = self.read_default(field.schema, default) {
                    fields.insert(field.name.clone(), value);
                    continue;
                }
            }
            let value = self.expand(field.schema, false, walk)?.into_value();
            fields.insert(field.name.clone(), value);
        }
        Ok(fields)
    }

    /// Returns a field default in decoded form, or `None` if it does not
    /// conform. An integer default of a `float` field becomes a double.
    fn read_default(&self, schema: SchemaRef, default: &serde_json::Value) -> Option<Value> {
        let encoded = DatumWriter::new(self.graph, schema)
            .encode(&Value::from_json(default))
            .ok()?;
        DatumReader::new(self.graph, schema).decode(&encoded).ok()
    }
}
