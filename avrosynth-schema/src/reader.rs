//! Schema-driven binary datum reader.

use crate::error::DecodeError;
use crate::types::{PrimitiveKind, SchemaGraph, SchemaNode, SchemaRef};
use avrosynth_core::{DecoderBuffer, Value};
use indexmap::IndexMap;

/// Default nesting limit for [`DatumReader`].
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Default cap on items per block for types that encode to zero bytes.
pub const DEFAULT_MAX_ZERO_WIDTH_ITEMS: usize = 1 << 16;

/// Reads datums of one schema from Avro binary form.
///
/// `int` and `long` decode to [`Value::Long`], `float` and `double` to
/// [`Value::Double`], `bytes` and `fixed` to [`Value::Bytes`], enum symbols to
/// [`Value::String`] and records to a [`Value::Map`] in field order.
///
/// A block may not announce more items than there are unread bytes. Items
/// that encode to nothing (`null`, empty `fixed`, records of those) are
/// capped by [`with_max_zero_width_items`](Self::with_max_zero_width_items)
/// instead.
#[derive(Debug, Clone, Copy)]
pub struct DatumReader<'a> {
    graph: &'a SchemaGraph,
    schema: SchemaRef,
    max_depth: usize,
    max_zero_width_items: usize,
}

impl<'a> DatumReader<'a> {
    /// Creates a reader for `schema`.
    #[must_use]
    pub fn new(graph: &'a SchemaGraph, schema: SchemaRef) -> Self {
        Self {
            graph,
            schema,
            max_depth: DEFAULT_MAX_DEPTH,
            max_zero_width_items: DEFAULT_MAX_ZERO_WIDTH_ITEMS,
        }
    }

    /// Sets the nesting limit.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the per-block cap for items that encode to zero bytes.
    #[must_use]
    pub fn with_max_zero_width_items(mut self, max_items: usize) -> Self {
        self.max_zero_width_items = max_items;
        self
    }

    /// Reads one datum from `decoder`, leaving any following bytes unread.
    ///
    /// # Errors
    /// Returns an error if the input is malformed or nests too deeply.
    pub fn read(&self, decoder: &mut DecoderBuffer<'_>) -> Result<Value, DecodeError> {
        self.read_data(self.schema, decoder, 0)
    }

    /// Decodes exactly one datum from `bytes`.
    ///
    /// # Errors
    /// Returns an error if the input is malformed or has trailing bytes.
    pub fn decode(&self, bytes: &[u8]) -> Result<Value, DecodeError> {
        let mut decoder = DecoderBuffer::new(bytes);
        let value = self.read(&mut decoder)?;
        if !decoder.is_exhausted() {
            return Err(DecodeError::TrailingBytes {
                remaining: decoder.remaining(),
            });
        }
        Ok(value)
    }

    fn read_data(
        &self,
        schema: SchemaRef,
        decoder: &mut DecoderBuffer<'_>,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        if depth > self.max_depth {
            return Err(DecodeError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        let value = match self.graph.node(schema) {
            SchemaNode::Primitive(kind) => read_primitive(*kind, decoder)?,
            SchemaNode::Fixed(fixed) => Value::Bytes(decoder.read_fixed(fixed.size)?.to_vec()),
            SchemaNode::Enum(enum_schema) => {
                let index = decoder.read_index("enum", enum_schema.symbols.len())?;
                Value::String(enum_schema.symbols[index].clone())
            }
            SchemaNode::Array { items } => {
                let zero_width = is_zero_width(self.graph, *items, &mut Vec::new());
                let mut elements = Vec::new();
                loop {
                    let count = self.read_block_count(decoder, zero_width)?;
                    if count == 0 {
                        break;
                    }
                    for _ in 0..count {
                        elements.push(self.read_data(*items, decoder, depth + 1)?);
                    }
                }
                Value::Array(elements)
            }
            SchemaNode::Map { values } => {
                let mut entries = IndexMap::new();
                loop {
                    let count = self.read_block_count(decoder, false)?;
                    if count == 0 {
                        break;
                    }
                    for _ in 0..count {
                        let key = decoder.read_string()?.to_string();
                        let value = self.read_data(*values, decoder, depth + 1)?;
                        entries.insert(key, value);
                    }
                }
                Value::Map(entries)
            }
            SchemaNode::Union { members } => {
                let index = decoder.read_index("union", members.len())?;
                self.read_data(members[index], decoder, depth + 1)?
            }
            SchemaNode::Record(record) => {
                let mut entries = IndexMap::with_capacity(record.fields.len());
                for field in &record.fields {
                    let value = self.read_data(field.schema, decoder, depth + 1)?;
                    entries.insert(field.name.clone(), value);
                }
                Value::Map(entries)
            }
        };
        Ok(value)
    }

    fn read_block_count(
        &self,
        decoder: &mut DecoderBuffer<'_>,
        zero_width: bool,
    ) -> Result<usize, DecodeError> {
        let count = decoder.read_block_count()?;
        let limit = if zero_width {
            self.max_zero_width_items
        } else {
            decoder.remaining()
        };
        if count > limit {
            return Err(DecodeError::BlockTooLarge { count, limit });
        }
        Ok(count)
    }
}

/// True if every datum of `schema` encodes to zero bytes.
fn is_zero_width(graph: &SchemaGraph, schema: SchemaRef, visiting: &mut Vec<SchemaRef>) -> bool {
    match graph.node(schema) {
        SchemaNode::Primitive(PrimitiveKind::Null) => true,
        SchemaNode::Fixed(fixed) => fixed.size == 0,
        SchemaNode::Record(record) => {
            if visiting.contains(&schema) {
                return false;
            }
            visiting.push(schema);
            let zero = record
                .fields
                .iter()
                .all(|field| is_zero_width(graph, field.schema, visiting));
            visiting.pop();
            zero
        }
        _ => false,
    }
}

fn read_primitive(kind: PrimitiveKind, decoder: &mut DecoderBuffer<'_>) -> Result<Value, DecodeError> {
    Ok(match kind {
        PrimitiveKind::Null => Value::Null,
        PrimitiveKind::Boolean => Value::Boolean(decoder.read_boolean()?),
        PrimitiveKind::Int => Value::Long(i64::from(decoder.read_int()?)),
        PrimitiveKind::Long => Value::Long(decoder.read_long()?),
        PrimitiveKind::Float => Value::Double(f64::from(decoder.read_float()?)),
        PrimitiveKind::Double => Value::Double(decoder.read_double()?),
        PrimitiveKind::Bytes => Value::Bytes(decoder.read_bytes()?.to_vec()),
        PrimitiveKind::String => Value::String(decoder.read_string()?.to_string()),
    })
}
