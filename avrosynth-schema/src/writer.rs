//! Schema-driven binary datum writer.
//!
//! [`DatumWriter`] walks a value and its schema together and writes the Avro
//! binary encoding. Any structural mismatch aborts with an [`AvroTypeError`]
//! naming the expected schema and the offending value; that error is the
//! authoritative signal that a datum does not conform.

use crate::error::AvroTypeError;
use crate::types::{PrimitiveKind, SchemaGraph, SchemaNode, SchemaRef};
use crate::validation::{INT_MAX_VALUE, INT_MIN_VALUE, validate, validate_exact};
use avrosynth_core::{EncoderBuffer, Value};
use bytes::Bytes;

/// Writes datums of one schema in Avro binary form.
#[derive(Debug, Clone, Copy)]
pub struct DatumWriter<'a> {
    graph: &'a SchemaGraph,
    schema: SchemaRef,
}

impl<'a> DatumWriter<'a> {
    /// Creates a writer for `schema`.
    #[must_use]
    pub fn new(graph: &'a SchemaGraph, schema: SchemaRef) -> Self {
        Self { graph, schema }
    }

    /// Writes `value` into `encoder`.
    ///
    /// The encoder contents are unspecified after an error.
    ///
    /// # Errors
    /// Returns `AvroTypeError` if `value` does not conform to the schema.
    pub fn write(&self, value: &Value, encoder: &mut EncoderBuffer) -> Result<(), AvroTypeError> {
        self.write_data(self.schema, value, encoder)
    }

    /// Encodes `value` into a fresh buffer.
    ///
    /// # Errors
    /// Returns `AvroTypeError` if `value` does not conform to the schema.
    pub fn encode(&self, value: &Value) -> Result<Bytes, AvroTypeError> {
        let mut encoder = EncoderBuffer::new();
        self.write(value, &mut encoder)?;
        Ok(encoder.freeze())
    }

    fn write_data(
        &self,
        schema: SchemaRef,
        value: &Value,
        encoder: &mut EncoderBuffer,
    ) -> Result<(), AvroTypeError> {
        match (self.graph.node(schema), value) {
            (SchemaNode::Primitive(kind), _) => self.write_primitive(schema, *kind, value, encoder),
            (SchemaNode::Fixed(fixed), _) => match value.as_byte_slice() {
                Some(bytes) if bytes.len() == fixed.size => {
                    encoder.write_fixed(&bytes);
                    Ok(())
                }
                _ => Err(self.type_error(schema, value)),
            },
            (SchemaNode::Enum(enum_schema), Value::String(symbol)) => {
                match enum_schema.symbols.iter().position(|s| s == symbol) {
                    Some(index) => {
                        encoder.write_length(index);
                        Ok(())
                    }
                    None => Err(self.type_error(schema, value)),
                }
            }
            (SchemaNode::Array { items }, Value::Array(elements)) => {
                if !elements.is_empty() {
                    encoder.write_length(elements.len());
                    for element in elements {
                        self.write_data(*items, element, encoder)?;
                    }
                }
                encoder.write_long(0);
                Ok(())
            }
            (SchemaNode::Map { values }, Value::Map(entries)) => {
                if !entries.is_empty() {
                    encoder.write_length(entries.len());
                    for (key, entry) in entries {
                        encoder.write_string(key);
                        self.write_data(*values, entry, encoder)?;
                    }
                }
                encoder.write_long(0);
                Ok(())
            }
            (SchemaNode::Union { members }, _) => {
                let Some(index) = self.select_member(members, value) else {
                    return Err(self.type_error(schema, value));
                };
                encoder.write_length(index);
                self.write_data(members[index], value, encoder)
            }
            (SchemaNode::Record(record), Value::Map(entries)) => {
                let missing = Value::Null;
                for field in &record.fields {
                    let entry = entries.get(&field.name).unwrap_or(&missing);
                    self.write_data(field.schema, entry, encoder)?;
                }
                Ok(())
            }
            _ => Err(self.type_error(schema, value)),
        }
    }

    /// Picks the union branch for `value`: the first member that reads it
    /// back unchanged, else the first member that accepts it at all.
    fn select_member(&self, members: &[SchemaRef], value: &Value) -> Option<usize> {
        members
            .iter()
            .position(|&m| validate_exact(self.graph, m, value))
            .or_else(|| members.iter().position(|&m| validate(self.graph, m, value)))
    }

    fn write_primitive(
        &self,
        schema: SchemaRef,
        kind: PrimitiveKind,
        value: &Value,
        encoder: &mut EncoderBuffer,
    ) -> Result<(), AvroTypeError> {
        match (kind, value) {
            (PrimitiveKind::Null, Value::Null) => {}
            (PrimitiveKind::Boolean, Value::Boolean(b)) => encoder.write_boolean(*b),
            (PrimitiveKind::Int, Value::Long(v)) if (INT_MIN_VALUE..=INT_MAX_VALUE).contains(v) => {
                encoder.write_int(*v as i32);
            }
            (PrimitiveKind::Long, Value::Long(v)) => encoder.write_long(*v),
            (PrimitiveKind::Float, Value::Long(_) | Value::Double(_)) => {
                encoder.write_float(value.as_f64().unwrap_or_default() as f32);
            }
            (PrimitiveKind::Double, Value::Long(_) | Value::Double(_)) => {
                encoder.write_double(value.as_f64().unwrap_or_default());
            }
            (PrimitiveKind::String, Value::String(s)) => encoder.write_string(s),
            (PrimitiveKind::Bytes, _) => match value.as_byte_slice() {
                Some(bytes) => encoder.write_bytes(&bytes),
                None => return Err(self.type_error(schema, value)),
            },
            _ => return Err(self.type_error(schema, value)),
        }
        Ok(())
    }

    fn type_error(&self, schema: SchemaRef, value: &Value) -> AvroTypeError {
        AvroTypeError::new(self.graph.describe(schema), value.to_string())
    }
}
