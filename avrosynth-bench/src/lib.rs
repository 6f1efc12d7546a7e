//! # avrosynth Bench
//!
//! Shared fixtures for the avrosynth benchmarks.

use avrosynth_core::Value;
use indexmap::IndexMap;

/// An order record with nested records, collections, a fixed, an enum and a
/// recursive category tree.
pub const ORDER_SCHEMA: &str = r#"{
    "type": "record",
    "name": "Order",
    "namespace": "bench.shop",
    "fields": [
        {"name": "id", "type": {"type": "fixed", "name": "OrderId", "size": 16}},
        {"name": "placed_at", "type": "long"},
        {"name": "status", "type": {"type": "enum", "name": "Status", "symbols": ["NEW", "PAID", "SHIPPED"]}},
        {"name": "customer", "type": {"type": "record", "name": "Customer", "fields": [
            {"name": "name", "type": "string"},
            {"name": "email", "type": ["null", "string"]},
            {"name": "loyalty", "type": ["null", "int"]}
        ]}},
        {"name": "lines", "type": {"type": "array", "items": {"type": "record", "name": "Line", "fields": [
            {"name": "sku", "type": "string"},
            {"name": "quantity", "type": "int"},
            {"name": "price", "type": "double"},
            {"name": "category", "type": {"type": "record", "name": "Category", "fields": [
                {"name": "label", "type": "string"},
                {"name": "parent", "type": ["null", "Category"]},
                {"name": "children", "type": {"type": "array", "items": "Category"}}
            ]}}
        ]}}},
        {"name": "attributes", "type": {"type": "map", "values": "string"}},
        {"name": "signature", "type": "bytes"}
    ]
}"#;


/// Singly linked list of longs.
pub const LIST_SCHEMA: &str = r#"{
    "type": "record",
    "name": "Cell",
    "fields": [
        {"name": "value", "type": "long"},
        {"name": "next", "type": ["null", "Cell"]}
    ]
}"#;

/// A list of `len` cells (`len >= 1`) matching [`LIST_SCHEMA`].
#[must_use]
pub fn linked_list(len: usize) -> Value {
    let mut next = Value::Null;
    for i in (0..len.max(1)).rev() {
        let mut cell = IndexMap::with_capacity(2);
        cell.insert("value".to_string(), Value::Long(i as i64));
        cell.insert("next".to_string(), next);
        next = Value::Map(cell);
    }
    next
}
