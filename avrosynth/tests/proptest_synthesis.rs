//! Property-based tests over generated schemas.
//!
//! Schemas are generated as shapes and rendered to JSON with unique names, so
//! every generated document is a valid schema. Linked lists add a recursive
//! record behind a nullable union.

use avrosynth::prelude::*;
use proptest::prelude::*;
use serde_json::{Value as Json, json};
use std::collections::HashSet;

const PRIMITIVES: &[&str] = &[
    "null", "boolean", "int", "long", "float", "double", "bytes", "string",
];

#[derive(Debug, Clone)]
enum Shape {
    Primitive(&'static str),
    Enum(usize),
    Fixed(usize),
    Array(Box<Shape>),
    Map(Box<Shape>),
    Union(Vec<Shape>),
    Record(Vec<Shape>),
    LinkedList(Box<Shape>),
}

fn arb_shape() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![
        prop::sample::select(PRIMITIVES).prop_map(Shape::Primitive),
        (1usize..5).prop_map(Shape::Enum),
        (0usize..9).prop_map(Shape::Fixed),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(|s| Shape::Array(Box::new(s))),
            inner.clone().prop_map(|s| Shape::Map(Box::new(s))),
            prop::collection::vec(inner.clone(), 1..4).prop_map(Shape::Union),
            prop::collection::vec(inner.clone(), 0..4).prop_map(Shape::Record),
            inner.prop_map(|s| Shape::LinkedList(Box::new(s))),
        ]
    })
}

/// Renders a shape as schema JSON, numbering named types from `counter`.
fn render(shape: &Shape, counter: &mut usize) -> Json {
    let mut next_name = |prefix: &str| {
        *counter += 1;
        format!("{prefix}{counter}")
    };
    match shape {
        Shape::Primitive(name) => json!(name),
        Shape::Enum(count) => {
            let symbols: Vec<String> = (0..*count).map(|i| format!("S{i}")).collect();
            json!({"type": "enum", "name": next_name("E"), "symbols": symbols})
        }
        Shape::Fixed(size) => json!({"type": "fixed", "name": next_name("F"), "size": size}),
        Shape::Array(items) => json!({"type": "array", "items": render(items, counter)}),
        Shape::Map(values) => json!({"type": "map", "values": render(values, counter)}),
        Shape::Union(members) => {
            let mut seen = HashSet::new();
            let mut rendered = Vec::new();
            for member in members {
                if matches!(member, Shape::Union(_)) {
                    continue;
                }
                let json = render(member, counter);
                let key = match &json {
                    Json::String(s) => s.clone(),
                    Json::Object(obj) => obj
                        .get("name")
                        .or_else(|| obj.get("type"))
                        .map(Json::to_string)
                        .unwrap_or_default(),
                    other => other.to_string(),
                };
                if seen.insert(key) {
                    rendered.push(json);
                }
            }
            if rendered.is_empty() {
                rendered.push(json!("null"));
            }
            Json::Array(rendered)
        }
        Shape::Record(fields) => {
            let name = next_name("R");
            let fields: Vec<Json> = fields
                .iter()
                .enumerate()
                .map(|(i, f)| json!({"name": format!("f{i}"), "type": render(f, counter)}))
                .collect();
            json!({"type": "record", "name": name, "namespace": "gen", "fields": fields})
        }
        Shape::LinkedList(value) => {
            let name = next_name("L");
            json!({"type": "record", "name": name, "fields": [
                {"name": "value", "type": render(value, counter)},
                {"name": "next", "type": ["null", name]}
            ]})
        }
    }
}

fn arb_schema_json() -> impl Strategy<Value = String> {
    arb_shape().prop_map(|shape| render(&shape, &mut 0).to_string())
}

fn arb_policy() -> impl Strategy<Value = UnionPolicy> {
    prop_oneof![Just(UnionPolicy::LastNonNull), Just(UnionPolicy::First)]
}

proptest! {
    /// Property: serializing a parsed schema and parsing it again gives an
    /// equivalent graph.
    #[test]
    fn proptest_parse_roundtrip(text in arb_schema_json()) {
        let schema = parse_schema(&text).expect("generated schema should parse");
        let reparsed = parse_schema(&schema.to_json_string())
            .expect("serialized schema should parse");
        prop_assert!(schema.equivalent(&reparsed));
        prop_assert_eq!(schema.to_json(), reparsed.to_json());
    }

    /// Property: synthesized instances validate and survive the binary round
    /// trip under either union policy.
    #[test]
    fn proptest_synthesis_is_valid(text in arb_schema_json(), policy in arb_policy()) {
        let schema = parse_schema(&text).expect("generated schema should parse");
        let config = SynthConfig::new().union_policy(policy);
        let synthesis = Synthesizer::new(schema.graph(), config)
            .synthesize(schema.root())
            .expect("generated schema should synthesize");
        prop_assert!(validate(schema.graph(), schema.root(), &synthesis.value));
        let encoded = verify(schema.graph(), schema.root(), &synthesis.value);
        prop_assert!(encoded.is_ok(), "verify failed: {:?}", encoded.err());
    }

    /// Property: synthesis is deterministic.
    #[test]
    fn proptest_synthesis_is_deterministic(text in arb_schema_json(), policy in arb_policy()) {
        let schema = parse_schema(&text).expect("generated schema should parse");
        let synthesizer = Synthesizer::new(schema.graph(), SynthConfig::new().union_policy(policy));
        let first = synthesizer.synthesize(schema.root()).expect("synthesize");
        let second = synthesizer.synthesize(schema.root()).expect("synthesize");
        prop_assert_eq!(first, second);
    }

    /// Property: every cut names a record that is on its own chain.
    #[test]
    fn proptest_cuts_reenter_ancestry(text in arb_schema_json()) {
        let schema = parse_schema(&text).expect("generated schema should parse");
        let synthesis = Synthesizer::new(schema.graph(), SynthConfig::default())
            .synthesize(schema.root())
            .expect("synthesize");
        for cut in &synthesis.cuts {
            prop_assert!(cut.chain.contains(&cut.fullname));
        }
    }
}
