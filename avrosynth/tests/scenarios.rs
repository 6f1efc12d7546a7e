//! End-to-end scenarios: parse, synthesize, validate, encode.

use avrosynth::prelude::*;
use serde_json::json;

fn synthesize_default(text: &str) -> (Schema, Synthesis) {
    let schema = parse_schema(text).expect("Failed to parse schema");
    let synthesis = Synthesizer::new(schema.graph(), SynthConfig::default())
        .synthesize(schema.root())
        .expect("Failed to synthesize");
    (schema, synthesis)
}

#[test]
fn test_string_schema_yields_non_empty_string() {
    let (schema, synthesis) = synthesize_default(r#""string""#);
    let text = synthesis.value.as_str().expect("string value");
    assert!(!text.is_empty());
    assert!(validate(schema.graph(), schema.root(), &synthesis.value));
}

#[test]
fn test_int_array_yields_single_zero() {
    let (schema, synthesis) = synthesize_default(r#"{"type":"array","items":"int"}"#);
    assert_eq!(synthesis.value.to_json(), json!([0]));
    assert!(validate(schema.graph(), schema.root(), &synthesis.value));
    let encoded = verify(schema.graph(), schema.root(), &synthesis.value).expect("Failed to verify");
    assert_eq!(encoded.as_ref(), &[2, 0, 0]);
}

#[test]
fn test_union_examples_decode_to_themselves() {
    for (text, expected) in [
        (r#"["null","float","int"]"#, Value::Long(0)),
        (r#"["null","bytes","string"]"#, Value::from("string")),
    ] {
        let (schema, synthesis) = synthesize_default(text);
        assert_eq!(synthesis.value, expected);
        let encoded = verify(schema.graph(), schema.root(), &synthesis.value).expect("Failed to verify");
        let decoded = DatumReader::new(schema.graph(), schema.root())
            .decode(&encoded)
            .expect("Failed to decode");
        assert_eq!(decoded, synthesis.value, "{text}");
    }
}

#[test]
fn test_self_referential_node_cut_to_null() {
    let (schema, synthesis) = synthesize_default(
        r#"{"type":"record","name":"Node","fields":[{"name":"next","type":["null","Node"]}]}"#,
    );
    assert_eq!(synthesis.value.to_json(), json!({"next": null}));
    assert!(validate(schema.graph(), schema.root(), &synthesis.value));
    verify(schema.graph(), schema.root(), &synthesis.value).expect("Failed to verify");
}

#[test]
fn test_duplicate_enum_symbol_rejected() {
    let err = parse_schema(r#"{"type":"enum","name":"Color","symbols":["RED","RED"]}"#)
        .expect_err("duplicate symbol");
    assert!(matches!(err, SchemaParseError::DuplicateSymbol { ref symbol, .. } if symbol == "RED"));
}

#[test]
fn test_duplicate_field_rejected() {
    let err = parse_schema(
        r#"{"type":"record","name":"Pair","fields":[{"name":"a","type":"int"},{"name":"a","type":"string"}]}"#,
    )
    .expect_err("duplicate field");
    assert!(matches!(err, SchemaParseError::DuplicateField { ref field, .. } if field == "a"));
}

#[test]
fn test_mutual_recursion_terminates_with_ancestor_chain() {
    let (schema, synthesis) = synthesize_default(
        r#"{"type":"record","name":"Employee","namespace":"org","fields":[
            {"name":"name","type":"string"},
            {"name":"team","type":{"type":"record","name":"Team","fields":[
                {"name":"lead","type":["null","Employee"]},
                {"name":"members","type":{"type":"array","items":"Employee"}}
            ]}}
        ]}"#,
    );
    assert_eq!(
        synthesis.value.to_json(),
        json!({"name": "string", "team": {"lead": null, "members": []}})
    );
    assert_eq!(synthesis.cuts.len(), 2);
    for cut in &synthesis.cuts {
        assert_eq!(cut.fullname, "org.Employee");
        assert_eq!(cut.chain, vec!["org.Employee", "org.Team"]);
    }
    verify(schema.graph(), schema.root(), &synthesis.value).expect("Failed to verify");
}

#[test]
fn test_degenerate_cycle_reported_as_type_error() {
    let (schema, synthesis) = synthesize_default(
        r#"{"type":"record","name":"A","fields":[
            {"name":"b","type":{"type":"record","name":"B","fields":[{"name":"a","type":"A"}]}}
        ]}"#,
    );
    assert_eq!(synthesis.value.to_json(), json!({"b": {"a": "A"}}));
    assert!(!validate(schema.graph(), schema.root(), &synthesis.value));
    assert!(matches!(
        verify(schema.graph(), schema.root(), &synthesis.value),
        Err(SynthError::Type(_))
    ));
}

#[test]
fn test_duplicates_never_reach_synthesizer() {
    let invalid = [
        r#"{"type":"record","name":"R","fields":[{"name":"x","type":"int"},{"name":"x","type":"int"}]}"#,
        r#"{"type":"enum","name":"E","symbols":["A","B","A"]}"#,
        r#"{"type":"record","name":"Outer","fields":[
            {"name":"inner","type":{"type":"enum","name":"E","symbols":["X","X"]}}
        ]}"#,
    ];
    for text in invalid {
        assert!(parse_schema(text).is_err(), "accepted {text}");
        assert!(matches!(
            avrosynth::synth::synthesize_from_json(text, &SynthConfig::default()),
            Err(SynthError::Parse(_))
        ));
    }
}

#[test]
fn test_protocol_end_to_end() {
    let protocol = r#"{
        "protocol": "Catalog",
        "namespace": "com.shop.catalog",
        "types": [
            {"type": "fixed", "name": "Sku", "size": 8},
            {"type": "enum", "name": "Availability", "symbols": ["IN_STOCK", "BACKORDER"]},
            {"type": "record", "name": "Price", "fields": [
                {"name": "amount", "type": "double"},
                {"name": "currency", "type": "string"}
            ]},
            {"type": "record", "name": "ProductUpdated", "version": "2.1.0", "topic": "/catalog/product/updated", "fields": [
                {"name": "sku", "type": "Sku"},
                {"name": "availability", "type": "Availability"},
                {"name": "price", "type": ["null", "Price"], "default": null},
                {"name": "attributes", "type": {"type": "map", "values": "string"}},
                {"name": "thumbnail", "type": ["null", "bytes"]}
            ]}
        ]
    }"#;

    let outcomes = generate_from_protocol(protocol, &SynthConfig::default()).expect("Failed to run");
    assert_eq!(outcomes.len(), 1);
    let artifact = outcomes[0].artifact().expect("generated");
    assert_eq!(artifact.file_stem(), "com.shop.catalog.ProductUpdated");

    let example: serde_json::Value = serde_json::from_str(&artifact.example_text).expect("JSON");
    assert_eq!(
        example,
        json!({
            "sku": "\u{0}\u{0}\u{0}\u{0}\u{0}\u{0}\u{0}\u{0}",
            "availability": "IN_STOCK",
            "price": {"amount": 0.0, "currency": "string"},
            "attributes": {"key": "string"},
            "thumbnail": ""
        })
    );

    // The emitted pair must stand on its own.
    let schema = parse_schema(&artifact.schema_text).expect("Failed to parse emitted schema");
    let instance = Value::from_json(&example);
    assert!(validate(schema.graph(), schema.root(), &instance));
    let encoded = verify(schema.graph(), schema.root(), &instance).expect("Failed to verify");
    assert_eq!(encoded.len(), artifact.encoded_len);
}

#[test]
fn test_external_instance_reports_type_error() {
    let schema = parse_schema(r#"{"type":"record","name":"R","fields":[{"name":"n","type":"int"}]}"#)
        .expect("Failed to parse schema");
    let bad = Value::from_json(&json!({"n": "seven"}));
    let err = DatumWriter::new(schema.graph(), schema.root())
        .encode(&bad)
        .expect_err("string is not an int");
    assert_eq!(err.to_string(), r#"not a "int": "seven""#);
}
