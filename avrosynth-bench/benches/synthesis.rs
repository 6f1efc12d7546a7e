//! Parsing and synthesis benchmarks.

use avrosynth_bench::ORDER_SCHEMA;
use avrosynth_schema::parse_schema;
use avrosynth_synth::{SynthConfig, Synthesizer, UnionPolicy, verify};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn benchmark_parse(c: &mut Criterion) {
    c.bench_function("parse_order_schema", |b| {
        b.iter(|| parse_schema(black_box(ORDER_SCHEMA)))
    });
}

fn benchmark_synthesize(c: &mut Criterion) {
    let schema = parse_schema(ORDER_SCHEMA).expect("Failed to parse schema");
    let mut group = c.benchmark_group("synthesize_order");

    for policy in [UnionPolicy::LastNonNull, UnionPolicy::First] {
        let synthesizer = Synthesizer::new(schema.graph(), SynthConfig::new().union_policy(policy));
        group.bench_function(policy.name(), |b| {
            b.iter(|| synthesizer.synthesize(black_box(schema.root())))
        });
    }

    group.finish();
}

fn benchmark_synthesize_and_verify(c: &mut Criterion) {
    let schema = parse_schema(ORDER_SCHEMA).expect("Failed to parse schema");
    let synthesizer = Synthesizer::new(schema.graph(), SynthConfig::default());

    c.bench_function("synthesize_and_verify_order", |b| {
        b.iter(|| {
            let synthesis = synthesizer
                .synthesize(schema.root())
                .expect("Failed to synthesize");
            verify(schema.graph(), schema.root(), black_box(&synthesis.value))
        })
    });
}

criterion_group!(
    benches,
    benchmark_parse,
    benchmark_synthesize,
    benchmark_synthesize_and_verify
);
criterion_main!(benches);
