//! Binary encoding benchmarks.

use avrosynth_bench::{LIST_SCHEMA, linked_list};
use avrosynth_core::EncoderBuffer;
use avrosynth_schema::{DatumReader, DatumWriter, parse_schema, validate};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn benchmark_varint(c: &mut Criterion) {
    let mut encoder = EncoderBuffer::with_capacity(64);

    c.bench_function("write_long_varint", |b| {
        b.iter(|| {
            encoder.clear();
            encoder.write_long(black_box(-0x1234_5678_9ABC));
        })
    });
}

fn benchmark_list(c: &mut Criterion) {
    let schema = parse_schema(LIST_SCHEMA).expect("Failed to parse schema");
    let writer = DatumWriter::new(schema.graph(), schema.root());
    let reader = DatumReader::new(schema.graph(), schema.root());
    let mut group = c.benchmark_group("linked_list");

    for len in [1usize, 16, 128] {
        let value = linked_list(len);
        let encoded = writer.encode(&value).expect("Failed to encode");

        group.bench_with_input(BenchmarkId::new("validate", len), &value, |b, v| {
            b.iter(|| validate(schema.graph(), schema.root(), black_box(v)))
        });
        group.bench_with_input(BenchmarkId::new("encode", len), &value, |b, v| {
            b.iter(|| writer.encode(black_box(v)))
        });
        group.bench_with_input(BenchmarkId::new("decode", len), &encoded, |b, bytes| {
            b.iter(|| reader.decode(black_box(bytes)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_varint, benchmark_list);
criterion_main!(benches);
