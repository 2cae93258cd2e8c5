// Dweve HED - Hierarchical Event Descriptor validation
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Parsing benchmarks.
//!
//! Measures tokenization alone, full single-string parsing, and batch
//! parsing with and without the rayon fan-out.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hed_core::lex::tokenize;
use hed_core::{parse, parse_many, Limits, ParseOptions};
use hed_test::fixtures::{self, builders::HedStringBuilder};

fn annotation(groups: usize) -> String {
    let mut builder = HedStringBuilder::new().tag("Sensory-event");
    for i in 0..groups {
        builder = match i % 3 {
            0 => builder.group(&["Red", "Item/Object/Man-made-object/Device/Computer-screen"]),
            1 => builder.group(&["Width/5 mm", "Label/Trial-1"]),
            _ => builder.onset_with("MyDef", &["Blue", "Walk"]),
        };
    }
    builder.build()
}

// ============================================================================
// Tokenizer Benchmarks
// ============================================================================

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");
    let limits = Limits::default();

    for size in [1, 10, 100] {
        let input = annotation(size);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| tokenize(black_box(input), &limits))
        });
    }

    group.finish();
}

// ============================================================================
// Parse Benchmarks
// ============================================================================

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    let schemas = fixtures::schemas();
    let options = ParseOptions::default();

    for size in [1, 10, 100] {
        let input = annotation(size);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| parse(black_box(input), &schemas, &options))
        });
    }

    group.finish();
}

fn bench_parse_many(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_many");
    let schemas = fixtures::schemas();
    let rows: Vec<String> = (0..1_000).map(|i| annotation(i % 8)).collect();
    group.throughput(Throughput::Elements(rows.len() as u64));

    let serial = ParseOptions::builder().parallel_threshold(usize::MAX).build();
    let parallel = ParseOptions::default();
    group.bench_function("serial", |b| b.iter(|| parse_many(black_box(&rows), &schemas, &serial)));
    group.bench_function("parallel", |b| {
        b.iter(|| parse_many(black_box(&rows), &schemas, &parallel))
    });

    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_parse, bench_parse_many);
criterion_main!(benches);
