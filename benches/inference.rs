use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use column_inference::inference::{infer, infer_table_with_options, InferenceOptions};
use column_inference::types::{Cell, Column, RawTable};

fn text_column(name: &str, rows: usize, f: impl Fn(usize) -> String) -> Column {
    Column::new(name, (0..rows).map(|i| Cell::Text(f(i))).collect())
}

fn wide_table(rows: usize) -> RawTable {
    RawTable::new(vec![
        text_column("flag", rows, |i| if i % 2 == 0 { "yes" } else { "no" }.to_string()),
        text_column("small", rows, |i| (i % 100).to_string()),
        text_column("big", rows, |i| (i * 7919).to_string()),
        text_column("ratio", rows, |i| format!("{}.25", i % 1000)),
        text_column("when", rows, |i| format!("2024-{:02}-{:02}", i % 12 + 1, i % 28 + 1)),
        text_column("label", rows, |i| format!("user-{i}")),
    ])
    .expect("bench table is well-formed")
}

fn bench_single_column(c: &mut Criterion) {
    let mut group = c.benchmark_group("infer_column");
    for rows in [1_000usize, 10_000] {
        let ints = text_column("n", rows, |i| (i * 31).to_string());
        group.bench_with_input(BenchmarkId::new("integers", rows), &ints, |b, col| {
            b.iter(|| infer(black_box(col)))
        });

        // Falls all the way through to object.
        let text = text_column("s", rows, |i| format!("row {i}"));
        group.bench_with_input(BenchmarkId::new("fallback", rows), &text, |b, col| {
            b.iter(|| infer(black_box(col)))
        });
    }
    group.finish();
}

fn bench_table(c: &mut Criterion) {
    let table = wide_table(10_000);
    let explicit = HashMap::new();
    let mut group = c.benchmark_group("infer_table");
    for parallel in [false, true] {
        let options = InferenceOptions {
            parallel,
            ..Default::default()
        };
        group.bench_function(if parallel { "parallel" } else { "sequential" }, |b| {
            b.iter(|| infer_table_with_options(black_box(&table), &explicit, &options))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_column, bench_table);
criterion_main!(benches);
