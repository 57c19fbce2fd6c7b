/// Benchmark module for the dataset transform pipeline.
/// Measures dataset building, statistics derivation, and histogram binning
/// over a synthetic full-size spreadsheet grid.
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use popviz::data::{builder, histogram, query, stats};

/// Build a grid the size of a real export: 300 countries x 65 year columns,
/// with a sprinkling of missing cells.
fn synthetic_grid() -> Vec<Vec<String>> {
    let mut grid = Vec::with_capacity(301);

    let mut header = vec!["Country".to_string()];
    header.extend((1960..=2024).map(|year: i32| year.to_string()));
    grid.push(header);

    for i in 0..300usize {
        let mut row = vec![format!("Country {}", i)];
        for (j, year) in (1960i64..=2024).enumerate() {
            if (i + j) % 17 == 0 {
                row.push(String::new());
            } else {
                row.push(((i as i64 + 1) * 100_000 + (year - 1960) * 1_000).to_string());
            }
        }
        grid.push(row);
    }

    grid
}

fn benchmark_build_dataset(c: &mut Criterion) {
    let grid = synthetic_grid();
    c.bench_function("build_dataset_300x65", |b| {
        b.iter(|| builder::build_dataset(black_box(&grid)).unwrap())
    });
}

fn benchmark_derive_stats(c: &mut Criterion) {
    let grid = synthetic_grid();
    let dataset = builder::build_dataset(&grid).unwrap();
    let record = &dataset.records()[0];
    let years = query::sorted_years(record);
    let values = query::valid_values(record);

    c.bench_function("derive_stats_65_values", |b| {
        b.iter(|| stats::derive_stats(black_box(&years), black_box(&values)).unwrap())
    });
}

fn benchmark_bin_values(c: &mut Criterion) {
    let grid = synthetic_grid();
    let dataset = builder::build_dataset(&grid).unwrap();
    let values = query::valid_values(&dataset.records()[0]);

    c.bench_function("bin_values_65_values", |b| {
        b.iter(|| histogram::bin_values(black_box(&values)).unwrap())
    });
}

criterion_group!(
    benches,
    benchmark_build_dataset,
    benchmark_derive_stats,
    benchmark_bin_values
);
criterion_main!(benches);
