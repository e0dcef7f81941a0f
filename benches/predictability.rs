//! Benchmarks for alignment and the full predictability analysis.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pretrace::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn synthetic(n_docs: usize, n_layouts: usize) -> (LayoutSet, DecisionMatrix) {
    let mut rng = StdRng::seed_from_u64(2024);
    let layouts = (0..n_layouts)
        .map(|_| {
            Layout::from_rows((0..n_docs).map(|d| {
                let p: Point = [rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)];
                (format!("doc{d}"), p)
            }))
        })
        .collect();
    let columns = (0..5)
        .map(|k| {
            let labels = (0..n_layouts).map(|_| u8::from(rng.gen_bool(0.5))).collect();
            (format!("decision{k}"), labels)
        })
        .collect();
    (
        LayoutSet::new(layouts).unwrap(),
        DecisionMatrix::from_columns(columns).unwrap(),
    )
}

fn bench_align_layouts(c: &mut Criterion) {
    let mut group = c.benchmark_group("align_layouts");

    for n_docs in [10, 100, 1000].iter() {
        let (layouts, _) = synthetic(*n_docs, 16);
        group.bench_with_input(BenchmarkId::from_parameter(n_docs), n_docs, |b, _| {
            b.iter(|| align_layouts(black_box(&layouts), 0).unwrap());
        });
    }

    group.finish();
}

fn bench_predictability(c: &mut Criterion) {
    let mut group = c.benchmark_group("predictability");

    for n_docs in [10, 50, 200].iter() {
        let (layouts, decisions) = synthetic(*n_docs, 32);

        for parallel in [false, true] {
            let analysis =
                PredictabilityAnalysis::new(PredictabilityConfig::default().with_parallel(parallel))
                    .unwrap();
            let id = format!("{}/{}", if parallel { "parallel" } else { "sequential" }, n_docs);
            group.bench_function(id, |b| {
                b.iter(|| analysis.run(black_box(&layouts), black_box(&decisions)).unwrap());
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_align_layouts, bench_predictability);
criterion_main!(benches);
