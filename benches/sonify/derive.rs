//! Benchmarks for deriving notes from a utilization vector.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use cpu_sonify::sonify::{derive_note, IndexPolicies, Voice};

use crate::CORE_COUNTS;

pub fn bench_derive_note(c: &mut Criterion) {
    let mut group = c.benchmark_group("sonify/derive_note");
    let policies = IndexPolicies::default();

    for &cores in CORE_COUNTS {
        let utilization: Vec<f32> = (0..cores).map(|i| (i * 37 % 101) as f32 + 0.4).collect();

        group.bench_with_input(BenchmarkId::new("in_range", cores), &cores, |b, _| {
            b.iter(|| {
                for i in 0..cores {
                    black_box(
                        derive_note(black_box(&utilization), Voice::per_core(i), policies, cores, 0.0)
                            .unwrap(),
                    );
                }
            })
        });

        // Every index misses and falls back
        group.bench_with_input(BenchmarkId::new("fallback", cores), &cores, |b, _| {
            b.iter(|| {
                black_box(
                    derive_note(black_box(&utilization), Voice::per_core(cores * 2), policies, 1, 0.0)
                        .unwrap(),
                );
            })
        });
    }

    group.finish();
}
