//! Criterion benchmarks for `bcp-math`.
//!
//! Focus on the scatter-density pipeline: histogram then bicubic lookups.

use bcp_math::simplex::project_permuted;
use bcp_math::{BicubicGrid, Histogram2d, StudentT};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn synthetic_sample(n: usize) -> Vec<[f64; 3]> {
    // Deterministic low-discrepancy cloud on the simplex.
    (0..n)
        .map(|k| {
            let u = (k as f64 * 0.618_033_988_749_895).fract();
            let v = (k as f64 * 0.414_213_562_373_095).fract();
            let (u, v) = if u + v > 1.0 { (1.0 - u, 1.0 - v) } else { (u, v) };
            [u, v, 1.0 - u - v]
        })
        .collect()
}

fn bench_scatter_density(c: &mut Criterion) {
    let mut group = c.benchmark_group("scatter_density");
    for n in [1_000usize, 10_000, 50_000] {
        let points = project_permuted(&synthetic_sample(n), [0, 2, 1]);
        group.bench_with_input(BenchmarkId::new("histogram_30", n), &points, |b, pts| {
            b.iter(|| black_box(Histogram2d::from_points(black_box(pts), 30)));
        });

        let hist = Histogram2d::from_points(&points, 30).unwrap();
        let grid = BicubicGrid::new(&hist.x_centers(), &hist.y_centers(), hist.counts()).unwrap();
        group.bench_with_input(BenchmarkId::new("bicubic_eval", n), &points, |b, pts| {
            b.iter(|| {
                for p in pts.iter() {
                    black_box(grid.eval(p[0], p[1]));
                }
            });
        });
    }
    group.finish();
}

fn bench_student_t(c: &mut Criterion) {
    let t = StudentT::from_variance(9.0, 0.02, 0.0004);
    c.bench_function("student_t_ppf", |b| {
        b.iter(|| black_box(t.ppf(black_box(0.995))));
    });
}

criterion_group!(benches, bench_scatter_density, bench_student_t);
criterion_main!(benches);
