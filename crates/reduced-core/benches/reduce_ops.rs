//! Kernel throughput across backends
//!
//! Complements the `reduced` binary's sustained-bandwidth report with
//! criterion's statistics for the scalar and matrix reductions.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use reduced_backends::{create_backend, AnyBackend, BackendType};
use reduced_core::ops::{linalg, reduce};
use reduced_core::{init, Buffer, MatrixShape, ProblemSize};

fn backends() -> Vec<AnyBackend> {
    [BackendType::Serial, BackendType::Cpu]
        .into_iter()
        .filter_map(|t| create_backend(t, None).ok())
        .collect()
}

fn benchmark_dot(c: &mut Criterion) {
    let mut group = c.benchmark_group("dot");

    for n in [1_024usize, 65_536, 1_048_576] {
        group.throughput(Throughput::Bytes((16 * n) as u64));
        for backend in backends() {
            let size = ProblemSize::new(n).unwrap();
            let (a, b) = init::dot_inputs(&backend, size);
            group.bench_with_input(BenchmarkId::new(backend.to_string(), n), &n, |bench, _| {
                bench.iter(|| black_box(reduce::dot(&backend, &a, &b).unwrap()));
            });
        }
    }

    group.finish();
}

fn benchmark_describe(c: &mut Criterion) {
    let mut group = c.benchmark_group("describe");

    for n in [1_024usize, 1_048_576] {
        group.throughput(Throughput::Bytes((16 * n) as u64));
        for backend in backends() {
            let d = init::describe_input(&backend, ProblemSize::new(n).unwrap());
            group.bench_with_input(BenchmarkId::new(backend.to_string(), n), &n, |bench, _| {
                bench.iter(|| black_box(reduce::describe(&backend, &d).unwrap()));
            });
        }
    }

    group.finish();
}

fn benchmark_histogram(c: &mut Criterion) {
    let mut group = c.benchmark_group("histogram");

    for n in [65_536usize, 4_194_304] {
        group.throughput(Throughput::Bytes((4 * n) as u64));
        for backend in backends() {
            let values = init::histogram_input(&backend, ProblemSize::new(n).unwrap());
            group.bench_with_input(BenchmarkId::new(backend.to_string(), n), &n, |bench, _| {
                bench.iter(|| black_box(reduce::histogram(&backend, &values).unwrap()));
            });
        }
    }

    group.finish();
}

fn benchmark_matvec(c: &mut Criterion) {
    let mut group = c.benchmark_group("matvec");

    for (rows, cols) in [(256usize, 4_096usize), (4_096, 256)] {
        let shape = MatrixShape::new(rows, cols).unwrap();
        group.throughput(Throughput::Bytes((8 * (rows * cols + rows + cols)) as u64));
        for backend in backends() {
            let (a, x) = init::matvec_inputs(&backend, shape);
            let mut r = Buffer::zeroed(rows);
            let label = format!("{shape}");

            group.bench_function(BenchmarkId::new(format!("group/{backend}"), &label), |bench| {
                bench.iter(|| linalg::matvec_group(&backend, &a, &x, &shape, &mut r).unwrap());
            });
            group.bench_function(BenchmarkId::new(format!("inner_product/{backend}"), &label), |bench| {
                bench.iter(|| linalg::matvec_inner_product(&backend, &a, &x, &shape, &mut r).unwrap());
            });
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_dot,
    benchmark_describe,
    benchmark_histogram,
    benchmark_matvec
);
criterion_main!(benches);
