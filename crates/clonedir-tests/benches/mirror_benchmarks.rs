//! Mirror benchmarks
//!
//! Measures fingerprinting throughput and full mirror runs over generated
//! trees, both on a cold destination and on an already converged one.

use clonedir_sync::{fingerprint, MirrorEngine, MirrorOptions, MirrorRequest, NoopObserver};
use clonedir_tests::test_utils::{create_wide_tree, generate_test_data, TestDataPattern};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use std::fs;
use std::hint::black_box;
use tempfile::TempDir;

fn bench_fingerprint(c: &mut Criterion) {
    let mut group = c.benchmark_group("fingerprint");
    let temp_dir = TempDir::new().unwrap();

    for size in [1024usize, 64 * 1024, 1024 * 1024] {
        let path = temp_dir.path().join(format!("file_{size}.bin"));
        fs::write(&path, generate_test_data(size, TestDataPattern::Random)).unwrap();

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &path, |b, path| {
            b.iter(|| fingerprint(black_box(path)).unwrap());
        });
    }

    group.finish();
}

fn bench_mirror(c: &mut Criterion) {
    let mut group = c.benchmark_group("mirror");
    group.sample_size(20);

    for (dirs, files) in [(4usize, 16usize), (16, 32)] {
        let source = TempDir::new().unwrap();
        create_wide_tree(source.path(), dirs, files, 2048);
        let label = format!("{dirs}x{files}");

        group.bench_function(BenchmarkId::new("cold", &label), |b| {
            b.iter_batched(
                || TempDir::new().unwrap(),
                |dest| {
                    let request = MirrorRequest::new(source.path(), [dest.path()]);
                    MirrorEngine::new().run(&request, &mut NoopObserver).unwrap();
                },
                BatchSize::PerIteration,
            );
        });

        let dest = TempDir::new().unwrap();
        let request = MirrorRequest::new(source.path(), [dest.path()]);
        MirrorEngine::new().run(&request, &mut NoopObserver).unwrap();

        group.bench_function(BenchmarkId::new("converged", &label), |b| {
            b.iter(|| MirrorEngine::new().run(&request, &mut NoopObserver).unwrap());
        });

        let unconditional = MirrorEngine::with_options(MirrorOptions::without_checksum());
        group.bench_function(BenchmarkId::new("without_checksum", &label), |b| {
            b.iter(|| unconditional.run(&request, &mut NoopObserver).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fingerprint, bench_mirror);
criterion_main!(benches);
