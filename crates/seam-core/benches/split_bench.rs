use criterion::{
    BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use seam_core::{DEFAULT_PIECE_CAPACITY, Splitter};

fn bench_split_default_capacity(c: &mut Criterion) {
    let blob = vec![0xAA; 4 * 1024 * 1024];

    let mut group = c.benchmark_group("split_default_capacity");
    group.throughput(Throughput::Bytes(blob.len() as u64));

    group.bench_function("split_4mib", |b| {
        let splitter = Splitter::default();
        b.iter(|| splitter.split(black_box(&blob)))
    });

    group.finish();
}

fn bench_split_by_capacity(c: &mut Criterion) {
    let blob = vec![0x42; 1024 * 1024];

    let capacities: Vec<(usize, &str)> = vec![
        (1024, "1_kib"),
        (4 * 1024, "4_kib"),
        (16 * 1024, "16_kib"),
        (DEFAULT_PIECE_CAPACITY, "64_kib"),
        (256 * 1024, "256_kib"),
    ];

    let mut group = c.benchmark_group("split_by_capacity");
    group.throughput(Throughput::Bytes(blob.len() as u64));

    for (capacity, name) in capacities {
        let splitter = Splitter::new(capacity).unwrap();
        group.bench_function(name, |b| b.iter(|| splitter.split(black_box(&blob))));
    }

    group.finish();
}

fn bench_split_by_blob_size(c: &mut Criterion) {
    let splitter = Splitter::default();

    let mut group = c.benchmark_group("split_by_blob_size");

    for size in [64 * 1024, 1024 * 1024, 16 * 1024 * 1024] {
        let blob = vec![0xCC; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &blob, |b, blob| {
            b.iter(|| splitter.split(black_box(blob)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_split_default_capacity,
    bench_split_by_capacity,
    bench_split_by_blob_size
);
criterion_main!(benches);
