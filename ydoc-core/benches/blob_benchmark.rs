use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ydoc_core::BlobDocument;

fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

fn bench_set_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("Blob content");

    for len in [64usize, 4 * 1024, 256 * 1024] {
        let bytes = payload(len);
        group.throughput(Throughput::Bytes(len as u64));

        group.bench_with_input(BenchmarkId::new("set", len), &bytes, |b, bytes| {
            // Each set lands in the same field, so the document does not grow unbounded
            let blob = BlobDocument::new();
            b.iter(|| blob.set(black_box(bytes.as_slice())).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("get", len), &bytes, |b, bytes| {
            let blob = BlobDocument::new();
            blob.set(bytes.as_slice()).unwrap();
            b.iter(|| black_box(blob.get().unwrap()))
        });
    }

    group.finish();
}

fn bench_apply_remote(c: &mut Criterion) {
    let mut group = c.benchmark_group("Blob replication");
    group.throughput(Throughput::Elements(1));

    let source = BlobDocument::new();
    source.set(payload(4 * 1024).as_slice()).unwrap();
    let update = source.base().encode_state_as_update(None).unwrap();

    group.bench_function("apply_remote_update", |b| {
        // Re-applying the same update is idempotent
        let dest = BlobDocument::new();
        b.iter(|| dest.base().apply_update(black_box(&update)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_set_get, bench_apply_remote);
criterion_main!(benches);
