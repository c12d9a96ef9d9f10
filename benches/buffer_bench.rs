// benches/buffer_bench.rs
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use indirectbuf::prelude::*;
use std::hint::black_box;

fn bench_range_write_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_write_read");

    for size in [256usize, 4096, 65536].iter() {
        let payload = vec![0x5Au8; *size];
        group.bench_with_input(BenchmarkId::new("inline", size), size, |b, &size| {
            let mut buf = InlineBuffer::with_size(size).unwrap();
            let mut out = vec![0u8; size];
            b.iter(|| {
                buf.set_range(0, black_box(&payload));
                buf.get_range(0, black_box(&mut out));
            });
        });
        group.bench_with_input(BenchmarkId::new("host", size), size, |b, &size| {
            let mut buf = HostBuffer::with_size(size).unwrap();
            let mut out = vec![0u8; size];
            b.iter(|| {
                buf.set_range(0, black_box(&payload));
                buf.get_range(0, black_box(&mut out));
            });
        });
    }

    group.finish();
}

fn bench_move_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("move_range_overlapping");

    group.bench_function("inline", |b| {
        let mut buf = InlineBuffer::with_size(1 << 20).unwrap();
        b.iter(|| buf.move_range(black_box(1), black_box(0), (1 << 20) - 1));
    });

    group.bench_function("host", |b| {
        let mut buf = HostBuffer::with_size(1 << 20).unwrap();
        b.iter(|| buf.move_range(black_box(1), black_box(0), (1 << 20) - 1));
    });

    group.finish();
}

fn bench_concat(c: &mut Criterion) {
    let mut group = c.benchmark_group("concat");

    let parts: Vec<HostBuffer> = (0..16)
        .map(|_| HostBuffer::with_size(16 * 1024).unwrap())
        .collect();
    let refs: Vec<&HostBuffer> = parts.iter().collect();

    group.bench_function("host_16x16k", |b| {
        b.iter(|| HostBuffer::concat(black_box(&refs)).unwrap());
    });

    group.finish();
}

fn bench_element_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("element_access");

    group.bench_function("checked", |b| {
        let mut buf = InlineBuffer::with_size(4096).unwrap();
        b.iter(|| {
            for i in 0..4096 {
                buf.set(i, black_box(i as u8));
            }
        });
    });

    group.bench_function("unchecked", |b| {
        let mut buf = InlineBuffer::with_size(4096).unwrap();
        b.iter(|| {
            for i in 0..4096 {
                unsafe { buf.set_unchecked(i, black_box(i as u8)) };
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_range_write_read,
    bench_move_range,
    bench_concat,
    bench_element_access
);
criterion_main!(benches);
