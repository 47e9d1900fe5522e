//! Benchmarks for object pool rent/return.

#![allow(missing_docs, clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use mssql_driver_pool::ObjectPool;

fn bench_single(c: &mut Criterion) {
    let pool = ObjectPool::with_capacity(|| Vec::<u8>::with_capacity(512), 64).unwrap();

    c.bench_function("pool_get_drop", |b| {
        b.iter(|| {
            let mut buffer = pool.get();
            buffer.push(black_box(1));
            buffer.clear();
        });
    });
}

fn bench_batch(c: &mut Criterion) {
    let pool = ObjectPool::with_capacity(|| Vec::<u8>::with_capacity(512), 64).unwrap();
    let mut slots: Vec<Option<Vec<u8>>> = vec![None; 16];

    c.bench_function("pool_rent_return_16", |b| {
        b.iter(|| {
            pool.rent(black_box(&mut slots));
            pool.return_slots(&mut slots, true);
        });
    });

    c.bench_function("allocate_16", |b| {
        b.iter(|| {
            let buffers: Vec<Vec<u8>> = (0..16).map(|_| Vec::with_capacity(512)).collect();
            black_box(buffers);
        });
    });
}

criterion_group!(benches, bench_single, bench_batch);
criterion_main!(benches);
