// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Core map operation benchmarks.
//!
//! Measures performance of:
//! - insert() - Point inserts with splits
//! - get() - Point lookups
//! - iter() - Full ascending scans
//! - remove() - Point removals with rebalancing
//!
//! ## Performance Targets
//! - insert: < 1µs per key at 100k keys
//! - get: < 500ns per lookup at 100k keys
//! - scan: < 50ns per entry
//! - remove: < 1µs per key at 100k keys

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use reedtree::{Order, TreeMap};

/// Generate a deterministic pseudo-random key sequence.
fn generate_keys(count: usize) -> Vec<u64> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    (0..count)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        })
        .collect()
}

fn populated_map(keys: &[u64]) -> TreeMap<u64, u64> {
    let mut map = TreeMap::new(Order::new(64).unwrap());
    for &key in keys {
        map.insert(key, key);
    }
    map
}

/// Benchmark insert() over shuffled keys.
fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for size in [1_000, 10_000, 100_000].iter() {
        let keys = generate_keys(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                black_box(populated_map(&keys));
            });
        });
    }

    group.finish();
}

/// Benchmark get() against a populated map.
fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");

    for size in [1_000, 10_000, 100_000].iter() {
        let keys = generate_keys(*size);
        let map = populated_map(&keys);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                for key in &keys {
                    black_box(map.get(key));
                }
            });
        });
    }

    group.finish();
}

/// Benchmark a full ascending scan.
fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");

    for size in [1_000, 10_000, 100_000].iter() {
        let keys = generate_keys(*size);
        let map = populated_map(&keys);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut checksum = 0u64;
                for (key, _) in map.iter() {
                    checksum = checksum.wrapping_add(*key);
                }
                black_box(checksum);
            });
        });
    }

    group.finish();
}

/// Benchmark remove() draining a populated map.
fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove");
    group.sample_size(20); // Each iteration rebuilds the map.

    for size in [1_000, 10_000].iter() {
        let keys = generate_keys(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter_batched(
                || populated_map(&keys),
                |mut map| {
                    for key in &keys {
                        black_box(map.remove(key));
                    }
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_get, bench_scan, bench_remove);
criterion_main!(benches);
