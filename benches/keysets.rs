#![allow(missing_docs, clippy::missing_docs_in_private_items)]
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use keyset::{AvlTree, HashTable, KeySet, SplayTree, Strategy, random_keys};

const SIZES: [usize; 2] = [1_000, 10_000];
const SEED: u64 = 42;
const SAMPLE_SIZE: usize = 10;

/// Inserts every key, looks every key up, then deletes every key
fn workload(mut set: impl KeySet<u64>, keys: &[u64]) -> usize {
    for &key in keys {
        set.insert(key);
    }
    let found = keys.iter().filter(|&key| set.contains(key)).count();
    for key in keys {
        set.delete(key);
    }
    found
}

fn key_set_benches(c: &mut Criterion) {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut group = c.benchmark_group("Key set comparison benchmark");
    group.sample_size(SAMPLE_SIZE);
    for size in SIZES {
        let keys = random_keys(size, SEED);
        group.bench_with_input(BenchmarkId::new("avl tree", size), &keys, |b, keys| {
            b.iter(|| workload(AvlTree::new(), black_box(keys)));
        });
        group.bench_with_input(BenchmarkId::new("splay tree", size), &keys, |b, keys| {
            b.iter(|| workload(SplayTree::new(), black_box(keys)));
        });
        group.bench_with_input(BenchmarkId::new("chaining", size), &keys, |b, keys| {
            b.iter(|| workload(HashTable::new(size, Strategy::Chaining), black_box(keys)));
        });
        group.bench_with_input(BenchmarkId::new("quadratic probing", size), &keys, |b, keys| {
            b.iter(|| {
                workload(
                    HashTable::new(size, Strategy::QuadraticProbing),
                    black_box(keys),
                )
            });
        });
    }
    group.finish();
}

fn lookup_benches(c: &mut Criterion) {
    let keys = random_keys(10_000, SEED);
    let mut avl = AvlTree::new();
    let mut splay = SplayTree::new();
    let mut chained = HashTable::new(keys.len(), Strategy::Chaining);
    let mut probing = HashTable::new(keys.len(), Strategy::QuadraticProbing);
    avl.extend(keys.iter().copied());
    splay.extend(keys.iter().copied());
    chained.extend(keys.iter().copied());
    probing.extend(keys.iter().copied());

    let mut group = c.benchmark_group("Key set lookup benchmark");
    group.sample_size(SAMPLE_SIZE);
    group.bench_function("avl tree contains", |b| {
        b.iter(|| keys.iter().filter(|&key| avl.contains(key)).count());
    });
    group.bench_function("splay tree contains", |b| {
        b.iter(|| keys.iter().filter(|&key| splay.contains(key)).count());
    });
    group.bench_function("chaining contains", |b| {
        b.iter(|| keys.iter().filter(|&key| chained.contains(key)).count());
    });
    group.bench_function("quadratic probing contains", |b| {
        b.iter(|| keys.iter().filter(|&key| probing.contains(key)).count());
    });
    group.finish();
}

criterion_group!(benches, key_set_benches, lookup_benches);
criterion_main!(benches);
