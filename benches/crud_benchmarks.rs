use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ranked_multiset::{Rank, SortedMultiset};
use std::collections::BTreeMap;
use std::hint::black_box;

const N: usize = 10_000;

// ─── Helper functions to generate value sequences ───────────────────────────

fn ordered_values(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn reverse_ordered_values(n: usize) -> Vec<i64> {
    (0..n as i64).rev().collect()
}

fn random_values(n: usize) -> Vec<i64> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut values = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        // Narrow range so duplicates occur.
        values.push(((x >> 33) % (n as u64 / 4)) as i64);
    }
    values
}

fn sequences() -> [(&'static str, Vec<i64>); 3] {
    [("ordered", ordered_values(N)), ("reverse", reverse_ordered_values(N)), ("random", random_values(N))]
}

// ─── Reference multisets ────────────────────────────────────────────────────

fn btree_insert(map: &mut BTreeMap<i64, usize>, v: i64) {
    *map.entry(v).or_default() += 1;
}

fn btree_remove(map: &mut BTreeMap<i64, usize>, v: i64) {
    if let Some(count) = map.get_mut(&v) {
        *count -= 1;
        if *count == 0 {
            map.remove(&v);
        }
    }
}

fn vec_insert(vec: &mut Vec<i64>, v: i64) {
    let at = vec.partition_point(|x| *x <= v);
    vec.insert(at, v);
}

fn vec_remove(vec: &mut Vec<i64>, v: i64) {
    let at = vec.partition_point(|x| *x < v);
    if vec.get(at) == Some(&v) {
        vec.remove(at);
    }
}

// ─── Insert Benchmarks ──────────────────────────────────────────────────────

fn bench_insert(c: &mut Criterion) {
    for (name, values) in sequences() {
        let mut group = c.benchmark_group(format!("insert_{name}"));

        group.bench_function(BenchmarkId::new("SortedMultiset", N), |b| {
            b.iter(|| {
                let mut set = SortedMultiset::new();
                for &v in &values {
                    set.insert(v);
                }
                set
            });
        });

        group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
            b.iter(|| {
                let mut map = BTreeMap::new();
                for &v in &values {
                    btree_insert(&mut map, v);
                }
                map
            });
        });

        group.bench_function(BenchmarkId::new("Vec", N), |b| {
            b.iter(|| {
                let mut vec = Vec::new();
                for &v in &values {
                    vec_insert(&mut vec, v);
                }
                vec
            });
        });

        group.finish();
    }
}

fn bench_bulk_load(c: &mut Criterion) {
    let values = random_values(N);
    let mut group = c.benchmark_group("bulk_load_random");

    group.bench_function(BenchmarkId::new("SortedMultiset", N), |b| {
        b.iter(|| values.iter().copied().collect::<SortedMultiset<i64>>());
    });

    group.bench_function(BenchmarkId::new("Vec", N), |b| {
        b.iter(|| {
            let mut vec = values.clone();
            vec.sort();
            vec
        });
    });

    group.finish();
}

// ─── Remove Benchmarks ──────────────────────────────────────────────────────

fn bench_remove(c: &mut Criterion) {
    for (name, values) in sequences() {
        let mut group = c.benchmark_group(format!("remove_{name}"));

        group.bench_function(BenchmarkId::new("SortedMultiset", N), |b| {
            b.iter_batched(
                || values.iter().copied().collect::<SortedMultiset<i64>>(),
                |mut set| {
                    for v in &values {
                        set.discard(v);
                    }
                    set
                },
                criterion::BatchSize::LargeInput,
            );
        });

        group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
            b.iter_batched(
                || {
                    let mut map = BTreeMap::new();
                    for &v in &values {
                        btree_insert(&mut map, v);
                    }
                    map
                },
                |mut map| {
                    for &v in &values {
                        btree_remove(&mut map, v);
                    }
                    map
                },
                criterion::BatchSize::LargeInput,
            );
        });

        group.bench_function(BenchmarkId::new("Vec", N), |b| {
            b.iter_batched(
                || {
                    let mut vec = values.clone();
                    vec.sort();
                    vec
                },
                |mut vec| {
                    for &v in &values {
                        vec_remove(&mut vec, v);
                    }
                    vec
                },
                criterion::BatchSize::LargeInput,
            );
        });

        group.finish();
    }
}

// ─── Rank Query Benchmarks ──────────────────────────────────────────────────

fn bench_rank_queries(c: &mut Criterion) {
    let values = random_values(N);
    let set: SortedMultiset<i64> = values.iter().copied().collect();
    let mut group = c.benchmark_group("rank_queries_random");

    group.bench_function(BenchmarkId::new("rank_lower", N), |b| {
        b.iter(|| {
            let mut total = 0;
            for v in &values {
                total += set.rank_lower(v);
            }
            black_box(total)
        });
    });

    group.bench_function(BenchmarkId::new("count", N), |b| {
        b.iter(|| {
            let mut total = 0;
            for v in &values {
                total += set.count(v);
            }
            black_box(total)
        });
    });

    group.bench_function(BenchmarkId::new("index_by_rank", N), |b| {
        b.iter(|| {
            let mut total = 0;
            for k in 0..set.len() {
                total += set[Rank(k)];
            }
            black_box(total)
        });
    });

    group.finish();
}

fn bench_remove_at_rank(c: &mut Criterion) {
    let values = random_values(N);
    let mut group = c.benchmark_group("remove_at_rank_middle");

    group.bench_function(BenchmarkId::new("SortedMultiset", N), |b| {
        b.iter_batched(
            || values.iter().copied().collect::<SortedMultiset<i64>>(),
            |mut set| {
                while !set.is_empty() {
                    let middle = (set.len() / 2) as isize;
                    black_box(set.remove_at_rank(middle).ok());
                }
                set
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.bench_function(BenchmarkId::new("Vec", N), |b| {
        b.iter_batched(
            || {
                let mut vec = values.clone();
                vec.sort();
                vec
            },
            |mut vec| {
                while !vec.is_empty() {
                    let middle = vec.len() / 2;
                    black_box(vec.remove(middle));
                }
                vec
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

// ─── Criterion Groups ───────────────────────────────────────────────────────

criterion_group!(insert_benches, bench_insert, bench_bulk_load,);

criterion_group!(remove_benches, bench_remove, bench_remove_at_rank,);

criterion_group!(query_benches, bench_rank_queries,);

criterion_main!(insert_benches, remove_benches, query_benches,);
