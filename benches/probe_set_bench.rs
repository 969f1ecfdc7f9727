use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use probeset::{HardenedStrategy, ProbeSet, StrContent};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn bench_insert_fresh_100k(c: &mut Criterion) {
    c.bench_function("probe::insert_fresh_100k_u64", |b| {
        b.iter_batched(
            ProbeSet::<u64>::new,
            |mut s| {
                for x in lcg(1).take(100_000) {
                    s.insert(x);
                }
                black_box(s)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("probe::insert_fresh_100k_string_content", |b| {
        b.iter_batched(
            || ProbeSet::<String, StrContent>::with_strategy(StrContent),
            |mut s| {
                for x in lcg(1).take(100_000) {
                    s.insert(key(x));
                }
                black_box(s)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("probe::insert_fresh_100k_hardened", |b| {
        b.iter_batched(
            ProbeSet::<u64, HardenedStrategy>::default,
            |mut s| {
                for x in lcg(1).take(100_000) {
                    s.insert(x);
                }
                black_box(s)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_find_hit_miss_10k(c: &mut Criterion) {
    let keys: Vec<u64> = lcg(7).take(100_000).collect();
    let s: ProbeSet<u64> = keys.iter().copied().collect();

    c.bench_function("probe::contains_hit_10k_on_100k", |b| {
        let n = keys.len();
        let mut r = 0x9e3779b97f4a7c15u64;
        let queries: Vec<u64> = (0..10_000)
            .map(|_| {
                r = r.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                keys[(r as usize) % n]
            })
            .collect();
        b.iter(|| {
            for q in &queries {
                black_box(s.contains(q));
            }
        })
    });

    c.bench_function("probe::contains_miss_10k_on_100k", |b| {
        let queries: Vec<u64> = lcg(0xdead_beef).take(10_000).collect();
        b.iter(|| {
            for q in &queries {
                black_box(s.contains(q));
            }
        })
    });
}

fn bench_erase_churn(c: &mut Criterion) {
    c.bench_function("probe::insert_erase_churn_100k", |b| {
        b.iter_batched(
            || lcg(5).take(10_000).collect::<ProbeSet<u64>>(),
            |mut s| {
                for x in lcg(11).take(100_000) {
                    s.insert(x);
                    s.erase(&x);
                }
                black_box(s)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("probe::drain_by_erase_100k", |b| {
        b.iter_batched(
            || {
                let keys: Vec<u64> = lcg(13).take(100_000).collect();
                let s: ProbeSet<u64> = keys.iter().copied().collect();
                (s, keys)
            },
            |(mut s, keys)| {
                for k in &keys {
                    s.erase(k);
                }
                black_box(s)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_iter_and_algebra(c: &mut Criterion) {
    let a: ProbeSet<u64> = (0..100_000).collect();
    let b: ProbeSet<u64> = (50_000..150_000).collect();

    c.bench_function("probe::iter_all_100k", |bch| {
        bch.iter(|| {
            let mut sum = 0u64;
            for v in a.iter() {
                sum = sum.wrapping_add(*v);
            }
            black_box(sum)
        })
    });

    c.bench_function("probe::cursor_walk_100k", |bch| {
        bch.iter(|| {
            let mut sum = 0u64;
            let mut cur = a.begin();
            while let Some(v) = a.value_at(cur) {
                sum = sum.wrapping_add(*v);
                cur = a.next(cur);
            }
            black_box(sum)
        })
    });

    c.bench_function("probe::union_100k", |bch| bch.iter(|| black_box(a.union(&b))));
    c.bench_function("probe::intersection_100k", |bch| {
        bch.iter(|| black_box(a.intersection(&b)))
    });
    c.bench_function("probe::difference_100k", |bch| {
        bch.iter(|| black_box(a.difference(&b)))
    });
    c.bench_function("probe::is_subset_100k", |bch| {
        bch.iter(|| black_box(a.is_subset(&b)))
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_insert;
    config = bench_config();
    targets = bench_insert_fresh_100k
}
criterion_group! {
    name = benches_ops;
    config = bench_config();
    targets = bench_find_hit_miss_10k,
              bench_erase_churn,
              bench_iter_and_algebra
}
criterion_main!(benches_insert, benches_ops);
