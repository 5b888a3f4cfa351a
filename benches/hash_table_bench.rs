use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use probe_table::{HashTable, ProbingPolicy, Record, MAX_ID, MIN_ID};
use std::time::Duration;

// Insert and lookup scan every slot, so sizes stay in the low thousands.
const N: usize = 2_000;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn record(n: u64) -> Record {
    let span = u64::from(MAX_ID - MIN_ID + 1);
    Record::new(format!("k{:016x}", n), MIN_ID + (n % span) as u32)
}

fn fnv1a(key: &str) -> u64 {
    key.bytes().fold(0xcbf2_9ce4_8422_2325u64, |h, b| {
        (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    })
}

fn filled(seed: u64, policy: ProbingPolicy) -> (HashTable<fn(&str) -> u64>, Vec<Record>) {
    let mut t = HashTable::new(101, fnv1a as fn(&str) -> u64, policy);
    let recs: Vec<Record> = lcg(seed).take(N).map(record).collect();
    for r in &recs {
        t.insert(r.clone()).expect("insert ok");
    }
    (t, recs)
}

fn bench_insert_fresh(c: &mut Criterion) {
    for policy in ProbingPolicy::ALL {
        c.bench_function(&format!("table::insert_fresh_2k/{policy}"), |b| {
            b.iter_batched(
                || lcg(1).take(N).map(record).collect::<Vec<_>>(),
                |recs| {
                    let mut t = HashTable::new(101, fnv1a, policy);
                    for r in recs {
                        t.insert(r).expect("insert ok");
                    }
                    black_box(t)
                },
                BatchSize::SmallInput,
            )
        });
    }
}

fn bench_remove_half(c: &mut Criterion) {
    for policy in [ProbingPolicy::Linear, ProbingPolicy::DoubleHash] {
        c.bench_function(&format!("table::remove_half_of_2k/{policy}"), |b| {
            b.iter_batched(
                || filled(5, policy),
                |(mut t, recs)| {
                    for r in recs.iter().step_by(2) {
                        black_box(t.remove(r));
                    }
                    black_box(t)
                },
                BatchSize::SmallInput,
            )
        });
    }
}

fn bench_lookup(c: &mut Criterion) {
    c.bench_function("table::lookup_hit_1k", |b| {
        let (t, recs) = filled(7, ProbingPolicy::DoubleHash);
        b.iter(|| {
            for r in recs.iter().take(1_000) {
                black_box(t.lookup(r.key(), r.serial()));
            }
        })
    });

    c.bench_function("table::find_index_1k", |b| {
        let (t, recs) = filled(11, ProbingPolicy::DoubleHash);
        b.iter(|| {
            for r in recs.iter().take(1_000) {
                black_box(t.find_index(r.key()));
            }
        })
    });
}

fn bench_rehash(c: &mut Criterion) {
    c.bench_function("table::rehash_2k", |b| {
        b.iter_batched(
            || filled(13, ProbingPolicy::Linear).0,
            |mut t| {
                t.rehash();
                black_box(t)
            },
            BatchSize::SmallInput,
        )
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
    targets = bench_insert_fresh
}
criterion_group! {
    name = benches_ops;
    config = bench_config();
    targets = bench_remove_half, bench_lookup, bench_rehash
}
criterion_main!(benches_insert, benches_ops);
