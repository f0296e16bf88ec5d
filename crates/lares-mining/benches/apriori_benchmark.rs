//! Benchmarks for basket construction, frequent-itemset mining and rule
//! generation over synthetic usage snapshots.

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lares_core::params::MiningParams;
use lares_core::record::UsageEvent;
use lares_mining::apriori::mine_frequent;
use lares_mining::basket::BasketTable;
use lares_mining::rules::generate_rules;
use lares_mining::store::MemoryStore;
use lares_mining::window::WindowSpec;
use lares_mining::PatternMiner;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// Synthetic snapshot: one basket per actor-window, where a third of the
/// baskets contain a planted correlated trio and the rest draw devices
/// uniformly. The planted structure keeps the itemset lattice non-trivial.
fn synthetic_events(baskets: usize, alphabet: u32, seed: u64) -> Vec<UsageEvent> {
    let mut rng = StdRng::seed_from_u64(seed);
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let mut events = Vec::new();
    let mut usage_id = 0;

    for i in 0..baskets {
        let actor_id = (i % 50) as u64 + 1;
        let start = base + Duration::minutes(15 * (i / 50) as i64);
        let mut push = |device: u32, events: &mut Vec<UsageEvent>| {
            usage_id += 1;
            events.push(UsageEvent::new(
                usage_id,
                device as u64,
                actor_id,
                format!("Device {device:02}"),
                start,
            ));
        };

        if rng.gen_bool(0.33) {
            for device in 0..3 {
                push(device, &mut events);
            }
        }
        let extras = rng.gen_range(1..=3);
        for _ in 0..extras {
            push(rng.gen_range(0..alphabet), &mut events);
        }
    }
    events
}

fn bench_basket_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("basket_build");
    let spec = WindowSpec::quarter_hour();

    for baskets in [100, 1_000, 5_000] {
        let events = synthetic_events(baskets, 20, 42);
        group.bench_with_input(BenchmarkId::from_parameter(baskets), &events, |b, events| {
            b.iter(|| black_box(BasketTable::build(events, &spec)));
        });
    }

    group.finish();
}

fn bench_mine_frequent(c: &mut Criterion) {
    let mut group = c.benchmark_group("mine_frequent");
    let spec = WindowSpec::quarter_hour();

    for baskets in [100, 1_000, 5_000] {
        let events = synthetic_events(baskets, 20, 42);
        let table = BasketTable::build(&events, &spec);
        group.bench_with_input(BenchmarkId::new("support_0.10", baskets), &table, |b, table| {
            b.iter(|| black_box(mine_frequent(table, 0.10).unwrap().len()));
        });
        group.bench_with_input(BenchmarkId::new("support_0.05", baskets), &table, |b, table| {
            b.iter(|| black_box(mine_frequent(table, 0.05).unwrap().len()));
        });
    }

    group.finish();
}

fn bench_generate_rules(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_rules");
    let spec = WindowSpec::quarter_hour();

    for baskets in [1_000, 5_000] {
        let events = synthetic_events(baskets, 20, 42);
        let table = BasketTable::build(&events, &spec);
        let frequent = mine_frequent(&table, 0.05).unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(baskets),
            &(frequent, table),
            |b, (frequent, table)| {
                b.iter(|| black_box(generate_rules(frequent, table.catalog(), 0.3).len()));
            },
        );
    }

    group.finish();
}

fn bench_mine_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("mine_snapshot");

    for baskets in [100, 1_000, 5_000] {
        let events = synthetic_events(baskets, 20, 42);
        let miner = PatternMiner::new(Arc::new(MemoryStore::default()))
            .with_params(MiningParams::default().with_min_support(0.05));
        group.bench_with_input(BenchmarkId::from_parameter(baskets), &events, |b, events| {
            b.iter(|| black_box(miner.mine_snapshot(events).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_basket_build,
    bench_mine_frequent,
    bench_generate_rules,
    bench_mine_snapshot,
);
criterion_main!(benches);
