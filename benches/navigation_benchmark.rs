//! End-to-end navigation benchmarks.
//!
//! Measures a full jump, from `scroll_to_item` until the simulated host goes
//! idle, at several distances into a list of random-height rows.
//!
//! Run with: cargo bench --bench navigation_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use vlist::config::Settings;
use vlist::engine::ListEngine;
use vlist::host::{random_heights, SimulatedHost};
use vlist::model::ItemId;
use vlist::view_state::types::Alignment;

const ITEM_COUNT: usize = 10_000;

/// Engine and host after the initial load has settled.
fn loaded() -> (ListEngine, SimulatedHost) {
    let heights = random_heights(ITEM_COUNT, 20.0, 60.0, 11);
    let ids: Vec<ItemId> = (0..ITEM_COUNT)
        .map(|i| ItemId::new(format!("item-{i}")))
        .collect();

    let mut engine = ListEngine::new(Settings::default());
    let mut host = SimulatedHost::new(engine.settings().container_id(), heights, 500.0);
    let mut commands = engine.start();
    commands.extend(engine.set_items(ids));
    host.run(&mut engine, commands)
        .expect("initial load should settle");
    (engine, host)
}

fn bench_scroll_to_item(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroll_to_item");
    let baseline = loaded();

    for target in [10, 1_000, 5_000, ITEM_COUNT - 1] {
        let id = format!("item-{target}");
        group.bench_with_input(BenchmarkId::from_parameter(target), &id, |b, id| {
            b.iter_batched(
                || baseline.clone(),
                |(mut engine, mut host)| {
                    let commands = engine.scroll_to_item(id.as_str(), Alignment::Center);
                    black_box(host.run(&mut engine, commands))
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scroll_to_item);
criterion_main!(benches);
