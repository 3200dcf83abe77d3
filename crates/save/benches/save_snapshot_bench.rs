//! Snapshot/restore benchmark against a live session world.
//!
//! Measures `World -> SaveData -> file bytes` and the reverse path with
//! every real-time plugin registered.
//!
//! Run with: `cargo bench -p save --bench save_snapshot_bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bevy::prelude::*;
use realtime::citizen::BuildingId;
use realtime::work_schedule::{WorkScheduleRecord, WorkScheduleStore};
use realtime::RealTimePlugin;
use save::{load_world, save_world, snapshot_world, SavePlugin};

const BUILDINGS: u32 = 20_000;

fn session_world() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins((RealTimePlugin, SavePlugin));
    app.finish();
    app.cleanup();

    let mut store = app.world_mut().resource_mut::<WorkScheduleStore>();
    for id in 1..=BUILDINGS {
        store.set(
            BuildingId(id),
            WorkScheduleRecord {
                works_at_night: id % 2 == 0,
                shift_count: 2,
                ..Default::default()
            },
        );
    }
    app
}

fn bench_snapshot(c: &mut Criterion) {
    let app = session_world();
    let mut group = c.benchmark_group("session_snapshot");

    group.bench_function("snapshot_world", |b| {
        b.iter(|| black_box(snapshot_world(app.world()).unwrap().extensions.len()))
    });
    group.bench_function("save_world", |b| {
        b.iter(|| black_box(save_world(app.world()).unwrap().len()))
    });
    group.finish();
}

fn bench_restore(c: &mut Criterion) {
    let source = session_world();
    let bytes = save_world(source.world()).unwrap();

    let mut target = session_world();
    c.bench_function("session_restore/load_world", |b| {
        b.iter(|| black_box(load_world(target.world_mut(), &bytes).unwrap().version))
    });
}

criterion_group!(benches, bench_snapshot, bench_restore);
criterion_main!(benches);
