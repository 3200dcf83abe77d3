//! Criterion benchmark: one simulated hour of the full `FixedUpdate` chain
//! with a populated schedule table.
//!
//! Run with: cargo bench -p realtime --bench session_tick_bench --features bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

use realtime::citizen::BuildingId;
use realtime::test_harness::TestSession;
use realtime::work_schedule::WorkScheduleRecord;

fn create_benchmark_session(buildings: u32) -> TestSession {
    let mut session = TestSession::new().at(1, 6);
    for id in 1..=buildings {
        session = session.with_schedule(
            BuildingId(id),
            WorkScheduleRecord {
                works_at_night: id % 4 == 0,
                shift_count: (id % 3 + 1) as u8,
                ..Default::default()
            },
        );
    }
    session
}

fn bench_hour(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_hour");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(20));

    for buildings in [1_000u32, 10_000, 50_000] {
        let mut session = create_benchmark_session(buildings);
        group.bench_with_input(BenchmarkId::from_parameter(buildings), &buildings, |b, _| {
            b.iter(|| {
                session.tick_hours(1);
                session.drain_handovers().len()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hour);
criterion_main!(benches);
