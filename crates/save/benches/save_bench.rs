//! Save/load codec benchmarks at different schedule table sizes.
//!
//! Run with: `cargo bench -p save --bench save_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use realtime::citizen::BuildingId;
use realtime::time_of_day::GameClock;
use realtime::work_schedule::{WorkScheduleRecord, WorkScheduleStore};
use realtime::Saveable;
use save::{decode_save, encode_save, SaveData, CURRENT_SAVE_VERSION};

// ---------------------------------------------------------------------------
// Helpers: build synthetic SaveData at various scales
// ---------------------------------------------------------------------------

const SIZES: [u32; 4] = [1_000, 10_000, 50_000, 200_000];

fn build_synthetic_save(buildings: u32) -> SaveData {
    let mut store = WorkScheduleStore::default();
    for id in 0..buildings {
        store.set(
            BuildingId(id),
            WorkScheduleRecord {
                works_at_night: id % 3 == 0,
                works_on_weekends: id % 5 == 0,
                has_extended_shift: id % 11 == 0,
                has_continuous_shift: id % 7 == 0,
                shift_count: (id % 3 + 1) as u8,
            },
        );
    }

    let mut save = SaveData {
        version: CURRENT_SAVE_VERSION,
        extensions: Default::default(),
    };
    if let Some(bytes) = store.save_to_bytes() {
        save.extensions
            .insert(WorkScheduleStore::SAVE_KEY.to_string(), bytes);
    }
    if let Some(bytes) = GameClock::default().save_to_bytes() {
        save.extensions.insert(GameClock::SAVE_KEY.to_string(), bytes);
    }
    save
}

// ---------------------------------------------------------------------------
// 1. BITCODE ENCODE / DECODE
// ---------------------------------------------------------------------------

fn bench_bitcode(c: &mut Criterion) {
    let mut group = c.benchmark_group("save_bitcode");

    for &count in &SIZES {
        let save = build_synthetic_save(count);
        let encoded = save.encode();
        group.bench_with_input(
            BenchmarkId::new("encode", format!("{count}_buildings")),
            &save,
            |b, save| b.iter(|| black_box(save.encode())),
        );
        group.bench_with_input(
            BenchmarkId::new("decode", format!("{count}_buildings")),
            &encoded,
            |b, bytes| b.iter(|| black_box(SaveData::decode(bytes).unwrap())),
        );
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// 2. LZ4
// ---------------------------------------------------------------------------

fn bench_lz4(c: &mut Criterion) {
    let mut group = c.benchmark_group("save_lz4");

    for &count in &SIZES {
        let encoded = build_synthetic_save(count).encode();
        let compressed = lz4_flex::compress_prepend_size(&encoded);
        group.bench_with_input(
            BenchmarkId::new("compress", format!("{count}_buildings")),
            &encoded,
            |b, bytes| b.iter(|| black_box(lz4_flex::compress_prepend_size(bytes))),
        );
        group.bench_with_input(
            BenchmarkId::new("decompress", format!("{count}_buildings")),
            &compressed,
            |b, bytes| b.iter(|| black_box(lz4_flex::decompress_size_prepended(bytes).unwrap())),
        );
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// 3. FULL FILE PIPELINES (header + checksum included)
// ---------------------------------------------------------------------------

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("save_full_pipeline");
    group.sample_size(20);

    for &count in &SIZES {
        let save = build_synthetic_save(count);
        let file = encode_save(&save).unwrap();
        group.bench_with_input(
            BenchmarkId::new("encode_save", format!("{count}_buildings")),
            &save,
            |b, save| b.iter(|| black_box(encode_save(save).unwrap().len())),
        );
        group.bench_with_input(
            BenchmarkId::new("decode_save", format!("{count}_buildings")),
            &file,
            |b, bytes| b.iter(|| black_box(decode_save(bytes).unwrap().extensions.len())),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_bitcode, bench_lz4, bench_full_pipeline);
criterion_main!(benches);
