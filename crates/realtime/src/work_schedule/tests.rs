use bevy::prelude::*;

use super::*;
use crate::citizen::BuildingId;
use crate::Saveable;

fn record(
    night: bool,
    weekends: bool,
    extended: bool,
    continuous: bool,
    shifts: u8,
) -> WorkScheduleRecord {
    WorkScheduleRecord {
        works_at_night: night,
        works_on_weekends: weekends,
        has_extended_shift: extended,
        has_continuous_shift: continuous,
        shift_count: shifts,
    }
}

// -------------------------------------------------------------------------
// Record normalization
// -------------------------------------------------------------------------

#[test]
fn test_default_record() {
    assert_eq!(
        WorkScheduleRecord::default(),
        record(false, false, false, false, 1)
    );
    assert!(WorkScheduleRecord::default().is_normalized());
}

#[test]
fn test_max_shift_count_table() {
    assert_eq!(record(false, false, false, false, 1).max_shift_count(), 2);
    assert_eq!(record(true, false, false, false, 1).max_shift_count(), 3);
    assert_eq!(record(false, false, false, true, 1).max_shift_count(), 1);
    assert_eq!(record(true, false, false, true, 1).max_shift_count(), 2);
}

#[test]
fn test_normalized_clamps_shift_count() {
    assert_eq!(record(false, false, false, false, 3).normalized().shift_count, 2);
    assert_eq!(record(true, false, false, false, 9).normalized().shift_count, 3);
    assert_eq!(record(false, false, false, false, 0).normalized().shift_count, 1);
    assert_eq!(record(false, false, false, true, 3).normalized().shift_count, 1);
    assert_eq!(record(true, false, false, true, 3).normalized().shift_count, 2);
}

#[test]
fn test_normalized_extended_wins_over_continuous() {
    let r = record(true, false, true, true, 3).normalized();
    assert!(r.has_extended_shift);
    assert!(!r.has_continuous_shift);
    // Back to the non-continuous limit.
    assert_eq!(r.shift_count, 3);
}

#[test]
fn test_shift_kind_toggles_are_exclusive() {
    let r = WorkScheduleRecord::default().with_continuous_shift(true);
    assert!(r.has_continuous_shift);

    let r = r.with_extended_shift(true);
    assert!(r.has_extended_shift);
    assert!(!r.has_continuous_shift);

    let r = r.with_continuous_shift(true);
    assert!(r.has_continuous_shift);
    assert!(!r.has_extended_shift);

    // Disabling does not touch the other kind.
    let r = r.with_extended_shift(false);
    assert!(r.has_continuous_shift);
}

#[test]
fn test_normalized_invariants_for_every_combination() {
    for bits in 0u8..16 {
        for shifts in 0u8..=5 {
            let r = record(
                bits & 1 != 0,
                bits & 2 != 0,
                bits & 4 != 0,
                bits & 8 != 0,
                shifts,
            )
            .normalized();
            assert!(!(r.has_extended_shift && r.has_continuous_shift));
            assert!(r.shift_count >= 1);
            if r.has_continuous_shift {
                let limit = if r.works_at_night { 2 } else { 1 };
                assert!(r.shift_count <= limit, "{r:?}");
            } else {
                assert!(r.shift_count <= MAX_SHIFT_COUNT);
            }
            assert_eq!(r, r.normalized(), "normalized must be idempotent");
        }
    }
}

// -------------------------------------------------------------------------
// Store operations
// -------------------------------------------------------------------------

#[test]
fn test_get_or_create_inserts_default() {
    let mut store = WorkScheduleStore::default();
    let r = store.get_or_create(BuildingId(7));
    assert_eq!(r, WorkScheduleRecord::default());
    assert!(store.contains(BuildingId(7)));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_get_does_not_insert() {
    let store = WorkScheduleStore::default();
    assert_eq!(store.get(BuildingId(7)), WorkScheduleRecord::default());
    assert!(store.is_empty());
}

#[test]
fn test_set_then_get_or_create_returns_normalized() {
    let mut store = WorkScheduleStore::default();
    let input = record(false, true, true, true, 3);
    store.set(BuildingId(1), input);
    assert_eq!(store.get_or_create(BuildingId(1)), input.normalized());

    // Re-setting the stored value changes nothing.
    let stored = store.get(BuildingId(1));
    store.set(BuildingId(1), stored);
    assert_eq!(store.get(BuildingId(1)), stored);
}

#[test]
#[allow(unused_variables, unused_assignments)]
fn test_values_are_copies() {
    let mut store = WorkScheduleStore::default();
    let mut r = store.get_or_create(BuildingId(3));
    r.works_at_night = true;
    assert!(!store.get(BuildingId(3)).works_at_night);
}

#[test]
fn test_remove_then_get_or_create_is_default() {
    let mut store = WorkScheduleStore::default();
    store.set(BuildingId(2), record(true, true, false, false, 3));
    assert!(store.remove(BuildingId(2)).is_some());
    assert_eq!(store.get_or_create(BuildingId(2)), WorkScheduleRecord::default());
}

#[test]
fn test_remove_missing_is_noop() {
    let mut store = WorkScheduleStore::default();
    store.set(BuildingId(2), WorkScheduleRecord::default());
    assert!(store.remove(BuildingId(99)).is_none());
    assert_eq!(store.len(), 1);
}

#[test]
fn test_zero_building_is_a_valid_key() {
    let mut store = WorkScheduleStore::default();
    store.set(BuildingId(0), record(true, false, false, false, 2));
    assert!(store.get(BuildingId(0)).works_at_night);
}

#[test]
fn test_for_each_visits_every_pair() {
    let mut store = WorkScheduleStore::default();
    for id in 1..=5 {
        store.set(BuildingId(id), WorkScheduleRecord::default());
    }
    let mut seen = Vec::new();
    store.for_each(|id, _| seen.push(id.0));
    seen.sort_unstable();
    assert_eq!(seen, vec![1, 2, 3, 4, 5]);
}

// -------------------------------------------------------------------------
// Saveable
// -------------------------------------------------------------------------

#[test]
fn test_empty_store_is_not_saved() {
    assert!(WorkScheduleStore::default().save_to_bytes().is_none());
}

#[test]
fn test_saveable_roundtrip() {
    let mut store = WorkScheduleStore::default();
    store.set(BuildingId(10), record(true, true, false, true, 2));
    store.set(BuildingId(3), record(false, true, true, false, 1));
    store.set(BuildingId(0), WorkScheduleRecord::default());

    let bytes = store.save_to_bytes().expect("non-empty store should save");
    let restored = WorkScheduleStore::load_from_bytes(&bytes);
    assert_eq!(restored, store);
}

#[test]
fn test_save_bytes_are_deterministic() {
    let mut a = WorkScheduleStore::default();
    let mut b = WorkScheduleStore::default();
    for id in [5, 1, 9, 3] {
        a.set(BuildingId(id), record(true, false, false, false, 3));
    }
    for id in [9, 3, 1, 5] {
        b.set(BuildingId(id), record(true, false, false, false, 3));
    }
    assert_eq!(a.save_to_bytes(), b.save_to_bytes());
}

#[test]
fn test_load_normalizes_records() {
    let raw = vec![(BuildingId(4), record(false, false, true, true, 3))];
    let bytes = bitcode::encode(&raw);
    let store = WorkScheduleStore::load_from_bytes(&bytes);
    assert_eq!(store.get(BuildingId(4)), record(false, false, true, false, 2));
}

#[test]
fn test_corrupt_bytes_yield_empty_store() {
    let store = WorkScheduleStore::load_from_bytes(&[0xFF, 0x01, 0x02]);
    assert!(store.is_empty());
}

// -------------------------------------------------------------------------
// Eviction system
// -------------------------------------------------------------------------

#[test]
fn test_eviction_system_removes_records() {
    let mut world = World::new();
    world.init_resource::<Events<BuildingRemoved>>();
    let mut store = WorkScheduleStore::default();
    store.set(BuildingId(1), WorkScheduleRecord::default());
    store.set(BuildingId(2), WorkScheduleRecord::default());
    world.insert_resource(store);

    world.send_event(BuildingRemoved {
        building: BuildingId(1),
    });
    world.send_event(BuildingRemoved {
        building: BuildingId(77),
    });
    let mut schedule = Schedule::default();
    schedule.add_systems(evict_removed_buildings);
    schedule.run(&mut world);

    let store = world.resource::<WorkScheduleStore>();
    assert!(!store.contains(BuildingId(1)));
    assert!(store.contains(BuildingId(2)));
}
