//! Real-time behaviour layer for a city simulation host.
//!
//! Two concerns live here: the demographics assigned to citizens when the
//! host creates them, and per-building work schedules that decide when a
//! workplace is open and which shift is working. Host state is reached only
//! through [`host::HostStateAdapter`]; session state is kept in Bevy
//! resources that persist through the [`SaveableRegistry`].

use bevy::prelude::*;
use std::collections::BTreeMap;

pub mod citizen;
pub mod game_params;
pub mod host;
pub mod new_citizen;
pub mod shifts;
pub mod simulation_sets;
pub mod time_of_day;
pub mod work_schedule;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use simulation_sets::SimulationSet;

// ---------------------------------------------------------------------------
// Saveable trait + registry for the extension map save pattern
// ---------------------------------------------------------------------------

/// Trait for session resources persisted through the extension map.
///
/// A feature plugin registers its resource with
/// `SaveableRegistry::register::<T>()` in `build()`; the save crate never
/// needs to know the concrete type.
pub trait Saveable: Resource + Default + Send + Sync + 'static {
    /// Unique, stable key in the save file's extension map.
    const SAVE_KEY: &'static str;

    /// Serialize this resource. `None` skips it (e.g. nothing to persist).
    fn save_to_bytes(&self) -> Option<Vec<u8>>;

    /// Restore the resource from bytes written by `save_to_bytes`.
    fn load_from_bytes(bytes: &[u8]) -> Self;
}

/// Decode bytes via `bitcode::decode`, logging a warning and returning
/// `Default` on failure.
pub fn decode_or_warn<T: bitcode::DecodeOwned + Default>(key: &str, bytes: &[u8]) -> T {
    match bitcode::decode(bytes) {
        Ok(v) => v,
        Err(e) => {
            warn!(
                "Saveable {}: failed to decode {} bytes, falling back to default: {}",
                key,
                bytes.len(),
                e
            );
            T::default()
        }
    }
}

pub type SaveFn = Box<dyn Fn(&World) -> Option<Vec<u8>> + Send + Sync>;
pub type LoadFn = Box<dyn Fn(&mut World, &[u8]) + Send + Sync>;
pub type ResetFn = Box<dyn Fn(&mut World) + Send + Sync>;

/// Type-erased save/load/reset operations for one registered resource.
pub struct SaveableEntry {
    pub key: String,
    pub save_fn: SaveFn,
    pub load_fn: LoadFn,
    pub reset_fn: ResetFn,
}

/// Registry of all saveable resources, populated during plugin setup.
#[derive(Resource, Default)]
pub struct SaveableRegistry {
    pub entries: Vec<SaveableEntry>,
}

impl SaveableRegistry {
    /// Register a resource type that implements `Saveable`.
    ///
    /// Panics in debug builds if the `SAVE_KEY` is already taken.
    pub fn register<T: Saveable>(&mut self) {
        let key = T::SAVE_KEY.to_string();
        if self.entries.iter().any(|e| e.key == key) {
            warn!(
                "SaveableRegistry: duplicate key '{}', ignoring second registration",
                key
            );
            debug_assert!(false, "SaveableRegistry: duplicate key '{}'", key);
            return;
        }
        self.entries.push(SaveableEntry {
            key,
            save_fn: Box::new(|world: &World| {
                world.get_resource::<T>().and_then(|r| r.save_to_bytes())
            }),
            load_fn: Box::new(|world: &mut World, bytes: &[u8]| {
                world.insert_resource(T::load_from_bytes(bytes));
            }),
            reset_fn: Box::new(|world: &mut World| {
                world.insert_resource(T::default());
            }),
        });
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// Save all registered resources into an extension map.
    pub fn save_all(&self, world: &World) -> BTreeMap<String, Vec<u8>> {
        let mut extensions = BTreeMap::new();
        for entry in &self.entries {
            if let Some(bytes) = (entry.save_fn)(world) {
                extensions.insert(entry.key.clone(), bytes);
            }
        }
        extensions
    }

    /// Load registered resources from an extension map. Resources whose key
    /// is absent are reset to their defaults so nothing from the previous
    /// session leaks into the loaded one.
    pub fn load_all(&self, world: &mut World, extensions: &BTreeMap<String, Vec<u8>>) {
        for entry in &self.entries {
            match extensions.get(&entry.key) {
                Some(bytes) => (entry.load_fn)(world, bytes),
                None => (entry.reset_fn)(world),
            }
        }
    }

    /// Reset all registered resources to their defaults (new session).
    pub fn reset_all(&self, world: &mut World) {
        for entry in &self.entries {
            (entry.reset_fn)(world);
        }
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

/// Everything the real-time layer needs in a host app.
pub struct RealTimePlugin;

impl Plugin for RealTimePlugin {
    fn build(&self, app: &mut App) {
        simulation_sets::configure_simulation_sets(app);
        app.init_resource::<SaveableRegistry>();

        app.add_plugins((
            game_params::GameParamsPlugin,
            time_of_day::TimeOfDayPlugin,
            new_citizen::NewCitizenPlugin,
            work_schedule::WorkSchedulePlugin,
            shifts::ShiftPlugin,
        ));
    }
}

#[cfg(test)]
mod saveable_tests {
    use super::*;
    use crate::citizen::BuildingId;
    use crate::time_of_day::GameClock;
    use crate::work_schedule::{WorkScheduleRecord, WorkScheduleStore};

    fn registry() -> SaveableRegistry {
        let mut registry = SaveableRegistry::default();
        registry.register::<WorkScheduleStore>();
        registry.register::<GameClock>();
        registry
    }

    fn store_with(buildings: &[u32]) -> WorkScheduleStore {
        let mut store = WorkScheduleStore::default();
        for &id in buildings {
            store.set(
                BuildingId(id),
                WorkScheduleRecord {
                    works_at_night: true,
                    ..Default::default()
                },
            );
        }
        store
    }

    #[test]
    fn test_keys_in_registration_order() {
        assert_eq!(
            registry().keys().collect::<Vec<_>>(),
            vec!["work_schedules", "game_clock"]
        );
    }

    #[test]
    fn test_empty_schedule_table_is_not_saved() {
        let mut world = World::new();
        world.init_resource::<WorkScheduleStore>();
        world.init_resource::<GameClock>();

        let extensions = registry().save_all(&world);
        assert_eq!(extensions.keys().collect::<Vec<_>>(), vec!["game_clock"]);
    }

    #[test]
    fn test_missing_resource_is_skipped() {
        let mut world = World::new();
        world.insert_resource(store_with(&[3]));

        let extensions = registry().save_all(&world);
        assert!(extensions.contains_key("work_schedules"));
        assert!(!extensions.contains_key("game_clock"));
    }

    #[test]
    fn test_save_then_load_into_fresh_world() {
        let mut source = World::new();
        source.insert_resource(store_with(&[1, 2, 9]));
        source.insert_resource(GameClock {
            day: 12,
            hour: 21.0,
            ..Default::default()
        });
        let extensions = registry().save_all(&source);

        let mut target = World::new();
        registry().load_all(&mut target, &extensions);
        assert_eq!(
            target.resource::<WorkScheduleStore>(),
            source.resource::<WorkScheduleStore>()
        );
        assert_eq!(target.resource::<GameClock>().day, 12);
    }

    #[test]
    fn test_load_resets_resources_missing_from_save() {
        let mut world = World::new();
        world.insert_resource(store_with(&[4, 5]));

        let mut extensions = BTreeMap::new();
        extensions.insert("some_other_layer".to_string(), vec![0xAB]);
        registry().load_all(&mut world, &extensions);

        assert!(world.resource::<WorkScheduleStore>().is_empty());
        assert_eq!(world.resource::<GameClock>().day, 1);
    }

    #[test]
    fn test_reset_all_restores_defaults() {
        let mut world = World::new();
        world.insert_resource(store_with(&[7]));
        world.insert_resource(GameClock {
            day: 40,
            ..Default::default()
        });

        registry().reset_all(&mut world);
        assert!(world.resource::<WorkScheduleStore>().is_empty());
        assert_eq!(world.resource::<GameClock>().day, 1);
    }

    #[test]
    #[should_panic(expected = "duplicate key")]
    fn test_registering_a_key_twice_panics_in_debug() {
        let mut registry = registry();
        registry.register::<WorkScheduleStore>();
    }

    #[test]
    fn test_decode_or_warn_falls_back_to_default() {
        let store: Vec<u32> = decode_or_warn("work_schedules", &[0xFF]);
        assert!(store.is_empty());
    }
}
