//! # TestSession: headless integration test harness
//!
//! Wraps `bevy::app::App` + `RealTimePlugin` so integration tests and
//! benchmarks can drive the fixed-tick systems without a window.
//!
//! `tick` runs the `FixedUpdate` schedule directly, so one tick is exactly
//! one simulated minute regardless of wall-clock time.

use std::collections::BTreeMap;

use bevy::prelude::*;

use crate::citizen::{BuildingId, CitizenCreated, CitizenRecord, InstanceId};
use crate::game_params::RealTimeParams;
use crate::host::HostBuffers;
use crate::new_citizen::NewCitizenStats;
use crate::shifts::{ShiftHandover, ShiftHandoverStats, ShiftStatus};
use crate::time_of_day::GameClock;
use crate::work_schedule::{BuildingRemoved, WorkScheduleRecord, WorkScheduleStore};
use crate::{RealTimePlugin, SaveableRegistry};

/// A headless session running `RealTimePlugin`.
pub struct TestSession {
    app: App,
    handover_cursor: bevy::ecs::event::EventCursor<ShiftHandover>,
}

impl Default for TestSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSession {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// A fresh session with default params and an empty host.
    pub fn new() -> Self {
        Self::with_params(RealTimeParams::default())
    }

    /// A fresh session using `params` instead of the defaults.
    pub fn with_params(params: RealTimeParams) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(RealTimePlugin);
        app.insert_resource(params);
        app.finish();
        app.cleanup();
        Self {
            app,
            handover_cursor: Default::default(),
        }
    }

    // -----------------------------------------------------------------------
    // Builders
    // -----------------------------------------------------------------------

    /// Move the clock to `hour:00` on `day` (day 1 is a Monday).
    pub fn at(mut self, day: u32, hour: u32) -> Self {
        self.set_clock(day, hour);
        self
    }

    /// Store a schedule for `building`.
    pub fn with_schedule(mut self, building: BuildingId, record: WorkScheduleRecord) -> Self {
        self.world_mut()
            .resource_mut::<WorkScheduleStore>()
            .set(building, record);
        self
    }

    // -----------------------------------------------------------------------
    // Simulation
    // -----------------------------------------------------------------------

    /// Run `n` fixed ticks (one simulated minute each).
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.world_mut().run_schedule(FixedUpdate);
        }
    }

    pub fn tick_hours(&mut self, hours: u32) {
        self.tick(hours * GameClock::TICKS_PER_HOUR);
    }

    pub fn set_clock(&mut self, day: u32, hour: u32) {
        let mut clock = self.world_mut().resource_mut::<GameClock>();
        clock.day = day;
        clock.hour = hour as f32;
    }

    // -----------------------------------------------------------------------
    // Host integration
    // -----------------------------------------------------------------------

    /// Allocate a citizen and its instance in the host and announce it with
    /// a `CitizenCreated` event. The policy runs on the next tick.
    pub fn spawn_citizen(&mut self, record: CitizenRecord) -> Option<InstanceId> {
        let mut host = self.world_mut().resource_mut::<HostBuffers>();
        let citizen = host.create_citizen(record)?;
        let instance = host.create_instance(citizen, Vec3::ZERO)?;
        self.world_mut().send_event(CitizenCreated { instance });
        Some(instance)
    }

    pub fn announce_citizen(&mut self, instance: InstanceId) {
        self.world_mut().send_event(CitizenCreated { instance });
    }

    pub fn remove_building(&mut self, building: BuildingId) {
        self.world_mut().send_event(BuildingRemoved { building });
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn resource<R: Resource>(&self) -> &R {
        self.app.world().resource::<R>()
    }

    pub fn clock(&self) -> &GameClock {
        self.resource::<GameClock>()
    }

    pub fn host(&self) -> &HostBuffers {
        self.resource::<HostBuffers>()
    }

    pub fn schedules(&self) -> &WorkScheduleStore {
        self.resource::<WorkScheduleStore>()
    }

    pub fn new_citizen_stats(&self) -> &NewCitizenStats {
        self.resource::<NewCitizenStats>()
    }

    pub fn handover_stats(&self) -> &ShiftHandoverStats {
        self.resource::<ShiftHandoverStats>()
    }

    pub fn registry(&self) -> &SaveableRegistry {
        self.resource::<SaveableRegistry>()
    }

    /// Snapshot every registered resource into an extension map.
    pub fn save_extensions(&self) -> BTreeMap<String, Vec<u8>> {
        let world = self.app.world();
        world.resource::<SaveableRegistry>().save_all(world)
    }

    /// Restore registered resources from an extension map.
    pub fn load_extensions(&mut self, extensions: &BTreeMap<String, Vec<u8>>) {
        self.world_mut()
            .resource_scope(|world, registry: Mut<SaveableRegistry>| {
                registry.load_all(world, extensions);
            });
    }

    /// Reset every registered resource, as a new game does.
    pub fn start_new_session(&mut self) {
        self.world_mut()
            .resource_scope(|world, registry: Mut<SaveableRegistry>| {
                registry.reset_all(world);
            });
    }

    /// Handovers sent since the last call.
    pub fn drain_handovers(&mut self) -> Vec<ShiftHandover> {
        let events = self.app.world().resource::<Events<ShiftHandover>>();
        self.handover_cursor.read(events).copied().collect()
    }

    /// Statuses `building` moved into since the last drain. Drains the
    /// handovers of every building.
    pub fn handovers_for(&mut self, building: BuildingId) -> Vec<ShiftStatus> {
        self.drain_handovers()
            .into_iter()
            .filter(|h| h.building == building)
            .map(|h| h.current)
            .collect()
    }
}
