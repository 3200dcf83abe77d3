use bevy::prelude::*;

use crate::citizen::BuildingId;
use crate::game_params::RealTimeParams;
use crate::time_of_day::{GameClock, SimTime};
use crate::work_schedule::WorkScheduleStore;
use crate::SimulationSet;

use super::{shift_status, ShiftStatus};

/// A workplace opened, closed or moved on to another shift.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftHandover {
    pub building: BuildingId,
    pub previous: ShiftStatus,
    pub current: ShiftStatus,
    pub time: SimTime,
}

/// Running handover totals for this session.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct ShiftHandoverStats {
    pub total: u64,
    /// Handovers emitted at the most recent hour change.
    pub last_hour: u32,
}

/// The hour the handover detector last evaluated. `None` until the first
/// tick of a session, which only records the hour.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWatch {
    pub last_seen: Option<SimTime>,
}

// Neither resource is written to the save file. Registering them makes every
// load and new session start from the defaults instead of the previous
// session's values.

impl crate::Saveable for ShiftWatch {
    const SAVE_KEY: &'static str = "shift_watch";

    fn save_to_bytes(&self) -> Option<Vec<u8>> {
        None
    }

    fn load_from_bytes(_bytes: &[u8]) -> Self {
        Self::default()
    }
}

impl crate::Saveable for ShiftHandoverStats {
    const SAVE_KEY: &'static str = "shift_handover_stats";

    fn save_to_bytes(&self) -> Option<Vec<u8>> {
        None
    }

    fn load_from_bytes(_bytes: &[u8]) -> Self {
        Self::default()
    }
}

/// On every hour change, compare each stored schedule at the previous and
/// the current hour and report the ones that changed.
pub fn detect_shift_handovers(
    clock: Res<GameClock>,
    params: Res<RealTimeParams>,
    store: Res<WorkScheduleStore>,
    mut watch: ResMut<ShiftWatch>,
    mut handovers: EventWriter<ShiftHandover>,
    mut stats: ResMut<ShiftHandoverStats>,
) {
    let now = clock.sim_time();
    let Some(previous_time) = watch.last_seen.replace(now) else {
        return;
    };
    if previous_time == now {
        return;
    }

    let mut count = 0u32;
    for (building, record) in store.sorted() {
        let previous = shift_status(&record, &params.shifts, previous_time);
        let current = shift_status(&record, &params.shifts, now);
        if previous != current {
            handovers.send(ShiftHandover {
                building,
                previous,
                current,
                time: now,
            });
            count += 1;
        }
    }

    stats.total += count as u64;
    stats.last_hour = count;
    if count > 0 {
        debug!(
            "{:?} {:02}:00: {} shift handovers",
            now.day_of_week, now.hour, count
        );
    }
}

pub struct ShiftPlugin;

impl Plugin for ShiftPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ShiftHandover>()
            .init_resource::<ShiftHandoverStats>()
            .init_resource::<ShiftWatch>()
            .add_systems(
                FixedUpdate,
                detect_shift_handovers.in_set(SimulationSet::Simulation),
            );

        app.init_resource::<crate::SaveableRegistry>();
        let mut registry = app.world_mut().resource_mut::<crate::SaveableRegistry>();
        registry.register::<ShiftWatch>();
        registry.register::<ShiftHandoverStats>();
    }
}
