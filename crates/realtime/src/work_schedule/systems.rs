use bevy::prelude::*;

use crate::SimulationSet;

use super::{BuildingRemoved, WorkScheduleStore};

/// Drop the schedules of deleted buildings.
pub fn evict_removed_buildings(
    mut events: EventReader<BuildingRemoved>,
    mut store: ResMut<WorkScheduleStore>,
) {
    for event in events.read() {
        if store.remove(event.building).is_some() {
            debug!("Work schedule for building {} evicted", event.building.0);
        }
    }
}

pub struct WorkSchedulePlugin;

impl Plugin for WorkSchedulePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<BuildingRemoved>()
            .init_resource::<WorkScheduleStore>()
            .add_systems(
                FixedUpdate,
                evict_removed_buildings.in_set(SimulationSet::PreSim),
            );

        // Register for save/load via the SaveableRegistry.
        app.init_resource::<crate::SaveableRegistry>();
        app.world_mut()
            .resource_mut::<crate::SaveableRegistry>()
            .register::<WorkScheduleStore>();
    }
}
