//! ECS systems and plugin applying the new citizen policy to host records.

use bevy::prelude::*;

use crate::citizen::{CitizenCreated, InstanceId};
use crate::game_params::{NewCitizenParams, RealTimeParams};
use crate::host::{HostBuffers, HostError, HostStateAdapter};

use super::{decide, CitizenDecision};

/// Running totals for the new citizen policy in this session.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct NewCitizenStats {
    pub assigned: u64,
    pub age_adjusted: u64,
    pub rejected: u64,
}

// Not written to the save file; registered so loads and new sessions start
// counting from zero.
impl crate::Saveable for NewCitizenStats {
    const SAVE_KEY: &'static str = "new_citizen_stats";

    fn save_to_bytes(&self) -> Option<Vec<u8>> {
        None
    }

    fn load_from_bytes(_bytes: &[u8]) -> Self {
        Self::default()
    }
}

/// Run the policy for one instance and write the result into its citizen
/// record.
pub fn apply_new_citizen_policy<H: HostStateAdapter + ?Sized>(
    host: &mut H,
    params: &NewCitizenParams,
    instance: InstanceId,
) -> Result<CitizenDecision, HostError> {
    let record = host.citizen_mut(instance)?;
    let decision = decide(params, record.age, record.education);
    record.age = decision.age;
    record.education = decision.education;
    Ok(decision)
}

/// Consume `CitizenCreated` events and assign demographics through the host.
pub fn assign_new_citizen_demographics<H: HostStateAdapter + Resource>(
    mut events: EventReader<CitizenCreated>,
    params: Res<RealTimeParams>,
    mut host: ResMut<H>,
    mut stats: ResMut<NewCitizenStats>,
) {
    for event in events.read() {
        let requested = host.citizen_mut(event.instance).map(|record| record.age);
        match apply_new_citizen_policy(&mut *host, &params.new_citizen, event.instance) {
            Ok(decision) => {
                stats.assigned += 1;
                if requested.is_ok_and(|age| decision.age_adjusted(age)) {
                    stats.age_adjusted += 1;
                }
                debug!(
                    "New citizen on instance {}: education {}, age {}",
                    event.instance.0,
                    decision.education.label(),
                    decision.age.0
                );
            }
            Err(e) => {
                stats.rejected += 1;
                warn!("New citizen policy skipped: {}", e);
            }
        }
    }
}

pub struct NewCitizenPlugin;

impl Plugin for NewCitizenPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CitizenCreated>()
            .init_resource::<HostBuffers>()
            .init_resource::<NewCitizenStats>()
            .add_systems(
                FixedUpdate,
                assign_new_citizen_demographics::<HostBuffers>
                    .in_set(crate::SimulationSet::Simulation),
            );

        app.init_resource::<crate::SaveableRegistry>();
        app.world_mut()
            .resource_mut::<crate::SaveableRegistry>()
            .register::<NewCitizenStats>();
    }
}
