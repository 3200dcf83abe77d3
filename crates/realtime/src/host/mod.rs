//! Narrow capability interface into host-owned citizen state.
//!
//! The real-time layer never touches host memory directly. Everything it
//! needs to read or write goes through [`HostStateAdapter`]; [`HostBuffers`]
//! is the in-process implementation backing a session.

mod buffers;


use std::fmt;

use bevy::math::Vec3;

use crate::citizen::{
    BuildingId, CitizenId, CitizenLocation, CitizenRecord, FamilyMembers, FlagMatch,
    InstanceFlags, InstanceId, NodeId, UnitId, Wealth,
};

pub use buffers::*;

/// Errors returned by host accessors that require a live citizen or instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The id is the host's zero sentinel or past the end of its buffer.
    OutOfRange { what: &'static str, id: u32 },
    /// The id is in range but the slot is not currently allocated.
    Released { what: &'static str, id: u32 },
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::OutOfRange { what, id } => write!(f, "{what} id {id} is out of range"),
            HostError::Released { what, id } => write!(f, "{what} {id} is not allocated"),
        }
    }
}

impl std::error::Error for HostError {}

/// Read and limited write access to host-owned citizens and their instances.
///
/// Accessors that return `Result` treat the zero id as a caller bug and fail
/// with [`HostError::OutOfRange`]. The remaining accessors answer "nothing"
/// (`None`, `false`, `0`) for ids that don't name a live instance, matching
/// the host's own behavior.
pub trait HostStateAdapter {
    /// Release a citizen and its instance, if any.
    fn release_citizen(&mut self, citizen: CitizenId);

    /// Building the instance is moving to.
    fn target_building(&self, instance: InstanceId) -> Option<BuildingId>;

    fn set_target_building(&mut self, instance: InstanceId, building: BuildingId);

    /// Path node the instance is moving to.
    fn target_node(&self, instance: InstanceId) -> Option<NodeId>;

    fn set_target_node(&mut self, instance: InstanceId, node: NodeId);

    fn instance_has_flags(&self, instance: InstanceId, flags: InstanceFlags, mode: FlagMatch)
        -> bool;

    /// Current flags masked by `mask`.
    fn instance_flags(&self, instance: InstanceId, mask: InstanceFlags) -> InstanceFlags;

    /// Set (`enabled = true`) or clear the given flags.
    fn set_instance_flags(&mut self, instance: InstanceId, flags: InstanceFlags, enabled: bool);

    fn instance_wait_counter(&self, instance: InstanceId) -> u8;

    /// Whether the area around the instance is marked for evacuation.
    fn is_area_evacuating(&self, instance: InstanceId) -> bool;

    /// Change a unit's goods stock by `amount`. Returns `false` without
    /// changing anything when the unit is invalid or would go negative.
    fn modify_unit_goods(&mut self, unit: UnitId, amount: i32) -> bool;

    fn instances_count(&self) -> u32;

    fn max_instances_count(&self) -> u32;

    fn max_citizens_count(&self) -> u32;

    fn citizen_location(&self, citizen: CitizenId) -> Result<CitizenLocation, HostError>;

    fn citizen_wealth(&self, citizen: CitizenId) -> Result<Wealth, HostError>;

    fn citizen_family(&self, citizen: CitizenId) -> Result<FamilyMembers, HostError>;

    /// Mutable access to the citizen record behind an instance.
    fn citizen_mut(&mut self, instance: InstanceId) -> Result<&mut CitizenRecord, HostError>;

    fn citizen_position(&self, instance: InstanceId) -> Result<Vec3, HostError>;

    /// Drop the instance's path and cancel its movement.
    fn stop_moving(&mut self, instance: InstanceId, reset_target: bool);
}
