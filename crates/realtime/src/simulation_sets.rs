//! Deterministic ordering of the real-time layer via `SystemSet` phases.
//!
//! ```text
//! PreSim  →  Simulation  →  PostSim
//! ```
//!
//! * **PreSim** – Game clock, schedule eviction for deleted buildings.
//!   Sets up per-tick state that the decision systems read.
//! * **Simulation** – New citizen demographics and shift evaluation.
//! * **PostSim** – Reporting only; never mutates simulation state. Empty in
//!   this crate, host integrations hang their observers here.

use bevy::prelude::*;

/// Ordered phases for systems running in the `FixedUpdate` schedule.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Clock advance and table maintenance.
    PreSim,
    /// Policy decisions and shift evaluation.
    Simulation,
    /// Aggregation and logging.
    PostSim,
}

pub(crate) fn configure_simulation_sets(app: &mut App) {
    app.configure_sets(
        FixedUpdate,
        (
            SimulationSet::PreSim,
            SimulationSet::Simulation,
            SimulationSet::PostSim,
        )
            .chain(),
    );
}
