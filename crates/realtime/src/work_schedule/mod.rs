//! Per-building work schedules.
//!
//! A schedule says whether a workplace runs at night or on weekends, how many
//! shifts it has, and whether those are a single extended shift or
//! continuous shifts handing over to each other. Records are created with
//! defaults the first time a building is looked up and are removed when the
//! host reports the building deleted.
//!
//! Every write goes through [`WorkScheduleRecord::normalized`], so stored
//! records never carry both shift kinds and their shift count always fits
//! the flags.

mod systems;
mod types;

#[cfg(test)]
mod tests;

pub use systems::*;
pub use types::*;
