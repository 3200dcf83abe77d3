//! Operating hours and shift evaluation for workplaces.
//!
//! ## Operating windows
//! - **Day**: `work_begin_hour..work_end_hour` (08:00-20:00 by default)
//! - **Extended**: the day window widened by `extension_hours` at each end,
//!   worked as a single shift
//! - **Night work**: the window covers all 24 hours; continuous shifts hand
//!   over at `continuous_handover_hour`
//!
//! Workplaces without weekend work are closed on Saturday and Sunday.
//! Within its window a workplace's shifts split the hours into equal bands.
//!
//! The evaluator is pure: time is always passed in. The handover system
//! watches the session clock and reports status changes as events.

mod evaluator;
mod systems;


pub use evaluator::*;
pub use systems::*;
