//! Demographics for newly created citizens.
//!
//! When the host instantiates a citizen it hands over a candidate raw age.
//! The policy picks the education level the age band implies (never below
//! what the citizen already has) and may nudge the age a few units so it
//! falls in a band consistent with that education.
//!
//! The policy itself is a pure function of the age band table in
//! [`RealTimeParams`](crate::game_params::RealTimeParams); the system in this
//! module applies it to citizens announced through [`CitizenCreated`]
//! events.
//!
//! [`CitizenCreated`]: crate::citizen::CitizenCreated

mod policy;
mod systems;


pub use policy::*;
pub use systems::*;
