//! Totals of a demo run, persisted with the session so a later run can
//! pick up where the saved one stopped.

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use realtime::Saveable;

#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Encode, Decode)]
pub struct RunSummary {
    pub seed: u64,
    pub runs: u32,
    pub days_simulated: u32,
    pub citizens_created: u32,
    pub handovers: u64,
}

impl Saveable for RunSummary {
    const SAVE_KEY: &'static str = "demo_run_summary";

    fn save_to_bytes(&self) -> Option<Vec<u8>> {
        if self.runs == 0 {
            return None;
        }
        Some(bitcode::encode(self))
    }

    fn load_from_bytes(bytes: &[u8]) -> Self {
        realtime::decode_or_warn(Self::SAVE_KEY, bytes)
    }
}
