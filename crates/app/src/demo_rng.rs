//! Seeded RNG for the demo population.
//!
//! Wraps `ChaCha8Rng` so the same `REALTIME_SEED` always produces the same
//! inhabitants. The generator state is saved with the session, so a run
//! resumed from a save keeps drawing the same sequence.

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use realtime::Saveable;

use crate::run_config::DEFAULT_SEED;

/// Full `ChaCha8Rng` state in a bitcode-friendly shape.
#[derive(Encode, Decode)]
struct RngSnapshot {
    seed: [u8; 32],
    word_pos: u128,
    stream: u64,
}

impl RngSnapshot {
    fn from_rng(rng: &ChaCha8Rng) -> Self {
        Self {
            seed: rng.get_seed(),
            word_pos: rng.get_word_pos(),
            stream: rng.get_stream(),
        }
    }

    fn to_rng(&self) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::from_seed(self.seed);
        rng.set_stream(self.stream);
        rng.set_word_pos(self.word_pos);
        rng
    }
}

#[derive(Resource)]
pub struct DemoRng(pub ChaCha8Rng);

impl Default for DemoRng {
    fn default() -> Self {
        Self::from_seed_u64(DEFAULT_SEED)
    }
}

impl DemoRng {
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl Saveable for DemoRng {
    const SAVE_KEY: &'static str = "demo_rng";

    fn save_to_bytes(&self) -> Option<Vec<u8>> {
        Some(bitcode::encode(&RngSnapshot::from_rng(&self.0)))
    }

    fn load_from_bytes(bytes: &[u8]) -> Self {
        match bitcode::decode::<RngSnapshot>(bytes) {
            Ok(snapshot) => Self(snapshot.to_rng()),
            Err(e) => {
                warn!("DemoRng: failed to decode save data, using default seed: {e}");
                Self::default()
            }
        }
    }
}
