use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// Day 1 of a session is a Monday.
    pub fn from_day_number(day: u32) -> Self {
        Self::ALL[(day.saturating_sub(1) % 7) as usize]
    }

    pub fn is_weekend(self) -> bool {
        matches!(self, Self::Saturday | Self::Sunday)
    }
}

/// A point in simulated time at hour resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimTime {
    pub hour: u8,
    pub day_of_week: DayOfWeek,
}

impl SimTime {
    pub fn new(hour: u8, day_of_week: DayOfWeek) -> Self {
        Self {
            hour: hour % 24,
            day_of_week,
        }
    }
}

#[derive(Resource, Debug, Clone, Serialize, Deserialize, bitcode::Encode, bitcode::Decode)]
pub struct GameClock {
    pub day: u32,
    pub hour: f32,
    pub speed: f32,
    pub paused: bool,
}

impl Default for GameClock {
    fn default() -> Self {
        Self {
            day: 1,
            hour: 6.0, // start at 6 AM
            speed: 1.0,
            paused: false,
        }
    }
}

impl GameClock {
    /// Minutes per sim tick at 1x speed
    pub const MINUTES_PER_TICK: f32 = 1.0;

    /// Ticks in one simulated hour.
    pub const TICKS_PER_HOUR: u32 = 60;

    pub fn tick(&mut self) {
        if self.paused {
            return;
        }
        // Speed is handled by scaling the FixedUpdate timestep (sync_fixed_timestep),
        // so each tick always advances by the same amount of game time.
        self.hour += Self::MINUTES_PER_TICK / 60.0;
        // Snap to whole minutes so f32 drift never delays an hour boundary.
        self.hour = (self.hour * 60.0).round() / 60.0;
        if self.hour >= 24.0 {
            self.hour -= 24.0;
            self.day += 1;
        }
    }

    pub fn hour_of_day(&self) -> u32 {
        // Accumulated f32 minutes can land a hair below a whole hour.
        ((self.hour + 1e-3) as u32).min(23)
    }

    pub fn day_of_week(&self) -> DayOfWeek {
        DayOfWeek::from_day_number(self.day)
    }

    pub fn sim_time(&self) -> SimTime {
        SimTime::new(self.hour_of_day() as u8, self.day_of_week())
    }

    pub fn formatted(&self) -> String {
        let minutes = (self.hour * 60.0).round() as u32;
        let (h, m) = (minutes / 60, minutes % 60);
        format!("{:?} (day {}) {:02}:{:02}", self.day_of_week(), self.day, h, m)
    }
}

pub fn tick_game_clock(mut clock: ResMut<GameClock>) {
    clock.tick();
}

/// Scales the FixedUpdate timestep based on GameClock speed.
/// Base rate is 10 Hz (100 ms). At 2x speed it becomes 50 ms, at 4x -> 25 ms, etc.
pub fn sync_fixed_timestep(clock: Res<GameClock>, mut time: ResMut<Time<Fixed>>) {
    let base_hz = std::time::Duration::from_millis(100); // 10 Hz
    let effective = if clock.paused || clock.speed <= 0.0 {
        // When paused, keep the timestep but the tick_game_clock won't advance
        base_hz
    } else {
        base_hz.div_f32(clock.speed.clamp(0.25, 64.0))
    };
    time.set_timestep(effective);
}

impl crate::Saveable for GameClock {
    const SAVE_KEY: &'static str = "game_clock";

    fn save_to_bytes(&self) -> Option<Vec<u8>> {
        Some(bitcode::encode(self))
    }

    fn load_from_bytes(bytes: &[u8]) -> Self {
        crate::decode_or_warn(Self::SAVE_KEY, bytes)
    }
}

pub struct TimeOfDayPlugin;

impl Plugin for TimeOfDayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameClock>()
            .add_systems(
                FixedUpdate,
                tick_game_clock.in_set(crate::SimulationSet::PreSim),
            )
            .add_systems(Update, sync_fixed_timestep);

        app.init_resource::<crate::SaveableRegistry>();
        app.world_mut()
            .resource_mut::<crate::SaveableRegistry>()
            .register::<GameClock>();
    }
}
