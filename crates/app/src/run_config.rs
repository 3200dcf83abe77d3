//! Runner settings read from the environment.

use std::path::PathBuf;

use bevy::prelude::*;

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_DAYS: u32 = 7;
pub const DEFAULT_CITIZENS: u32 = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// `REALTIME_PARAMS`: JSON params file.
    pub params_path: Option<PathBuf>,
    /// `REALTIME_SAVE`: where the session is written at the end of the run.
    pub save_path: Option<PathBuf>,
    /// `REALTIME_SEED`
    pub seed: u64,
    /// `REALTIME_DAYS`: simulated days to run.
    pub days: u32,
    /// `REALTIME_CITIZENS`: inhabitants created at startup.
    pub citizens: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            params_path: None,
            save_path: None,
            seed: DEFAULT_SEED,
            days: DEFAULT_DAYS,
            citizens: DEFAULT_CITIZENS,
        }
    }
}

impl RunConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparsable numbers fall back to defaults
    /// with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            params_path: lookup("REALTIME_PARAMS").map(PathBuf::from),
            save_path: lookup("REALTIME_SAVE").map(PathBuf::from),
            seed: parse_or(&lookup, "REALTIME_SEED", defaults.seed),
            days: parse_or(&lookup, "REALTIME_DAYS", defaults.days),
            citizens: parse_or(&lookup, "REALTIME_CITIZENS", defaults.citizens),
        }
    }
}

fn parse_or<T: std::str::FromStr + std::fmt::Display + Copy>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{key}={raw:?} is not a valid number, using {default}");
            default
        }),
    }
}
