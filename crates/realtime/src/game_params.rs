//! Data-driven parameters for the real-time layer.
//!
//! Age bands and business hours live in a single [`RealTimeParams`] resource
//! instead of module-level constants, so they can be tuned from a JSON file
//! without recompiling anything. The resource is registered via the
//! `Saveable` trait so overrides persist across save/load cycles.

use std::fmt;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::citizen::EducationLevel;

// ---------------------------------------------------------------------------
// New citizen parameters
// ---------------------------------------------------------------------------

/// One age band: runs from `first_age` up to the next band's `first_age - 1`
/// (the last band runs to 255).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, bitcode::Encode, bitcode::Decode)]
pub struct AgeBand {
    pub first_age: u8,
    pub education: EducationLevel,
}

/// Tunables for the new citizen policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, bitcode::Encode, bitcode::Decode)]
pub struct NewCitizenParams {
    /// Bands ordered by strictly increasing `first_age`, the first one at 0.
    pub bands: Vec<AgeBand>,
    /// How far below a band boundary (in raw age units) a citizen may be
    /// nudged up so that its age agrees with its education.
    pub boundary_margin: u8,
}

impl Default for NewCitizenParams {
    fn default() -> Self {
        Self {
            bands: vec![
                // child
                AgeBand {
                    first_age: 0,
                    education: EducationLevel::None,
                },
                // teen
                AgeBand {
                    first_age: 15,
                    education: EducationLevel::Poor,
                },
                // young adult
                AgeBand {
                    first_age: 45,
                    education: EducationLevel::Average,
                },
                // adult
                AgeBand {
                    first_age: 90,
                    education: EducationLevel::Good,
                },
                // senior
                AgeBand {
                    first_age: 180,
                    education: EducationLevel::Excellent,
                },
            ],
            boundary_margin: 3,
        }
    }
}

impl NewCitizenParams {
    /// Check that the band table covers 0..=255 without gaps or overlaps.
    pub fn validate(&self) -> Result<(), ParamsError> {
        let Some(first) = self.bands.first() else {
            return Err(ParamsError::Invalid("age band table is empty".to_string()));
        };
        if first.first_age != 0 {
            return Err(ParamsError::Invalid(format!(
                "first age band must start at 0, starts at {}",
                first.first_age
            )));
        }
        for pair in self.bands.windows(2) {
            if pair[1].first_age <= pair[0].first_age {
                return Err(ParamsError::Invalid(format!(
                    "age bands must be strictly increasing ({} follows {})",
                    pair[1].first_age, pair[0].first_age
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Shift parameters
// ---------------------------------------------------------------------------

/// Business-hour constants the shift evaluator works from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, bitcode::Encode, bitcode::Decode)]
pub struct ShiftParams {
    /// Start of the standard day shift (0-23).
    pub work_begin_hour: u8,
    /// End of the standard day shift, exclusive (1-24).
    pub work_end_hour: u8,
    /// Hours an extended shift adds at each end of the day shift.
    pub extension_hours: u8,
    /// Hour at which round-the-clock continuous shifts hand over.
    pub continuous_handover_hour: u8,
}

impl Default for ShiftParams {
    fn default() -> Self {
        Self {
            work_begin_hour: 8,
            work_end_hour: 20,
            extension_hours: 2,
            continuous_handover_hour: 0,
        }
    }
}

impl ShiftParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.work_begin_hour >= self.work_end_hour || self.work_end_hour > 24 {
            return Err(ParamsError::Invalid(format!(
                "day shift {}..{} is not a valid range of hours",
                self.work_begin_hour, self.work_end_hour
            )));
        }
        let extended_len =
            (self.work_end_hour - self.work_begin_hour) as u32 + 2 * self.extension_hours as u32;
        if extended_len > 24 {
            return Err(ParamsError::Invalid(format!(
                "extended shift of {extended_len} hours does not fit in a day"
            )));
        }
        if self.continuous_handover_hour >= 24 {
            return Err(ParamsError::Invalid(format!(
                "continuous handover hour {} is out of range",
                self.continuous_handover_hour
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Top-level RealTimeParams resource
// ---------------------------------------------------------------------------

/// Central resource holding all data-driven parameters of the real-time layer.
#[derive(
    Resource,
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    bitcode::Encode,
    bitcode::Decode,
    Default,
)]
#[serde(default)]
pub struct RealTimeParams {
    pub new_citizen: NewCitizenParams,
    pub shifts: ShiftParams,
}

impl RealTimeParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        self.new_citizen.validate()?;
        self.shifts.validate()
    }

    /// Parse and validate parameters from a JSON document. Missing sections
    /// fall back to their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ParamsError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while loading parameters.
#[derive(Debug)]
pub enum ParamsError {
    /// The parameter file could not be read.
    Io(std::io::Error),
    /// The parameter file is not valid JSON for [`RealTimeParams`].
    Parse(serde_json::Error),
    /// The parameters parsed but break an invariant.
    Invalid(String),
}

impl fmt::Display for ParamsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamsError::Io(e) => write!(f, "I/O error: {e}"),
            ParamsError::Parse(e) => write!(f, "Parse error: {e}"),
            ParamsError::Invalid(msg) => write!(f, "Invalid parameters: {msg}"),
        }
    }
}

impl std::error::Error for ParamsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParamsError::Io(e) => Some(e),
            ParamsError::Parse(e) => Some(e),
            ParamsError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ParamsError {
    fn from(e: std::io::Error) -> Self {
        ParamsError::Io(e)
    }
}

impl From<serde_json::Error> for ParamsError {
    fn from(e: serde_json::Error) -> Self {
        ParamsError::Parse(e)
    }
}

// ---------------------------------------------------------------------------
// Saveable implementation
// ---------------------------------------------------------------------------

impl crate::Saveable for RealTimeParams {
    const SAVE_KEY: &'static str = "realtime_params";

    fn save_to_bytes(&self) -> Option<Vec<u8>> {
        // Always save, so sessions created with custom params restore them.
        Some(bitcode::encode(self))
    }

    fn load_from_bytes(bytes: &[u8]) -> Self {
        let params: Self = crate::decode_or_warn(Self::SAVE_KEY, bytes);
        match params.validate() {
            Ok(()) => params,
            Err(e) => {
                warn!("Saveable {}: {}, using defaults", Self::SAVE_KEY, e);
                Self::default()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

/// Optional path to a JSON params file, read when the plugin is built.
#[derive(Resource, Debug, Clone)]
pub struct ParamsFile(pub std::path::PathBuf);

pub struct GameParamsPlugin;

impl Plugin for GameParamsPlugin {
    fn build(&self, app: &mut App) {
        let params = match app.world().get_resource::<ParamsFile>() {
            Some(file) => match RealTimeParams::from_json_file(&file.0) {
                Ok(params) => {
                    info!("Loaded real-time params from {}", file.0.display());
                    params
                }
                Err(e) => {
                    error!(
                        "Failed to load real-time params from {}: {}; using defaults",
                        file.0.display(),
                        e
                    );
                    RealTimeParams::default()
                }
            },
            None => RealTimeParams::default(),
        };
        app.insert_resource(params);

        app.init_resource::<crate::SaveableRegistry>();
        app.world_mut()
            .resource_mut::<crate::SaveableRegistry>()
            .register::<RealTimeParams>();
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
