use bevy::prelude::*;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Host citizen id. `0` is the host's "no citizen" sentinel.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    bitcode::Encode,
    bitcode::Decode,
)]
pub struct CitizenId(pub u32);

/// Host citizen-instance id (the moving, simulated body of a citizen).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    bitcode::Encode,
    bitcode::Decode,
)]
pub struct InstanceId(pub u16);

/// Host building id. Any value is a valid key for the schedule table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    bitcode::Encode,
    bitcode::Decode,
)]
pub struct BuildingId(pub u32);

/// Host path-network node id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct NodeId(pub u16);

/// Host citizen-unit id (a goods storage slot attached to a building).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct UnitId(pub u32);

macro_rules! sentinel_id {
    ($($ty:ty),*) => {
        $(
            impl $ty {
                /// Whether this is the host's "none" value.
                pub fn is_none(self) -> bool {
                    self.0 == 0
                }
            }
        )*
    };
}

sentinel_id!(CitizenId, InstanceId, BuildingId, NodeId, UnitId);

// ---------------------------------------------------------------------------
// Age and education
// ---------------------------------------------------------------------------

/// Citizen age in the host's internal unit (0-255), not calendar years.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    bitcode::Encode,
    bitcode::Decode,
)]
pub struct RawAge(pub u8);

impl RawAge {
    pub const MAX: RawAge = RawAge(u8::MAX);

    /// Clamp any integer into the valid raw age range.
    pub fn from_raw(value: i32) -> Self {
        Self(value.clamp(0, u8::MAX as i32) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// Education level, ordered from least to most educated.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    bitcode::Encode,
    bitcode::Decode,
)]
pub enum EducationLevel {
    #[default]
    None,
    Poor,
    Average,
    Good,
    Excellent,
}

impl EducationLevel {
    pub const ALL: [EducationLevel; 5] = [
        Self::None,
        Self::Poor,
        Self::Average,
        Self::Good,
        Self::Excellent,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Poor => "Poor",
            Self::Average => "Average",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }
}

// ---------------------------------------------------------------------------
// Citizen-level host state
// ---------------------------------------------------------------------------

/// Where a citizen currently is, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CitizenLocation {
    #[default]
    Home,
    Work,
    Visit,
    Moving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Wealth {
    #[default]
    Low,
    Medium,
    High,
}

/// Up to four family members of a citizen. Empty slots hold `CitizenId(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FamilyMembers(pub [CitizenId; 4]);

impl FamilyMembers {
    pub const CAPACITY: usize = 4;

    pub fn iter(&self) -> impl Iterator<Item = CitizenId> + '_ {
        self.0.iter().copied().filter(|id| !id.is_none())
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The host's per-citizen record. The real-time layer only writes `age` and
/// `education`; everything else is read-only to it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CitizenRecord {
    pub age: RawAge,
    pub education: EducationLevel,
    pub location: CitizenLocation,
    pub wealth: Wealth,
    pub family: FamilyMembers,
    pub instance: InstanceId,
}

// ---------------------------------------------------------------------------
// Instance flags
// ---------------------------------------------------------------------------

/// Citizen-instance state flags, packed into a single `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct InstanceFlags(pub u32);

impl InstanceFlags {
    pub const NONE: InstanceFlags = InstanceFlags(0);
    pub const CREATED: InstanceFlags = InstanceFlags(0b0000_0001);
    pub const DELETED: InstanceFlags = InstanceFlags(0b0000_0010);
    pub const WAITING_PATH: InstanceFlags = InstanceFlags(0b0000_0100);
    pub const WAITING_TRANSPORT: InstanceFlags = InstanceFlags(0b0000_1000);
    pub const BOARDING: InstanceFlags = InstanceFlags(0b0001_0000);
    pub const ENTERING_VEHICLE: InstanceFlags = InstanceFlags(0b0010_0000);
    pub const TARGET_IS_NODE: InstanceFlags = InstanceFlags(0b0100_0000);
    pub const PANICKING: InstanceFlags = InstanceFlags(0b1000_0000);
    pub const ALL: InstanceFlags = InstanceFlags(u32::MAX);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: InstanceFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn intersects(self, other: InstanceFlags) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for InstanceFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for InstanceFlags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl std::ops::Not for InstanceFlags {
    type Output = Self;
    fn not(self) -> Self {
        Self(!self.0)
    }
}

/// How [`InstanceFlags`] are matched against an instance's current flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagMatch {
    /// Every requested flag must be set.
    All,
    /// At least one requested flag must be set.
    Any,
}

/// The host's per-instance record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InstanceRecord {
    pub citizen: CitizenId,
    pub flags: InstanceFlags,
    pub wait_counter: u8,
    pub position: Vec3,
    pub target_building: BuildingId,
    pub target_node: NodeId,
    pub has_path: bool,
    pub evacuating: bool,
}

/// Event sent by the host integration after it instantiates a new citizen.
#[derive(Event, Debug, Clone, Copy)]
pub struct CitizenCreated {
    pub instance: InstanceId,
}
