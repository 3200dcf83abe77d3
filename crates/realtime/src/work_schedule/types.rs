use std::collections::HashMap;

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::citizen::BuildingId;

// =============================================================================
// Constants
// =============================================================================

/// Upper bound on shifts for any workplace.
pub const MAX_SHIFT_COUNT: u8 = 3;

// =============================================================================
// WorkScheduleRecord
// =============================================================================

/// Per-building work schedule as edited in the operation hours panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub struct WorkScheduleRecord {
    pub works_at_night: bool,
    pub works_on_weekends: bool,
    /// One long shift reaching past the standard working hours.
    pub has_extended_shift: bool,
    /// Shifts hand over without a break.
    pub has_continuous_shift: bool,
    pub shift_count: u8,
}

impl Default for WorkScheduleRecord {
    fn default() -> Self {
        Self {
            works_at_night: false,
            works_on_weekends: false,
            has_extended_shift: false,
            has_continuous_shift: false,
            shift_count: 1,
        }
    }
}

impl WorkScheduleRecord {
    /// Highest shift count the current flags allow.
    ///
    /// Continuous work allows a second shift only with night work; otherwise
    /// night work unlocks the third shift.
    pub fn max_shift_count(&self) -> u8 {
        match (self.has_continuous_shift, self.works_at_night) {
            (true, true) => 2,
            (true, false) => 1,
            (false, true) => MAX_SHIFT_COUNT,
            (false, false) => 2,
        }
    }

    /// Toggle the extended shift. Enabling it clears the continuous shift.
    pub fn with_extended_shift(mut self, enabled: bool) -> Self {
        self.has_extended_shift = enabled;
        if enabled {
            self.has_continuous_shift = false;
        }
        self
    }

    /// Toggle the continuous shift. Enabling it clears the extended shift.
    pub fn with_continuous_shift(mut self, enabled: bool) -> Self {
        self.has_continuous_shift = enabled;
        if enabled {
            self.has_extended_shift = false;
        }
        self
    }

    /// The record with shift kinds made exclusive and the shift count clamped
    /// to what the flags allow. Extended wins when both kinds are set.
    pub fn normalized(self) -> Self {
        let mut record = self;
        if record.has_extended_shift {
            record.has_continuous_shift = false;
        }
        record.shift_count = record.shift_count.clamp(1, record.max_shift_count());
        record
    }

    pub fn is_normalized(&self) -> bool {
        *self == self.normalized()
    }
}

// =============================================================================
// Resource: WorkScheduleStore
// =============================================================================

/// Work schedules keyed by building. Records are created lazily with
/// defaults and handed out by value.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkScheduleStore {
    records: HashMap<BuildingId, WorkScheduleRecord>,
}

impl WorkScheduleStore {
    /// The stored record, inserting the default one first if there is none.
    pub fn get_or_create(&mut self, building: BuildingId) -> WorkScheduleRecord {
        *self.records.entry(building).or_default()
    }

    /// The stored record or the default one, without inserting.
    pub fn get(&self, building: BuildingId) -> WorkScheduleRecord {
        self.records.get(&building).copied().unwrap_or_default()
    }

    /// Store the normalized form of `record`, replacing any previous one.
    pub fn set(&mut self, building: BuildingId, record: WorkScheduleRecord) {
        self.records.insert(building, record.normalized());
    }

    /// Drop the record for `building`. Returns the removed record, if any.
    pub fn remove(&mut self, building: BuildingId) -> Option<WorkScheduleRecord> {
        self.records.remove(&building)
    }

    /// Visit every stored pair. Order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (BuildingId, WorkScheduleRecord)> + '_ {
        self.records.iter().map(|(id, record)| (*id, *record))
    }

    pub fn for_each(&self, mut visitor: impl FnMut(BuildingId, WorkScheduleRecord)) {
        for (id, record) in self.iter() {
            visitor(id, record);
        }
    }

    /// Stored pairs ordered by building id.
    pub fn sorted(&self) -> Vec<(BuildingId, WorkScheduleRecord)> {
        let mut pairs: Vec<_> = self.iter().collect();
        pairs.sort_unstable_by_key(|(id, _)| *id);
        pairs
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, building: BuildingId) -> bool {
        self.records.contains_key(&building)
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

// =============================================================================
// Saveable
// =============================================================================

impl crate::Saveable for WorkScheduleStore {
    const SAVE_KEY: &'static str = "work_schedules";

    fn save_to_bytes(&self) -> Option<Vec<u8>> {
        if self.is_empty() {
            return None;
        }
        Some(bitcode::encode(&self.sorted()))
    }

    fn load_from_bytes(bytes: &[u8]) -> Self {
        let pairs: Vec<(BuildingId, WorkScheduleRecord)> =
            crate::decode_or_warn(Self::SAVE_KEY, bytes);
        let mut store = Self::default();
        for (building, record) in pairs {
            store.set(building, record);
        }
        store
    }
}

// =============================================================================
// Events
// =============================================================================

/// Sent by the host when a building is deleted.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildingRemoved {
    pub building: BuildingId,
}
