use crate::citizen::BuildingId;
use crate::game_params::ShiftParams;
use crate::time_of_day::SimTime;
use crate::work_schedule::{WorkScheduleRecord, WorkScheduleStore};

const HOURS_PER_DAY: u8 = 24;

/// Whether a workplace is open and, if so, which shift is working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShiftStatus {
    #[default]
    Closed,
    Open { shift: u8 },
}

impl ShiftStatus {
    pub fn is_operating(self) -> bool {
        matches!(self, Self::Open { .. })
    }

    pub fn shift_index(self) -> Option<u8> {
        match self {
            Self::Open { shift } => Some(shift),
            Self::Closed => None,
        }
    }
}

/// A contiguous run of hours, possibly wrapping past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatingWindow {
    /// First hour of the window (0-23).
    pub start: u8,
    /// Length in hours (0-24).
    pub len: u8,
}

impl OperatingWindow {
    fn around_the_clock(start: u8) -> Self {
        Self {
            start: start % HOURS_PER_DAY,
            len: HOURS_PER_DAY,
        }
    }

    /// The standard day shift.
    pub fn day(params: &ShiftParams) -> Self {
        Self {
            start: params.work_begin_hour % HOURS_PER_DAY,
            len: params.work_end_hour.saturating_sub(params.work_begin_hour),
        }
    }

    /// The day shift widened by the extension at both ends.
    pub fn extended(params: &ShiftParams) -> Self {
        let start = params.work_begin_hour as i32 - params.extension_hours as i32;
        let len = params.work_end_hour.saturating_sub(params.work_begin_hour) as u32
            + 2 * params.extension_hours as u32;
        Self {
            start: start.rem_euclid(HOURS_PER_DAY as i32) as u8,
            len: len.min(HOURS_PER_DAY as u32) as u8,
        }
    }

    /// The hours a workplace with this schedule may be open on a working day.
    pub fn for_record(record: &WorkScheduleRecord, params: &ShiftParams) -> Self {
        if record.works_at_night {
            if record.has_continuous_shift && !record.has_extended_shift {
                Self::around_the_clock(params.continuous_handover_hour)
            } else {
                Self::around_the_clock(params.work_begin_hour)
            }
        } else if record.has_extended_shift || record.has_continuous_shift {
            Self::extended(params)
        } else {
            Self::day(params)
        }
    }

    /// Hours since the window opened, or `None` outside the window.
    pub fn offset(&self, hour: u8) -> Option<u8> {
        let offset = (hour as i32 - self.start as i32).rem_euclid(HOURS_PER_DAY as i32) as u8;
        (offset < self.len).then_some(offset)
    }

    /// Which of `shift_count` equal bands covers `hour`.
    pub fn band(&self, hour: u8, shift_count: u8) -> Option<u8> {
        let offset = self.offset(hour)?;
        let count = shift_count.max(1) as u32;
        Some((offset as u32 * count / self.len as u32) as u8)
    }
}

/// Evaluate a schedule at a point in time.
///
/// The record is taken as-is; callers wanting clamped shift counts store it
/// through [`WorkScheduleStore::set`] first.
pub fn shift_status(
    record: &WorkScheduleRecord,
    params: &ShiftParams,
    time: SimTime,
) -> ShiftStatus {
    if !record.works_on_weekends && time.day_of_week.is_weekend() {
        return ShiftStatus::Closed;
    }
    let window = OperatingWindow::for_record(record, params);
    let hour = time.hour % HOURS_PER_DAY;
    // An extended shift is a single long shift.
    let band = if record.has_extended_shift {
        window.offset(hour).map(|_| 0)
    } else {
        window.band(hour, record.shift_count)
    };
    match band {
        Some(shift) => ShiftStatus::Open { shift },
        None => ShiftStatus::Closed,
    }
}

/// Status of a building's workplace without creating its schedule.
pub fn workplace_status(
    store: &WorkScheduleStore,
    params: &ShiftParams,
    building: BuildingId,
    time: SimTime,
) -> ShiftStatus {
    shift_status(&store.get(building), params, time)
}
