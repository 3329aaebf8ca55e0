//! Display windows expressed as minute offsets from midnight.
//!
//! A window that runs past midnight keeps an end beyond [`MINUTES_PER_DAY`]
//! instead of wrapping to a smaller number: 23:00–01:00 is `[1380, 1500)`, not
//! `[1380, 60)`. This keeps `end > start` true for every window, which all of
//! the interval arithmetic in this crate relies on.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// Number of minutes in the nominal day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A half-open display window `[start_minute, end_minute)`.
///
/// Invariants, checked by [`TimeWindow::new`]:
/// - `start_minute < 1440`
/// - `end_minute > start_minute`
/// - `end_minute - start_minute <= 1440`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWindow", rename_all = "camelCase")]
pub struct TimeWindow {
    start_minute: u32,
    end_minute: u32,
}

/// Unvalidated `{startMinute, endMinute}` pair as it arrives over JSON.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWindow {
    start_minute: i64,
    end_minute: i64,
}

impl TryFrom<RawWindow> for TimeWindow {
    type Error = ScheduleError;

    fn try_from(raw: RawWindow) -> Result<Self> {
        TimeWindow::from_signed(raw.start_minute, raw.end_minute)
    }
}

impl TimeWindow {
    /// Build a window, rejecting zero-length, inverted, or over-long ranges.
    pub fn new(start_minute: u32, end_minute: u32) -> Result<Self> {
        Self::from_signed(start_minute as i64, end_minute as i64)
    }

    /// Build a window from possibly-negative minute values, as produced by
    /// pointer arithmetic or untyped input.
    pub fn from_signed(start: i64, end: i64) -> Result<Self> {
        let invalid = |reason: &str| ScheduleError::InvalidWindow {
            start,
            end,
            reason: reason.to_string(),
        };

        if start < 0 || start >= MINUTES_PER_DAY as i64 {
            return Err(invalid("start must be within [0, 1440)"));
        }
        if end <= start {
            return Err(invalid("end must be after start"));
        }
        if end - start > MINUTES_PER_DAY as i64 {
            return Err(invalid("window cannot be longer than a day"));
        }

        Ok(Self {
            start_minute: start as u32,
            end_minute: end as u32,
        })
    }

    /// Build a window the caller has already proven valid.
    pub(crate) fn from_parts(start_minute: u32, end_minute: u32) -> Self {
        debug_assert!(start_minute < MINUTES_PER_DAY && end_minute > start_minute);
        Self {
            start_minute,
            end_minute,
        }
    }

    /// The whole day, `[0, 1440)`.
    pub fn full_day() -> Self {
        Self {
            start_minute: 0,
            end_minute: MINUTES_PER_DAY,
        }
    }

    /// Build a window from the legacy whole-hour fields (`scheduleStartHour`,
    /// `scheduleEndHour`) still present on older banner records.
    ///
    /// Those records wrote a midnight-crossing end as a smaller hour (23 to 1),
    /// so an end at or before the start is read as the next day.
    pub fn from_legacy_hours(start_hour: u32, end_hour: u32) -> Result<Self> {
        Self::from_stored(start_hour as i64 * 60, end_hour as i64 * 60)
    }

    /// Build a window from stored minute values, moving an end at or before
    /// the start onto the next day.
    pub(crate) fn from_stored(start: i64, end: i64) -> Result<Self> {
        let end = if end <= start {
            end + MINUTES_PER_DAY as i64
        } else {
            end
        };
        Self::from_signed(start, end)
    }

    pub fn start_minute(&self) -> u32 {
        self.start_minute
    }

    /// Unwrapped end; may exceed 1440 for windows that cross midnight.
    pub fn end_minute(&self) -> u32 {
        self.end_minute
    }

    /// End as shown on a clock, `end_minute mod 1440`.
    pub fn normalized_end(&self) -> u32 {
        self.end_minute % MINUTES_PER_DAY
    }

    pub fn duration(&self) -> u32 {
        self.end_minute - self.start_minute
    }

    pub fn crosses_midnight(&self) -> bool {
        self.end_minute > MINUTES_PER_DAY
    }

    /// Overlap on the unwrapped minute line: `a.start < b.end && b.start < a.end`.
    ///
    /// Adjacent windows (one ends exactly where the other starts) do not
    /// overlap. Both windows must already be on the same line, i.e. a window
    /// that starts after midnight of the next day must be encoded past 1440.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start_minute < other.end_minute && other.start_minute < self.end_minute
    }

    /// Overlap on the day circle.
    ///
    /// Also compares against the other window shifted by a full day in either
    /// direction, so `[1380, 1500)` and `[30, 90)` overlap even though the
    /// second one was not written as `[1470, 1530)`.
    pub fn overlaps_within_day(&self, other: &TimeWindow) -> bool {
        if self.overlaps(other) {
            return true;
        }
        let (a_start, a_end) = (self.start_minute, self.end_minute);
        let (b_start, b_end) = (other.start_minute, other.end_minute);
        // other moved to the next day
        let next = a_start < b_end + MINUTES_PER_DAY && b_start + MINUTES_PER_DAY < a_end;
        // self moved to the next day
        let prev = a_start + MINUTES_PER_DAY < b_end && b_start < a_end + MINUTES_PER_DAY;
        next || prev
    }

    /// Minutes shared by the two windows on the day circle.
    pub fn overlap_minutes(&self, other: &TimeWindow) -> u32 {
        [0i64, MINUTES_PER_DAY as i64, -(MINUTES_PER_DAY as i64)]
            .iter()
            .map(|shift| {
                let b_start = other.start_minute as i64 + shift;
                let b_end = other.end_minute as i64 + shift;
                let lo = (self.start_minute as i64).max(b_start);
                let hi = (self.end_minute as i64).min(b_end);
                (hi - lo).max(0)
            })
            .sum::<i64>() as u32
    }

    /// Round both ends to the nearest multiple of `granularity` minutes.
    ///
    /// Stored windows are shown on a 15-minute grid. If rounding collapses the
    /// window, it keeps one grid step of length.
    pub fn snap(&self, granularity: u32) -> Result<Self> {
        if granularity == 0 {
            return Ok(*self);
        }
        let round = |m: u32| ((m + granularity / 2) / granularity) * granularity;
        let start = round(self.start_minute).min(MINUTES_PER_DAY - granularity.min(MINUTES_PER_DAY));
        let end = round(self.end_minute).max(start + granularity);
        Self::new(start, end.min(start + MINUTES_PER_DAY))
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}",
            crate::clock::minutes_to_clock(self.start_minute),
            crate::clock::minutes_to_clock(self.end_minute)
        )?;
        if self.crosses_midnight() {
            write!(f, " (+1d)")?;
        }
        Ok(())
    }
}
