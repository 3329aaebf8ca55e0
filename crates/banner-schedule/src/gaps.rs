//! Free gaps between active windows across the day.
//!
//! Sorts a copy of the active windows by start, then sweeps left to right
//! tracking the furthest end seen so far. Every stretch between that end and
//! the next start is a gap; the stretch after the last end up to midnight is
//! the tail gap. The stretch from midnight to the first active window (the
//! leading gap) is where the sweep wraps around to, so it is tried last.

use serde::Serialize;

use crate::window::{TimeWindow, MINUTES_PER_DAY};

/// An unoccupied stretch of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeGap {
    pub start_minute: u32,
    pub end_minute: u32,
    pub duration_minutes: u32,
}

impl FreeGap {
    fn new(start: i64, end: i64) -> Self {
        Self {
            start_minute: start as u32,
            end_minute: end as u32,
            duration_minutes: (end - start) as u32,
        }
    }

    /// The gap as a window. Gaps are non-empty and start before midnight.
    pub fn window(&self) -> TimeWindow {
        TimeWindow::from_parts(self.start_minute, self.end_minute)
    }
}

/// Gaps split by where the sweep finds them.
struct Sweep {
    /// Midnight (or the wrapped end of a midnight-crossing window) up to the
    /// first active window.
    leading: Option<FreeGap>,
    /// Gaps between windows, then the tail gap, in ascending order.
    following: Vec<FreeGap>,
}

/// Windows that cross midnight also occupy the start of the same day, up to
/// `end - 1440`.
fn wrapped_carry(windows: &[TimeWindow]) -> i64 {
    windows
        .iter()
        .map(|w| w.end_minute() as i64 - MINUTES_PER_DAY as i64)
        .max()
        .unwrap_or(0)
        .max(0)
}

fn sweep(active: &[TimeWindow]) -> Sweep {
    let mut sorted = active.to_vec();
    sorted.sort_by_key(|w| (w.start_minute(), w.end_minute()));

    let carry = wrapped_carry(active);
    let leading = sorted
        .first()
        .map(|first| first.start_minute() as i64)
        .filter(|&first_start| first_start > carry)
        .map(|first_start| FreeGap::new(carry, first_start));

    let mut following = Vec::new();
    let mut previous_end = match sorted.first() {
        Some(first) => carry.max(first.start_minute() as i64),
        None => 0,
    };

    for window in &sorted {
        let start = window.start_minute() as i64;
        if start > previous_end {
            following.push(FreeGap::new(previous_end, start));
        }
        previous_end = previous_end.max(window.end_minute() as i64);
    }

    let day_end = MINUTES_PER_DAY as i64;
    if previous_end < day_end {
        following.push(FreeGap::new(previous_end, day_end));
    }

    Sweep { leading, following }
}

/// Every free gap of the day, in ascending order of start.
///
/// With no active windows the whole day `[0, 1440)` is a single gap.
pub fn free_gaps(active: &[TimeWindow]) -> Vec<FreeGap> {
    let Sweep { leading, following } = sweep(active);
    leading.into_iter().chain(following).collect()
}

/// The first gap, in sweep order, that is at least `min_duration_minutes`
/// long.
///
/// Sweep order starts at the earliest active window and runs forward to
/// midnight, then wraps to the leading gap. First-fit: a later, larger gap
/// never wins over an earlier one that is big enough. A minimum of 0 is
/// treated as 1 minute so an empty gap is never returned.
pub fn first_free_gap(active: &[TimeWindow], min_duration_minutes: u32) -> Option<FreeGap> {
    let min = min_duration_minutes.max(1);
    let Sweep { leading, following } = sweep(active);
    following
        .into_iter()
        .chain(leading)
        .find(|gap| gap.duration_minutes >= min)
}
