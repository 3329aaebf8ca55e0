//! Timeline edits: move a window or drag one of its edges.
//!
//! The pointer position is snapped to the policy grid and kept on the visible
//! day. Edge drags never shrink the window below `min_window_minutes`; a move
//! keeps the duration and stops at midnight.

use crate::config::SchedulePolicy;
use crate::error::Result;
use crate::window::{TimeWindow, MINUTES_PER_DAY};

/// Which part of the window is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragHandle {
    Start,
    End,
    Move,
}

/// Snap a pointer minute to the nearest grid step, clamped to
/// `[0, 1440 - step]`.
pub fn snap_pointer(pointer_minute: i64, step: u32) -> i64 {
    let step = step.max(1) as i64;
    let snapped = (pointer_minute + step / 2).div_euclid(step) * step;
    snapped.clamp(0, MINUTES_PER_DAY as i64 - step)
}

/// Apply a drag of `handle` to `pointer_minute` and return the new window.
///
/// The pointer lives on a single day, so an `End` drag on a window that runs
/// past midnight pulls the end back to 24:00 at the latest and the part after
/// midnight is dropped. A `Start` drag leaves the end where it is; pulling the
/// start of a long crossing window earlier can stretch it past a full day,
/// which fails with [`ScheduleError::InvalidWindow`](crate::ScheduleError::InvalidWindow).
pub fn drag(
    window: &TimeWindow,
    handle: DragHandle,
    pointer_minute: i64,
    policy: &SchedulePolicy,
) -> Result<TimeWindow> {
    let position = snap_pointer(pointer_minute, policy.snap_minutes);
    let start = window.start_minute() as i64;
    let end = window.end_minute() as i64;
    let min_len = policy.min_window_minutes.max(1) as i64;

    let (new_start, new_end) = match handle {
        DragHandle::Start => (position.min(end - min_len).max(0), end),
        DragHandle::End => {
            let step = policy.snap_minutes.max(1) as i64;
            (start, (position + step).max(start + min_len))
        }
        DragHandle::Move => {
            let duration = end - start;
            let new_start = position.min(MINUTES_PER_DAY as i64 - duration).max(0);
            (new_start, new_start + duration)
        }
    };

    TimeWindow::from_signed(new_start, new_end)
}
