//! Decide whether a banner may go live in its proposed window.
//!
//! Only other banners that are both scheduled and active block a proposal;
//! scheduled-but-inactive banners never do. When the proposal collides, the
//! first free gap of the day that is long enough is offered instead.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ScheduleError};
use crate::gaps;
use crate::window::TimeWindow;

/// Default minimum length of an adjusted slot: two hours.
pub const DEFAULT_MIN_SLOT_MINUTES: u32 = 120;

/// Outcome of [`resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveResult {
    /// The proposal overlaps nothing and is kept as given.
    Accepted(TimeWindow),
    /// The proposal collided; this free gap was found instead.
    Adjusted(TimeWindow),
    /// The proposal collided and no gap of the minimum length exists.
    NoSpace,
}

impl ResolveResult {
    /// The window to persist, if activation may proceed.
    pub fn window(&self) -> Option<TimeWindow> {
        match self {
            ResolveResult::Accepted(w) | ResolveResult::Adjusted(w) => Some(*w),
            ResolveResult::NoSpace => None,
        }
    }

    pub fn is_no_space(&self) -> bool {
        matches!(self, ResolveResult::NoSpace)
    }
}

/// Resolve a proposed window against the windows of the other active banners.
///
/// 1. No active windows, or no overlap with any of them: `Accepted(proposed)`.
/// 2. Otherwise the first gap (ascending start) of at least
///    `min_duration_minutes`: `Adjusted(gap)`. The whole gap is returned, not
///    a slice of the minimum length.
/// 3. Otherwise `NoSpace`.
///
/// Overlap is tested on the day circle, so a proposal at 00:30 collides with
/// an active window running 23:00–01:00. Pure: no input is mutated and the same
/// inputs always give the same result.
pub fn resolve(
    proposed: TimeWindow,
    active_windows: &[TimeWindow],
    min_duration_minutes: u32,
) -> ResolveResult {
    let collides = active_windows
        .iter()
        .any(|active| proposed.overlaps_within_day(active));

    if !collides {
        return ResolveResult::Accepted(proposed);
    }

    match gaps::first_free_gap(active_windows, min_duration_minutes) {
        Some(gap) => ResolveResult::Adjusted(gap.window()),
        None => ResolveResult::NoSpace,
    }
}

/// Wire form of a resolution, as handed back to the dashboard.
///
/// Serializes as `{"outcome":"accepted","window":{...}}`,
/// `{"outcome":"adjusted","window":{...}}` or `{"outcome":"no_space"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActivationOutcome {
    Accepted { window: TimeWindow },
    Adjusted { window: TimeWindow },
    NoSpace,
}

impl From<ResolveResult> for ActivationOutcome {
    fn from(result: ResolveResult) -> Self {
        match result {
            ResolveResult::Accepted(window) => ActivationOutcome::Accepted { window },
            ResolveResult::Adjusted(window) => ActivationOutcome::Adjusted { window },
            ResolveResult::NoSpace => ActivationOutcome::NoSpace,
        }
    }
}

/// Request body accepted by [`resolve_request`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationRequest {
    pub banner_id: String,
    pub proposed_window: TimeWindow,
    #[serde(default)]
    pub other_active_windows: Vec<TimeWindow>,
    #[serde(default = "default_min_slot")]
    pub min_slot_minutes: u32,
}

fn default_min_slot() -> u32 {
    DEFAULT_MIN_SLOT_MINUTES
}

/// Resolve activation of `banner_id` from raw minute pairs.
///
/// Malformed input (a zero-length or out-of-range window, a zero minimum) is
/// an error; a crowded day is not, it is [`ActivationOutcome::NoSpace`].
pub fn resolve_activation(
    banner_id: &str,
    proposed_window: (i64, i64),
    other_active_windows: &[(i64, i64)],
    min_slot_minutes: u32,
) -> Result<ActivationOutcome> {
    let proposed = TimeWindow::from_signed(proposed_window.0, proposed_window.1)?;
    let others = other_active_windows
        .iter()
        .map(|&(start, end)| TimeWindow::from_signed(start, end))
        .collect::<Result<Vec<_>>>()?;

    resolve_checked(banner_id, proposed, &others, min_slot_minutes)
}

/// Resolve an [`ActivationRequest`]. Windows were validated on deserialization.
pub fn resolve_request(request: &ActivationRequest) -> Result<ActivationOutcome> {
    resolve_checked(
        &request.banner_id,
        request.proposed_window,
        &request.other_active_windows,
        request.min_slot_minutes,
    )
}

fn resolve_checked(
    banner_id: &str,
    proposed: TimeWindow,
    others: &[TimeWindow],
    min_slot_minutes: u32,
) -> Result<ActivationOutcome> {
    if min_slot_minutes == 0 {
        return Err(ScheduleError::InvalidDuration(min_slot_minutes));
    }

    let result = resolve(proposed, others, min_slot_minutes);
    debug!(
        banner_id,
        proposed = %proposed,
        active = others.len(),
        min_slot_minutes,
        ?result,
        "resolved activation"
    );
    Ok(result.into())
}
