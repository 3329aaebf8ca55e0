//! Name the banner a window collides with.
//!
//! Used when an active banner's window is moved on the timeline: the move is
//! refused and the merchant is told which banner is in the way.
//! Adjacent windows (one ends exactly when another starts) are NOT conflicts.

use crate::window::TimeWindow;

/// An active banner whose window overlaps the one being placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub banner_id: String,
    pub window: TimeWindow,
    pub overlap_minutes: u32,
}

/// Find the first banner in `others`, other than `banner_id` itself, whose
/// window overlaps `window` on the day circle.
pub fn find_conflict(
    banner_id: &str,
    window: &TimeWindow,
    others: &[(String, TimeWindow)],
) -> Option<Conflict> {
    others
        .iter()
        .filter(|(id, _)| id != banner_id)
        .find(|(_, other)| window.overlaps_within_day(other))
        .map(|(id, other)| Conflict {
            banner_id: id.clone(),
            window: *other,
            overlap_minutes: window.overlap_minutes(other),
        })
}
