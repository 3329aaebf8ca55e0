//! Per-banner schedule lifecycle.
//!
//! ```text
//! Unscheduled --schedule--> Inactive(w) --activate--> Active(w')
//!      ^                        ^  |                     |
//!      |                        |  +-----schedule--------+ (new window, inactive)
//!      +-------unschedule-------+-------deactivate-------+
//! ```
//!
//! Values are never mutated in place: every transition consumes the schedule
//! and returns the next one.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Result, ScheduleError};
use crate::resolver::{self, ResolveResult};
use crate::window::TimeWindow;

/// Where a banner is in its lifecycle. An active banner always has a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "window", rename_all = "snake_case")]
pub enum ScheduleState {
    Unscheduled,
    Inactive(TimeWindow),
    Active(TimeWindow),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerSchedule {
    banner_id: String,
    state: ScheduleState,
}

/// Result of [`BannerSchedule::activate`]: the next schedule plus what the
/// resolver decided. On `NoSpace` the schedule is returned unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub schedule: BannerSchedule,
    pub outcome: ResolveResult,
}

impl BannerSchedule {
    /// A freshly created banner has no schedule.
    pub fn new(banner_id: impl Into<String>) -> Self {
        Self {
            banner_id: banner_id.into(),
            state: ScheduleState::Unscheduled,
        }
    }

    pub fn with_state(banner_id: impl Into<String>, state: ScheduleState) -> Self {
        Self {
            banner_id: banner_id.into(),
            state,
        }
    }

    pub fn banner_id(&self) -> &str {
        &self.banner_id
    }

    pub fn state(&self) -> ScheduleState {
        self.state
    }

    pub fn window(&self) -> Option<TimeWindow> {
        match self.state {
            ScheduleState::Unscheduled => None,
            ScheduleState::Inactive(w) | ScheduleState::Active(w) => Some(w),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, ScheduleState::Active(_))
    }

    pub fn is_scheduled(&self) -> bool {
        !matches!(self.state, ScheduleState::Unscheduled)
    }

    /// Assign a window. Always legal and never checked for conflicts; an
    /// active banner given a new window drops back to inactive and has to be
    /// activated again.
    pub fn schedule(self, window: TimeWindow) -> Self {
        debug!(banner_id = %self.banner_id, %window, "scheduled");
        Self {
            state: ScheduleState::Inactive(window),
            ..self
        }
    }

    /// Take the banner live, gated by the resolver.
    ///
    /// `others` are the windows of the *other* active banners.
    /// `Accepted` and `Adjusted` both leave the banner active with the
    /// resolved window; `NoSpace` leaves it exactly as it was. Activating an
    /// already-active banner is a no-op reported as `Accepted`.
    ///
    /// # Errors
    /// `NotScheduled` if the banner has no window yet.
    pub fn activate(self, others: &[TimeWindow], min_duration_minutes: u32) -> Result<Activation> {
        let state = self.state;
        let window = match state {
            ScheduleState::Unscheduled => {
                return Err(ScheduleError::NotScheduled(self.banner_id));
            }
            ScheduleState::Active(w) => {
                return Ok(Activation {
                    schedule: self,
                    outcome: ResolveResult::Accepted(w),
                });
            }
            ScheduleState::Inactive(w) => w,
        };

        let outcome = resolver::resolve(window, others, min_duration_minutes);
        let schedule = match outcome.window() {
            Some(resolved) => {
                info!(banner_id = %self.banner_id, window = %resolved, ?outcome, "activated");
                Self {
                    state: ScheduleState::Active(resolved),
                    ..self
                }
            }
            None => {
                info!(banner_id = %self.banner_id, %window, "activation refused: no free slot");
                self
            }
        };

        Ok(Activation { schedule, outcome })
    }

    /// Take the banner off the air, keeping its window. No-op unless active.
    pub fn deactivate(self) -> Self {
        let state = self.state;
        match state {
            ScheduleState::Active(w) => {
                debug!(banner_id = %self.banner_id, "deactivated");
                Self {
                    state: ScheduleState::Inactive(w),
                    ..self
                }
            }
            _ => self,
        }
    }

    /// Drop the window and the active flag.
    pub fn unschedule(self) -> Self {
        debug!(banner_id = %self.banner_id, "unscheduled");
        Self {
            state: ScheduleState::Unscheduled,
            ..self
        }
    }
}
