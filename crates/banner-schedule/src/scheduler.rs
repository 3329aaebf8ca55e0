//! Lifecycle transitions against a store.
//!
//! Each operation reads the banner and, for activation, a snapshot of the
//! other active windows; computes the next schedule with the pure model; then
//! writes it back conditionally on what it read: the banner's version for
//! single-banner transitions, the store revision when other banners' windows
//! were consulted. If another writer got there first the whole
//! read-resolve-write is retried on fresh data, up to `max_update_retries`
//! times. Nothing is written when resolution refuses.

use tracing::{debug, info, warn};

use crate::config::SchedulePolicy;
use crate::conflict;
use crate::error::{Result, ScheduleError};
use crate::record::BannerRecord;
use crate::resolver::{ActivationOutcome, ResolveResult};
use crate::schedule::{BannerSchedule, ScheduleState};
use crate::store::{self, ScheduleStore};
use crate::window::TimeWindow;

pub struct BannerScheduler<S> {
    store: S,
    policy: SchedulePolicy,
}

impl<S: ScheduleStore> BannerScheduler<S> {
    pub fn new(store: S, policy: SchedulePolicy) -> Self {
        Self { store, policy }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn policy(&self) -> &SchedulePolicy {
        &self.policy
    }

    /// Create a banner record with no schedule.
    pub fn create(&self, id: &str, title: Option<String>) -> Result<BannerRecord> {
        let record = self.store.insert(BannerRecord::new(id, title))?;
        info!(banner_id = id, "banner created");
        Ok(record)
    }

    pub fn schedule_of(&self, id: &str) -> Result<BannerSchedule> {
        self.store.get(id)?.to_schedule()
    }

    /// The banner's window on the timeline grid, `None` if unscheduled.
    pub fn timeline_window(&self, id: &str) -> Result<Option<TimeWindow>> {
        let record = self.store.get(id)?;
        if !record.to_schedule()?.is_scheduled() {
            return Ok(None);
        }
        record.timeline_window(self.policy.snap_minutes)
    }

    /// Assign a window without any conflict check.
    pub fn schedule(&self, id: &str, window: TimeWindow) -> Result<BannerSchedule> {
        self.transition(id, |schedule| Ok(schedule.schedule(window)))
    }

    /// Activate a banner, moving it into a free gap if its window collides.
    ///
    /// Returns the resolver's decision. `NoSpace` leaves the record untouched.
    pub fn activate(&self, id: &str) -> Result<ActivationOutcome> {
        let min_slot = self.policy.min_slot_minutes;
        self.with_retries(id, || {
            let revision = self.store.revision()?;
            let record = self.store.get(id)?;
            let others: Vec<TimeWindow> = store::list_active_windows(&self.store, id)?
                .into_iter()
                .map(|(_, w)| w)
                .collect();

            let activation = record.to_schedule()?.activate(&others, min_slot)?;
            let outcome = activation.outcome;
            if outcome == ResolveResult::NoSpace {
                warn!(banner_id = id, active = others.len(), min_slot, "no free slot for banner");
                return Ok(outcome.into());
            }

            self.store
                .update_at_revision(record.with_schedule(&activation.schedule), revision)?;
            Ok(outcome.into())
        })
    }

    pub fn deactivate(&self, id: &str) -> Result<BannerSchedule> {
        self.transition(id, |schedule| Ok(schedule.deactivate()))
    }

    pub fn unschedule(&self, id: &str) -> Result<BannerSchedule> {
        self.transition(id, |schedule| Ok(schedule.unschedule()))
    }

    /// Move a banner's window, as when its bar is dragged on the timeline.
    ///
    /// An active banner stays active but may not be moved onto another active
    /// banner: that is refused with [`ScheduleError::Conflict`] naming the
    /// banner in the way. An inactive banner moves freely.
    pub fn reschedule(&self, id: &str, window: TimeWindow) -> Result<BannerSchedule> {
        self.with_retries(id, || {
            let revision = self.store.revision()?;
            let record = self.store.get(id)?;
            let schedule = record.to_schedule()?;

            let next = if schedule.is_active() {
                let others = store::list_active_windows(&self.store, id)?;
                if let Some(found) = conflict::find_conflict(id, &window, &others) {
                    let title = self.store.get(&found.banner_id).ok().and_then(|r| r.title);
                    debug!(
                        banner_id = id,
                        conflicting = %found.banner_id,
                        overlap_minutes = found.overlap_minutes,
                        "reschedule refused"
                    );
                    return Err(ScheduleError::Conflict {
                        conflicting_id: found.banner_id,
                        title,
                    });
                }
                BannerSchedule::with_state(id, ScheduleState::Active(window))
            } else {
                schedule.schedule(window)
            };

            self.store
                .update_at_revision(record.with_schedule(&next), revision)?;
            Ok(next)
        })
    }

    fn transition<F>(&self, id: &str, step: F) -> Result<BannerSchedule>
    where
        F: Fn(BannerSchedule) -> Result<BannerSchedule>,
    {
        self.with_retries(id, || {
            let record = self.store.get(id)?;
            let next = step(record.to_schedule()?)?;
            let expected = record.version;
            self.store.update(record.with_schedule(&next), expected)?;
            Ok(next)
        })
    }

    fn with_retries<T, F>(&self, id: &str, mut attempt: F) -> Result<T>
    where
        F: FnMut() -> Result<T>,
    {
        let mut retries = 0;
        loop {
            match attempt() {
                Err(
                    ScheduleError::VersionConflict {
                        expected, found, ..
                    }
                    | ScheduleError::StaleSnapshot { expected, found },
                ) if retries < self.policy.max_update_retries => {
                    retries += 1;
                    debug!(banner_id = id, expected, found, retries, "lost write race, retrying");
                }
                other => return other,
            }
        }
    }
}
