//! Stored banner documents.
//!
//! A banner document carries its schedule in several overlapping shapes that
//! accumulated over time: minute offsets, whole-hour fields from older
//! releases, `HH:MM` strings, and a `scheduled` flag that duplicates the
//! presence of a window. Reading collapses all of that to a
//! [`BannerSchedule`]; writing fans the schedule back out to every field so
//! older readers keep working. Fields this crate does not know about are
//! preserved untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::clock::minutes_to_clock;
use crate::error::Result;
use crate::schedule::{BannerSchedule, ScheduleState};
use crate::window::{TimeWindow, MINUTES_PER_DAY};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    /// `None` on records written before the flag existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_start_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_end_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_start_hour: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_end_hour: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// Bumped by the store on every successful write.
    #[serde(default)]
    pub version: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BannerRecord {
    /// A newly created banner: not scheduled, not active.
    pub fn new(id: impl Into<String>, title: Option<String>) -> Self {
        Self {
            id: id.into(),
            title,
            is_active: false,
            scheduled: Some(false),
            schedule_start_minutes: None,
            schedule_end_minutes: None,
            schedule_start_hour: None,
            schedule_end_hour: None,
            start_time: None,
            end_time: None,
            version: 0,
            extra: Map::new(),
        }
    }

    /// The stored window, preferring minute fields over legacy hour fields.
    ///
    /// A missing start defaults to midnight and a missing end to the end of
    /// the day. Legacy data that wrote a midnight-crossing end as a smaller
    /// number (`23:00`–`01:00` as `1380`/`60`) is moved onto the next day.
    pub fn stored_window(&self) -> Result<Option<TimeWindow>> {
        if self.schedule_start_minutes.is_none() && self.schedule_end_minutes.is_none() {
            if let (Some(start_hour), Some(end_hour)) =
                (self.schedule_start_hour, self.schedule_end_hour)
            {
                return TimeWindow::from_legacy_hours(start_hour, end_hour).map(Some);
            }
        }

        let hour = |h: u32| h as i64 * 60;
        let start = self
            .schedule_start_minutes
            .map(i64::from)
            .or(self.schedule_start_hour.map(hour));
        let end = self
            .schedule_end_minutes
            .map(i64::from)
            .or(self.schedule_end_hour.map(hour));

        if start.is_none() && end.is_none() {
            return Ok(None);
        }

        let start = start.unwrap_or(0);
        let end = end.unwrap_or(MINUTES_PER_DAY as i64);
        TimeWindow::from_stored(start, end).map(Some)
    }

    /// The stored window rounded to the timeline grid, as the dashboard shows
    /// it.
    pub fn timeline_window(&self, snap_minutes: u32) -> Result<Option<TimeWindow>> {
        self.stored_window()?
            .map(|w| w.snap(snap_minutes))
            .transpose()
    }

    /// Collapse the stored fields into a schedule.
    ///
    /// An explicit `scheduled: false` wins over everything else, including
    /// a leftover `isActive`. An active banner without any window fields is
    /// live all day.
    pub fn to_schedule(&self) -> Result<BannerSchedule> {
        if self.scheduled == Some(false) {
            return Ok(BannerSchedule::new(self.id.clone()));
        }
        let window = self.stored_window()?;
        let state = match (self.is_active, window) {
            (true, Some(w)) => ScheduleState::Active(w),
            (true, None) => ScheduleState::Active(TimeWindow::full_day()),
            (false, Some(w)) => ScheduleState::Inactive(w),
            (false, None) => ScheduleState::Unscheduled,
        };
        Ok(BannerSchedule::with_state(self.id.clone(), state))
    }

    /// Write `schedule` into every schedule field of this record.
    ///
    /// The version is left alone; the store bumps it on write.
    pub fn with_schedule(mut self, schedule: &BannerSchedule) -> Self {
        self.is_active = schedule.is_active();
        self.scheduled = Some(schedule.is_scheduled());

        match schedule.window() {
            Some(w) => {
                self.schedule_start_minutes = Some(w.start_minute());
                self.schedule_end_minutes = Some(w.end_minute());
                self.schedule_start_hour = Some(w.start_minute() / 60);
                self.schedule_end_hour = Some(w.end_minute().div_ceil(60));
                self.start_time = Some(minutes_to_clock(w.start_minute()));
                self.end_time = Some(minutes_to_clock(w.normalized_end()));
            }
            None => {
                self.schedule_start_minutes = None;
                self.schedule_end_minutes = None;
                self.schedule_start_hour = None;
                self.schedule_end_hour = None;
                self.start_time = None;
                self.end_time = None;
            }
        }
        self
    }
}
