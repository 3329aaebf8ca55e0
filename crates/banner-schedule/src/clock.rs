//! Conversions between minute offsets and wall-clock strings.
//!
//! Banner records carry `startTime`/`endTime` as zero-padded 24-hour `HH:MM`
//! strings next to the minute fields. User-facing messages use the 12-hour
//! form (`9:05 AM`).

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::window::{TimeWindow, MINUTES_PER_DAY};

/// Format a minute offset as `HH:MM`, wrapping past midnight.
pub fn minutes_to_clock(minutes: u32) -> String {
    let m = minutes % MINUTES_PER_DAY;
    format!("{:02}:{:02}", m / 60, m % 60)
}

/// Parse a 24-hour `HH:MM` string into a minute offset in `[0, 1440)`.
pub fn parse_clock(s: &str) -> Result<u32> {
    let time = NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| ScheduleError::InvalidClock(s.to_string()))?;
    Ok(time.hour() * 60 + time.minute())
}

/// Format a minute offset as a 12-hour clock reading, e.g. `12:00 AM`, `1:30 PM`.
pub fn format_12h(minutes: u32) -> String {
    let m = minutes % MINUTES_PER_DAY;
    let (hours, mins) = (m / 60, m % 60);
    let period = if hours < 12 { "AM" } else { "PM" };
    let display_hours = match hours % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", display_hours, mins, period)
}

/// A window as a pair of wall-clock strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockRange {
    pub start_time: String,
    pub end_time: String,
    /// The end reading belongs to the following day (`end >= 1440`).
    pub ends_next_day: bool,
}

impl ClockRange {
    /// Convert raw minute offsets. `end_minute` may run past midnight.
    pub fn from_minutes(start_minute: u32, end_minute: u32) -> Self {
        Self {
            start_time: minutes_to_clock(start_minute),
            end_time: minutes_to_clock(end_minute),
            ends_next_day: end_minute >= MINUTES_PER_DAY,
        }
    }

    /// Convert back to `(start, end)` minute offsets on the unwrapped line.
    pub fn to_minutes(&self) -> Result<(u32, u32)> {
        let start = parse_clock(&self.start_time)?;
        let mut end = parse_clock(&self.end_time)?;
        if self.ends_next_day {
            end += MINUTES_PER_DAY;
        }
        Ok((start, end))
    }

    pub fn to_window(&self) -> Result<TimeWindow> {
        let (start, end) = self.to_minutes()?;
        TimeWindow::new(start, end)
    }
}

impl From<&TimeWindow> for ClockRange {
    fn from(w: &TimeWindow) -> Self {
        Self::from_minutes(w.start_minute(), w.end_minute())
    }
}
