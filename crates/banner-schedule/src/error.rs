//! Error types for banner scheduling operations.
//!
//! A proposal that finds no free slot is not an error: it is
//! [`ResolveResult::NoSpace`](crate::resolver::ResolveResult::NoSpace).
//! Everything here is either malformed input or a store-level failure.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Invalid window [{start}, {end}): {reason}")]
    InvalidWindow { start: i64, end: i64, reason: String },

    #[error("Invalid minimum duration: {0} minutes")]
    InvalidDuration(u32),

    #[error("Invalid clock time '{0}': expected HH:MM")]
    InvalidClock(String),

    #[error("Banner '{0}' has no schedule")]
    NotScheduled(String),

    #[error("Banner '{0}' not found")]
    NotFound(String),

    /// The window overlaps another active banner.
    #[error("Window conflicts with banner '{conflicting_id}'{}", title_suffix(.title))]
    Conflict {
        conflicting_id: String,
        title: Option<String>,
    },

    /// A conditional write lost the race against another writer.
    #[error("Banner '{id}' was modified concurrently (expected version {expected}, found {found})")]
    VersionConflict { id: String, expected: u64, found: u64 },

    /// The store changed after the snapshot a decision was based on.
    #[error("Store changed since snapshot (expected revision {expected}, found {found})")]
    StaleSnapshot { expected: u64, found: u64 },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ScheduleError {
    fn from(e: serde_json::Error) -> Self {
        ScheduleError::Serialization(e.to_string())
    }
}

fn title_suffix(title: &Option<String>) -> String {
    match title {
        Some(t) => format!(" (\"{}\")", t),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
