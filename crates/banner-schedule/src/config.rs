//! Scheduling policy, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) yields the
//! dashboard's stock policy:
//!
//! ```toml
//! min_slot_minutes = 120
//! snap_minutes = 15
//! min_window_minutes = 15
//! max_update_retries = 3
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Result, ScheduleError};
use crate::resolver::DEFAULT_MIN_SLOT_MINUTES;
use crate::window::MINUTES_PER_DAY;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulePolicy {
    /// Shortest gap the resolver may offer when a proposal collides.
    #[serde(default = "default_min_slot_minutes")]
    pub min_slot_minutes: u32,
    /// Timeline grid, in minutes.
    #[serde(default = "default_snap_minutes")]
    pub snap_minutes: u32,
    /// Shortest window an edge drag may leave.
    #[serde(default = "default_min_window_minutes")]
    pub min_window_minutes: u32,
    /// Conditional-write retries after losing a race to another writer.
    #[serde(default = "default_max_update_retries")]
    pub max_update_retries: u32,
}

fn default_min_slot_minutes() -> u32 {
    DEFAULT_MIN_SLOT_MINUTES
}

fn default_snap_minutes() -> u32 {
    15
}

fn default_min_window_minutes() -> u32 {
    15
}

fn default_max_update_retries() -> u32 {
    3
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        Self {
            min_slot_minutes: default_min_slot_minutes(),
            snap_minutes: default_snap_minutes(),
            min_window_minutes: default_min_window_minutes(),
            max_update_retries: default_max_update_retries(),
        }
    }
}

impl SchedulePolicy {
    /// Parse and validate a policy from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let policy: SchedulePolicy = toml::from_str(content)
            .map_err(|e| ScheduleError::Config(format!("Failed to parse policy: {}", e)))?;
        policy.validate()?;
        Ok(policy)
    }

    /// Load a policy file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            ScheduleError::Config(format!(
                "Failed to read policy file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        let day = MINUTES_PER_DAY;
        if self.min_slot_minutes == 0 || self.min_slot_minutes > day {
            return Err(ScheduleError::Config(format!(
                "min_slot_minutes must be within 1..={}, got {}",
                day, self.min_slot_minutes
            )));
        }
        if self.snap_minutes == 0 || self.snap_minutes > 60 {
            return Err(ScheduleError::Config(format!(
                "snap_minutes must be within 1..=60, got {}",
                self.snap_minutes
            )));
        }
        if self.min_window_minutes == 0 || self.min_window_minutes > day {
            return Err(ScheduleError::Config(format!(
                "min_window_minutes must be within 1..={}, got {}",
                day, self.min_window_minutes
            )));
        }
        Ok(())
    }
}
