//! # banner-schedule
//!
//! Conflict-free daily display windows for promotional banners.
//!
//! A merchant can run several banners, each shown inside a window of the day.
//! Only one banner may be live at any minute, so activating a banner is gated
//! by a first-fit gap search across the 24-hour day. The search is a pure
//! function over a snapshot of the other active windows; persisting the
//! outcome goes through a [`store::ScheduleStore`] with versioned,
//! conditional writes.
//!
//! ## Modules
//!
//! - [`window`]: `TimeWindow` as minute offsets from midnight, midnight-crossing aware
//! - [`gaps`]: Free gaps between active windows across the day
//! - [`resolver`]: Decide whether a proposed window can go live
//! - [`conflict`]: Name the banner a proposed window collides with
//! - [`schedule`]: Per-banner lifecycle (unscheduled / inactive / active)
//! - [`drag`]: Move or resize a window with snapping
//! - [`clock`]: `HH:MM` strings and 12-hour display
//! - [`record`]: Stored banner documents and the legacy field layout
//! - [`store`]: Store adapter trait and an in-memory implementation
//! - [`scheduler`]: Store-backed transitions with conditional writes and retries
//! - [`config`]: `SchedulePolicy` loaded from TOML
//! - [`error`]: Error types

pub mod clock;
pub mod config;
pub mod conflict;
pub mod drag;
pub mod error;
pub mod gaps;
pub mod record;
pub mod resolver;
pub mod schedule;
pub mod scheduler;
pub mod store;
pub mod window;

pub use clock::{format_12h, minutes_to_clock, parse_clock, ClockRange};
pub use config::SchedulePolicy;
pub use conflict::{find_conflict, Conflict};
pub use drag::{drag, snap_pointer, DragHandle};
pub use error::ScheduleError;
pub use gaps::{first_free_gap, free_gaps, FreeGap};
pub use record::BannerRecord;
pub use resolver::{
    resolve, resolve_activation, resolve_request, ActivationOutcome, ActivationRequest,
    ResolveResult, DEFAULT_MIN_SLOT_MINUTES,
};
pub use schedule::{Activation, BannerSchedule, ScheduleState};
pub use scheduler::BannerScheduler;
pub use store::{list_active_windows, InMemoryStore, ScheduleStore};
pub use window::{TimeWindow, MINUTES_PER_DAY};
