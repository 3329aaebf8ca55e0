//! `bannersched` CLI: resolve activation requests and manage a file of banner
//! records from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Resolve one request (stdin → stdout)
//! echo '{"bannerId":"b1","proposedWindow":{"startMinute":540,"endMinute":600}}' | bannersched resolve
//!
//! # Lifecycle on a JSON store file
//! bannersched --store banners.json create --id b1 --title "Summer sale"
//! bannersched --store banners.json schedule --id b1 --start 23:00 --end 01:00
//! bannersched --store banners.json activate --id b1
//! bannersched --store banners.json drag --id b1 --handle move --at 09:00
//! bannersched --store banners.json deactivate --id b1
//!
//! # Inspect the day
//! bannersched --store banners.json show
//! bannersched --store banners.json gaps --min 60
//!
//! # Custom policy, verbose logging
//! bannersched --config policy.toml -vv --store banners.json activate --id b1
//! ```

use anyhow::{bail, Context, Result};
use banner_schedule::{
    drag, format_12h, free_gaps, list_active_windows, parse_clock, ActivationOutcome,
    ActivationRequest, BannerRecord, BannerScheduler, ClockRange, DragHandle, InMemoryStore,
    SchedulePolicy, ScheduleState, TimeWindow,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "bannersched",
    version,
    about = "Conflict-free daily display windows for banners"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Banner store file (JSON array of banner records)
    #[arg(long, global = true)]
    store: Option<String>,

    /// Scheduling policy file (TOML)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log more (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an activation request JSON against the windows it carries
    Resolve {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Add an unscheduled banner to the store
    Create {
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: Option<String>,
    },
    /// Assign a window (HH:MM, an end at or before the start means the next day)
    Schedule {
        #[arg(long)]
        id: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    /// Activate a banner, moving it to a free gap if its window collides
    Activate {
        #[arg(long)]
        id: String,
    },
    /// Stop showing a banner, keeping its window
    Deactivate {
        #[arg(long)]
        id: String,
    },
    /// Clear a banner's window
    Unschedule {
        #[arg(long)]
        id: String,
    },
    /// Move a banner's window, refusing to land on another active banner
    Reschedule {
        #[arg(long)]
        id: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    /// Drag a banner's window edge or body to a time, snapped to the policy grid
    Drag {
        #[arg(long)]
        id: String,
        #[arg(long, value_enum)]
        handle: Handle,
        /// Pointer time, HH:MM
        #[arg(long)]
        at: String,
    },
    /// List banners with their windows
    Show,
    /// Print the free gaps between active banners as JSON
    Gaps {
        /// Only gaps at least this many minutes long
        #[arg(long)]
        min: Option<u32>,
        /// Leave this banner out of the active set
        #[arg(long)]
        exclude: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Handle {
    Start,
    End,
    Move,
}

impl From<Handle> for DragHandle {
    fn from(handle: Handle) -> Self {
        match handle {
            Handle::Start => DragHandle::Start,
            Handle::End => DragHandle::End,
            Handle::Move => DragHandle::Move,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let policy = match cli.config.as_deref() {
        Some(path) => SchedulePolicy::from_file(path)?,
        None => SchedulePolicy::default(),
    };
    debug!(?policy, "policy loaded");

    match cli.command {
        Commands::Resolve { input, output } => {
            let json = read_input(input.as_deref())?;
            let request: ActivationRequest =
                serde_json::from_str(&json).context("Failed to parse activation request")?;
            let outcome = banner_schedule::resolve_request(&request)?;
            let pretty = serde_json::to_string_pretty(&outcome)?;
            write_output(output.as_deref(), &pretty)?;
        }
        Commands::Show => {
            let path = store_path(cli.store.as_deref())?;
            for record in load_records(path)? {
                println!("{}", describe(&record, policy.snap_minutes));
            }
        }
        Commands::Gaps { min, exclude } => {
            let path = store_path(cli.store.as_deref())?;
            let store = InMemoryStore::from_records(load_records(path)?);
            let exclude = exclude.as_deref().unwrap_or("");
            let active: Vec<TimeWindow> = list_active_windows(&store, exclude)?
                .into_iter()
                .map(|(_, w)| w)
                .collect();
            let gaps: Vec<_> = free_gaps(&active)
                .into_iter()
                .filter(|g| g.duration_minutes >= min.unwrap_or(1))
                .collect();
            println!("{}", serde_json::to_string_pretty(&gaps)?);
        }
        Commands::Create { id, title } => {
            with_scheduler(cli.store.as_deref(), policy, |s| {
                s.create(&id, title)?;
                println!("created {}", id);
                Ok(true)
            })?;
        }
        Commands::Schedule { id, start, end } => {
            let window = window_from_clock(&start, &end)?;
            with_scheduler(cli.store.as_deref(), policy, |s| {
                s.schedule(&id, window)?;
                println!("{} scheduled {}", id, window);
                Ok(true)
            })?;
        }
        Commands::Activate { id } => {
            with_scheduler(cli.store.as_deref(), policy, |s| {
                let outcome = s.activate(&id)?;
                println!("{}", serde_json::to_string(&outcome)?);
                Ok(outcome != ActivationOutcome::NoSpace)
            })?;
        }
        Commands::Deactivate { id } => {
            with_scheduler(cli.store.as_deref(), policy, |s| {
                s.deactivate(&id)?;
                println!("{} deactivated", id);
                Ok(true)
            })?;
        }
        Commands::Unschedule { id } => {
            with_scheduler(cli.store.as_deref(), policy, |s| {
                s.unschedule(&id)?;
                println!("{} unscheduled", id);
                Ok(true)
            })?;
        }
        Commands::Reschedule { id, start, end } => {
            let window = window_from_clock(&start, &end)?;
            with_scheduler(cli.store.as_deref(), policy, |s| {
                s.reschedule(&id, window)?;
                println!("{} moved to {}", id, window);
                Ok(true)
            })?;
        }
        Commands::Drag { id, handle, at } => {
            let pointer = parse_clock(&at)? as i64;
            with_scheduler(cli.store.as_deref(), policy, |s| {
                let current = match s.timeline_window(&id)? {
                    Some(window) => window,
                    None => bail!("Banner '{}' has no window to drag", id),
                };
                let window = drag(&current, handle.into(), pointer, s.policy())?;
                info!(banner_id = %id, from = %current, to = %window, "drag");
                s.reschedule(&id, window)?;
                println!("{} moved to {}", id, window);
                Ok(true)
            })?;
        }
    }

    Ok(())
}

/// Load the store file, run `op` against it, and save it back if `op`
/// reports a change.
fn with_scheduler<F>(store: Option<&str>, policy: SchedulePolicy, op: F) -> Result<()>
where
    F: FnOnce(&BannerScheduler<InMemoryStore>) -> Result<bool>,
{
    let path = store_path(store)?;
    let store = InMemoryStore::from_records(load_records(path)?);
    let scheduler = BannerScheduler::new(store, policy);
    if op(&scheduler)? {
        save_records(path, scheduler.into_store().into_records())?;
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Read `HH:MM` start and end. An end at or before the start is taken to be on
/// the next day.
fn window_from_clock(start: &str, end: &str) -> Result<TimeWindow> {
    let start_minute = parse_clock(start)?;
    let end_minute = parse_clock(end)?;
    let range = ClockRange {
        start_time: start.trim().to_string(),
        end_time: end.trim().to_string(),
        ends_next_day: end_minute <= start_minute,
    };
    Ok(range.to_window()?)
}

/// One line per banner, with the window as shown on the timeline grid.
fn describe(record: &BannerRecord, snap_minutes: u32) -> String {
    let title = record.title.as_deref().unwrap_or("(untitled)");
    match record.to_schedule() {
        Ok(schedule) => match schedule.state() {
            ScheduleState::Unscheduled => format!("{}  {}  unscheduled", record.id, title),
            ScheduleState::Inactive(w) => {
                format!("{}  {}  {}  inactive", record.id, title, range_12h(&w, snap_minutes))
            }
            ScheduleState::Active(w) => {
                format!("{}  {}  {}  active", record.id, title, range_12h(&w, snap_minutes))
            }
        },
        Err(e) => format!("{}  {}  unreadable schedule: {}", record.id, title, e),
    }
}

fn range_12h(window: &TimeWindow, snap_minutes: u32) -> String {
    let window = window.snap(snap_minutes).unwrap_or(*window);
    format!(
        "{} - {}",
        format_12h(window.start_minute()),
        format_12h(window.end_minute())
    )
}

fn store_path(store: Option<&str>) -> Result<&str> {
    match store {
        Some(path) => Ok(path),
        None => bail!("This command needs --store <FILE>"),
    }
}

fn load_records(path: &str) -> Result<Vec<BannerRecord>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path, "store file missing, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to read file: {}", path)),
    };
    serde_json::from_str(&content).with_context(|| format!("Failed to parse store file: {}", path))
}

fn save_records(path: &str, records: Vec<BannerRecord>) -> Result<()> {
    let json = serde_json::to_string_pretty(&records)?;
    std::fs::write(path, json + "\n").with_context(|| format!("Failed to write file: {}", path))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
