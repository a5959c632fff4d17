//! Core domain logic for the tk work-session tracker.
//!
//! This crate contains:
//! - Tick engine and tracker: counting elapsed time as a timer or stopwatch
//! - Daily totals: finding today's entries by binary search
//! - Entry log and recorder: persisting finished sessions through a store seam

mod budget;
pub mod clock;
pub mod daily;
mod entry;
mod entry_log;
pub mod notify;
mod recorder;
pub mod store;
pub mod tick;
mod tracker;
mod types;

pub use budget::{BudgetFields, parse_field};
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{PartialEntry, WorkEntry, from_millis};
pub use entry_log::{EntryLog, LogError};
pub use notify::{CountingNotifier, NotificationPermission, Notifier};
pub use recorder::Recorder;
pub use store::{EntryStore, MemoryStore, StoreError};
pub use tick::TickEngine;
pub use tracker::{DEFAULT_BUDGET_MS, SessionEvent, Tracker, TrackerError};
pub use types::{TrackerStatus, TrackingMode, ValidationError};
