//! Turns session events into persisted entries.
//!
//! The recorder holds the in-progress [`PartialEntry`], arms a guard against
//! losing it while a session runs, appends the finished entry to the log when
//! the session ends, and announces the end through a [`Notifier`].

use crate::entry::{PartialEntry, WorkEntry};
use crate::entry_log::{EntryLog, LogError};
use crate::notify::Notifier;
use crate::store::EntryStore;
use crate::tracker::SessionEvent;

/// Records tracker sessions into an [`EntryLog`].
#[derive(Debug)]
pub struct Recorder<S, N> {
    log: EntryLog<S>,
    notifier: N,
    partial: PartialEntry,
    guard_armed: bool,
}

impl<S: EntryStore, N: Notifier> Recorder<S, N> {
    pub fn new(log: EntryLog<S>, notifier: N) -> Self {
        Self {
            log,
            notifier,
            partial: PartialEntry::default(),
            guard_armed: false,
        }
    }

    pub const fn log(&self) -> &EntryLog<S> {
        &self.log
    }

    pub const fn partial(&self) -> &PartialEntry {
        &self.partial
    }

    /// Sets the description of the in-progress entry.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.partial.description = description.into();
    }

    /// Whether quitting now would lose an in-progress session.
    pub const fn has_unsaved_session(&self) -> bool {
        self.guard_armed
    }

    /// Applies a session event.
    ///
    /// Returns the entry appended to the log when a session ends.
    pub fn apply(&mut self, event: SessionEvent) -> Result<Option<WorkEntry>, LogError> {
        match event {
            SessionEvent::Started { at } => {
                let description = std::mem::take(&mut self.partial.description);
                self.partial = PartialEntry {
                    start: Some(at),
                    description,
                };
                self.arm_guard();
                Ok(None)
            }
            SessionEvent::Ended { at, elapsed_ms } => {
                let entry = self.partial.finish(at, elapsed_ms);
                if let Err(err) = self.log.add(entry.clone()) {
                    // The partial entry and guard stay as they were.
                    tracing::error!(
                        start = %entry.start,
                        end = %entry.end,
                        spent_ms = entry.spent,
                        description = %entry.description,
                        error = %err,
                        "failed to save finished entry"
                    );
                    return Err(err);
                }
                self.disarm_guard();
                self.partial = PartialEntry::default();
                self.notifier.session_ended();
                tracing::info!(
                    spent_ms = entry.spent,
                    description = %entry.description,
                    "entry recorded"
                );
                Ok(Some(entry))
            }
        }
    }

    /// Forgets a session that ended before anything was tracked.
    ///
    /// The description is kept for the next session.
    pub fn abandon(&mut self) {
        self.partial.start = None;
        self.disarm_guard();
    }

    fn arm_guard(&mut self) {
        if !self.guard_armed {
            self.guard_armed = true;
            tracing::debug!("unsaved-session guard armed");
        }
    }

    fn disarm_guard(&mut self) {
        if self.guard_armed {
            self.guard_armed = false;
            tracing::debug!("unsaved-session guard disarmed");
        }
    }
}
