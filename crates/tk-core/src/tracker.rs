//! Mode-aware session control on top of the tick engine.
//!
//! A [`Tracker`] runs either as a countdown timer that expires at its budget
//! or as an open-ended stopwatch. Session boundaries are reported as
//! [`SessionEvent`]s returned from the call that caused them.

use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::clock::{Clock, SystemClock};
use crate::tick::TickEngine;
use crate::types::{TrackerStatus, TrackingMode};

/// Default countdown budget: 25 minutes.
pub const DEFAULT_BUDGET_MS: i64 = 25 * 60 * 1000;

/// Tracker errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// The budget is fixed once a session has started.
    #[error("cannot change the budget while the tracker is {status}")]
    BudgetLocked { status: TrackerStatus },
    /// Budgets are durations and cannot be negative.
    #[error("budget cannot be negative, got {budget_ms} ms")]
    NegativeBudget { budget_ms: i64 },
}

/// A session boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The tracker went from off to on.
    Started { at: DateTime<Utc> },
    /// The session was stopped or its timer expired.
    Ended { at: DateTime<Utc>, elapsed_ms: i64 },
}

/// Timer/stopwatch controller.
#[derive(Debug)]
pub struct Tracker<C: Clock = SystemClock> {
    engine: TickEngine,
    mode: TrackingMode,
    budget_ms: i64,
    started_at: Option<DateTime<Utc>>,
    clock: C,
}

impl<C: Clock> Tracker<C> {
    pub fn with_clock(mode: TrackingMode, budget_ms: i64, tick_period: Duration, clock: C) -> Self {
        Self {
            engine: TickEngine::new(tick_period),
            mode,
            budget_ms: budget_ms.max(0),
            started_at: None,
            clock,
        }
    }

    pub const fn status(&self) -> TrackerStatus {
        self.engine.status()
    }

    pub const fn mode(&self) -> TrackingMode {
        self.mode
    }

    pub const fn budget_ms(&self) -> i64 {
        self.budget_ms
    }

    pub const fn elapsed_ms(&self) -> i64 {
        self.engine.elapsed_ms()
    }

    /// Start of the current session, if one is in progress.
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Time left before expiry. `None` in stopwatch mode.
    pub const fn remaining_ms(&self) -> Option<i64> {
        match self.mode {
            TrackingMode::Timer => Some(self.budget_ms - self.engine.elapsed_ms()),
            TrackingMode::Stopwatch => None,
        }
    }

    /// When a running timer will expire if left alone.
    pub fn projected_end(&self) -> Option<DateTime<Utc>> {
        if self.status() != TrackerStatus::On {
            return None;
        }
        let remaining = self.remaining_ms()?;
        Some(self.clock.now() + chrono::Duration::milliseconds(remaining.max(0)))
    }

    /// Starts or resumes ticking.
    ///
    /// Returns [`SessionEvent::Started`] only when a new session begins.
    pub fn start(&mut self) -> Option<SessionEvent> {
        let previous = self.status();
        if !self.engine.start() {
            return None;
        }
        if previous != TrackerStatus::Off {
            tracing::debug!(elapsed_ms = self.elapsed_ms(), "session resumed");
            return None;
        }
        let at = self.clock.now();
        self.started_at = Some(at);
        tracing::debug!(mode = %self.mode, budget_ms = self.budget_ms, "session started");
        Some(SessionEvent::Started { at })
    }

    /// Pauses ticking. Returns `false` if the tracker was not running.
    pub fn pause(&mut self) -> bool {
        let paused = self.engine.pause();
        if paused && self.status() == TrackerStatus::Off {
            // Nothing was tracked, the session is abandoned.
            self.started_at = None;
        }
        paused
    }

    /// Ends the session and resets elapsed time. No-op while off.
    pub fn stop(&mut self) -> Option<SessionEvent> {
        if self.status() == TrackerStatus::Off {
            return None;
        }
        let elapsed_ms = self.engine.reset();
        self.started_at = None;
        let at = self.clock.now();
        tracing::debug!(elapsed_ms, "session ended");
        Some(SessionEvent::Ended { at, elapsed_ms })
    }

    /// Waits for the next tick, then checks for expiry.
    ///
    /// A timer that is already at its budget, such as one started with a zero
    /// budget, expires on the first poll without waiting. Never resolves while
    /// the tracker is not running.
    pub async fn tick(&mut self) -> Option<SessionEvent> {
        if let Some(event) = self.check_expiration() {
            return Some(event);
        }
        self.engine.tick().await;
        self.check_expiration()
    }

    /// Expires a timer whose elapsed time has reached its budget.
    ///
    /// Level-triggered and safe to call repeatedly: once expired the tracker
    /// is off and further calls return `None`.
    pub fn check_expiration(&mut self) -> Option<SessionEvent> {
        if self.mode != TrackingMode::Timer || self.status() == TrackerStatus::Off {
            return None;
        }
        if self.elapsed_ms() < self.budget_ms {
            return None;
        }
        tracing::info!(budget_ms = self.budget_ms, "timer expired");
        self.stop()
    }

    /// Switches between timer and stopwatch.
    ///
    /// Switching a paused stopwatch that has already used up the budget into
    /// timer mode expires it on the spot.
    pub fn set_mode(&mut self, mode: TrackingMode) -> Option<SessionEvent> {
        if mode == self.mode {
            return None;
        }
        tracing::debug!(from = %self.mode, to = %mode, "tracking mode changed");
        self.mode = mode;
        self.check_expiration()
    }

    /// Sets the countdown budget. Only allowed while off.
    pub fn set_budget(&mut self, budget_ms: i64) -> Result<(), TrackerError> {
        let status = self.status();
        if status != TrackerStatus::Off {
            return Err(TrackerError::BudgetLocked { status });
        }
        if budget_ms < 0 {
            return Err(TrackerError::NegativeBudget { budget_ms });
        }
        self.budget_ms = budget_ms;
        Ok(())
    }
}
