//! Tick-counting engine.
//!
//! Elapsed time is accumulated one fixed period at a time by a repeating
//! timer, not measured as a wall-clock delta. Precision is bounded by the
//! period and late ticks are not caught up, so callers must not expect
//! millisecond exactness.
//!
//! The repeating timer lives inside the `Running` state. Any transition out of
//! `Running` drops it, which cancels it, so there is never more than one tick
//! stream per engine.

use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior};

use crate::types::TrackerStatus;

/// Default tick period.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(100);

#[derive(Debug)]
enum EngineState {
    Idle,
    /// Invariant: `elapsed_ms > 0`.
    Paused { elapsed_ms: i64 },
    Running { elapsed_ms: i64, ticker: Interval },
}

/// Accumulates elapsed milliseconds while running.
#[derive(Debug)]
pub struct TickEngine {
    period: Duration,
    period_ms: i64,
    state: EngineState,
}

impl TickEngine {
    /// Creates an idle engine. Periods under one millisecond are raised to one.
    pub fn new(period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        let period_ms = i64::try_from(period.as_millis()).unwrap_or(i64::MAX);
        Self {
            period,
            period_ms,
            state: EngineState::Idle,
        }
    }

    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Resumes accumulation from the last stop point.
    ///
    /// Returns `false` if the engine was already running. Must be called from
    /// within a Tokio runtime.
    pub fn start(&mut self) -> bool {
        let elapsed_ms = match self.state {
            EngineState::Running { .. } => return false,
            EngineState::Idle => 0,
            EngineState::Paused { elapsed_ms } => elapsed_ms,
        };
        let mut ticker = tokio::time::interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.state = EngineState::Running { elapsed_ms, ticker };
        tracing::trace!(elapsed_ms, "tick engine started");
        true
    }

    /// Halts accumulation, freezing elapsed time.
    ///
    /// Returns `false` if the engine was not running. Pausing before the first
    /// tick leaves nothing tracked, so the engine goes back to idle.
    pub fn pause(&mut self) -> bool {
        let EngineState::Running { elapsed_ms, .. } = self.state else {
            return false;
        };
        self.state = if elapsed_ms > 0 {
            EngineState::Paused { elapsed_ms }
        } else {
            EngineState::Idle
        };
        tracing::trace!(elapsed_ms, "tick engine paused");
        true
    }

    /// Zeroes elapsed time and halts. Returns the elapsed time before the reset.
    pub fn reset(&mut self) -> i64 {
        let elapsed_ms = self.elapsed_ms();
        self.state = EngineState::Idle;
        elapsed_ms
    }

    pub const fn elapsed_ms(&self) -> i64 {
        match &self.state {
            EngineState::Idle => 0,
            EngineState::Paused { elapsed_ms } | EngineState::Running { elapsed_ms, .. } => {
                *elapsed_ms
            }
        }
    }

    pub const fn status(&self) -> TrackerStatus {
        match self.state {
            EngineState::Idle => TrackerStatus::Off,
            EngineState::Paused { .. } => TrackerStatus::Paused,
            EngineState::Running { .. } => TrackerStatus::On,
        }
    }

    /// Waits for the next tick and returns the new elapsed time.
    ///
    /// Never resolves while the engine is not running. Cancel-safe, so it can
    /// sit in a `tokio::select!` next to input handling.
    pub async fn tick(&mut self) -> i64 {
        match &mut self.state {
            EngineState::Running { elapsed_ms, ticker } => {
                ticker.tick().await;
                *elapsed_ms += self.period_ms;
                *elapsed_ms
            }
            EngineState::Idle | EngineState::Paused { .. } => std::future::pending().await,
        }
    }
}

impl Default for TickEngine {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_PERIOD)
    }
}
