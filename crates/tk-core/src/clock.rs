//! Wall-clock access.
//!
//! Session timestamps come from a [`Clock`] so tests can pin "now". Elapsed
//! time is never derived from the clock; it comes from the tick engine.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Utc};

use crate::entry::from_millis;

/// Source of the current UTC time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Rc<Cell<i64>>,
}

impl ManualClock {
    /// Creates a clock reading `ms` milliseconds after the epoch.
    pub fn at_millis(ms: i64) -> Self {
        Self {
            now_ms: Rc::new(Cell::new(ms)),
        }
    }

    pub fn set_millis(&self, ms: i64) {
        self.now_ms.set(ms);
    }

    pub fn advance_millis(&self, ms: i64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        from_millis(self.now_ms.get())
    }
}
