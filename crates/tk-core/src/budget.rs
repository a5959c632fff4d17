//! Budget entry fields.
//!
//! A countdown budget is edited as four numeric fields. Text that is not a
//! number is read as zero instead of being rejected.

use std::fmt;

use serde::{Deserialize, Serialize};

const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_SECOND: i64 = 1_000;
const MS_PER_HUNDREDTH: i64 = 10;

/// A duration split into hours, minutes, seconds and hundredths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetFields {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub hundredths: i64,
}

impl BudgetFields {
    /// Splits a duration for display. Negative durations show as zero.
    pub const fn from_ms(ms: i64) -> Self {
        let ms = if ms < 0 { 0 } else { ms };
        Self {
            hours: ms / MS_PER_HOUR,
            minutes: (ms % MS_PER_HOUR) / MS_PER_MINUTE,
            seconds: (ms % MS_PER_MINUTE) / MS_PER_SECOND,
            hundredths: (ms % MS_PER_SECOND) / MS_PER_HUNDREDTH,
        }
    }

    /// Builds fields from raw text input.
    pub fn parse(hours: &str, minutes: &str, seconds: &str, hundredths: &str) -> Self {
        Self {
            hours: parse_field(hours),
            minutes: parse_field(minutes),
            seconds: parse_field(seconds),
            hundredths: parse_field(hundredths),
        }
    }

    /// Recombines the fields. Fields need not be normalized, so 90 minutes is
    /// fine. Negative totals clamp to zero.
    pub const fn to_ms(self) -> i64 {
        let total = self
            .hours
            .saturating_mul(MS_PER_HOUR)
            .saturating_add(self.minutes.saturating_mul(MS_PER_MINUTE))
            .saturating_add(self.seconds.saturating_mul(MS_PER_SECOND))
            .saturating_add(self.hundredths.saturating_mul(MS_PER_HUNDREDTH));
        if total < 0 { 0 } else { total }
    }
}

impl fmt::Display for BudgetFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:02}",
            self.hours, self.minutes, self.seconds, self.hundredths
        )
    }
}

/// Reads one field. Whitespace is trimmed, fractions are truncated, and
/// anything unparseable becomes 0.
#[expect(
    clippy::cast_possible_truncation,
    reason = "fractional field input is truncated on purpose"
)]
pub fn parse_field(text: &str) -> i64 {
    let text = text.trim();
    if let Ok(value) = text.parse::<i64>() {
        return value;
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => value.trunc() as i64,
        _ => 0,
    }
}
