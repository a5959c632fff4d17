//! Completed and in-progress work entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A completed tracking session.
///
/// Timestamps are persisted as epoch milliseconds so the stored list keeps a
/// flat numeric shape: `{"start":..,"end":..,"spent":..,"description":".."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkEntry {
    /// When the session started.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start: DateTime<Utc>,
    /// When the session stopped or expired.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub end: DateTime<Utc>,
    /// Ticked time in milliseconds. Excludes paused stretches, so it can be
    /// smaller than `end - start`.
    #[serde(default)]
    pub spent: i64,
    /// Free-form note, possibly empty.
    #[serde(default)]
    pub description: String,
}

impl WorkEntry {
    /// Creates an entry whose `spent` equals its wall-clock span.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, description: impl Into<String>) -> Self {
        Self {
            start,
            end,
            spent: (end - start).num_milliseconds(),
            description: description.into(),
        }
    }

    /// Wall-clock span of the entry in milliseconds.
    pub fn span_ms(&self) -> i64 {
        (self.end - self.start).num_milliseconds()
    }

    /// Whether `end >= start`.
    pub fn is_well_ordered(&self) -> bool {
        self.end >= self.start
    }
}

/// A session that has not ended yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialEntry {
    /// `None` until the session starts ticking.
    pub start: Option<DateTime<Utc>>,
    pub description: String,
}

impl PartialEntry {
    /// Completes the entry.
    ///
    /// A partial entry that never started is closed with `start == end`.
    pub fn finish(&self, end: DateTime<Utc>, spent: i64) -> WorkEntry {
        WorkEntry {
            start: self.start.unwrap_or(end),
            end,
            spent,
            description: self.description.clone(),
        }
    }
}

/// Builds a UTC timestamp from epoch milliseconds, clamping out-of-range input
/// to the epoch.
pub fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or(DateTime::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_serializes_as_epoch_millis() {
        let entry = WorkEntry::new(from_millis(10), from_millis(20), "x");
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(
            json,
            r#"{"start":10,"end":20,"spent":10,"description":"x"}"#
        );
    }

    #[test]
    fn entry_serde_roundtrip() {
        let entry = WorkEntry {
            start: from_millis(1_700_000_000_000),
            end: from_millis(1_700_000_900_000),
            spent: 600_000,
            description: "review".to_string(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        let parsed: WorkEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entry);
    }

    #[test]
    fn entry_missing_optional_fields_defaults() {
        let parsed: WorkEntry = serde_json::from_str(r#"{"start":0,"end":1000}"#).unwrap();
        assert_eq!(parsed.spent, 0);
        assert_eq!(parsed.description, "");
        assert_eq!(parsed.span_ms(), 1000);
    }

    #[test]
    fn partial_entry_finish_keeps_description() {
        let partial = PartialEntry {
            start: Some(from_millis(1_000)),
            description: "write docs".to_string(),
        };
        let entry = partial.finish(from_millis(9_000), 5_000);
        assert_eq!(entry.start, from_millis(1_000));
        assert_eq!(entry.end, from_millis(9_000));
        assert_eq!(entry.spent, 5_000);
        assert_eq!(entry.description, "write docs");
        assert!(entry.is_well_ordered());
    }

    #[test]
    fn partial_entry_without_start_collapses_to_end() {
        let entry = PartialEntry::default().finish(from_millis(42), 0);
        assert_eq!(entry.start, entry.end);
    }
}
