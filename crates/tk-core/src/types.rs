//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Unknown tracking mode value.
    #[error("invalid tracking mode: {value} (expected `timer` or `stopwatch`)")]
    InvalidTrackingMode { value: String },

    /// Unknown notification permission value.
    #[error("invalid notification permission: {value}")]
    InvalidPermission { value: String },
}

/// Whether a session counts down against a budget or counts up without bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingMode {
    /// Counts down from a budget and expires when it is reached.
    #[default]
    Timer,
    /// Counts up until stopped manually.
    Stopwatch,
}

impl TrackingMode {
    /// String representation used in config files and on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Timer => "timer",
            Self::Stopwatch => "stopwatch",
        }
    }
}

impl fmt::Display for TrackingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TrackingMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "timer" => Ok(Self::Timer),
            "stopwatch" => Ok(Self::Stopwatch),
            _ => Err(ValidationError::InvalidTrackingMode {
                value: s.to_string(),
            }),
        }
    }
}

/// Externally visible state of a tracker.
///
/// Always derived from the tick engine's state, never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerStatus {
    /// Nothing tracked and not running.
    Off,
    /// Some time tracked, not running.
    Paused,
    /// Ticking.
    On,
}

impl TrackerStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Paused => "paused",
            Self::On => "on",
        }
    }
}

impl fmt::Display for TrackerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracking_mode_from_str() {
        assert_eq!("timer".parse::<TrackingMode>().unwrap(), TrackingMode::Timer);
        assert_eq!(
            "stopwatch".parse::<TrackingMode>().unwrap(),
            TrackingMode::Stopwatch
        );
        assert!("countdown".parse::<TrackingMode>().is_err());
    }

    #[test]
    fn tracking_mode_serde_roundtrip() {
        let json = serde_json::to_string(&TrackingMode::Stopwatch).unwrap();
        assert_eq!(json, "\"stopwatch\"");
        let parsed: TrackingMode = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, TrackingMode::Stopwatch);
    }

    #[test]
    fn tracking_mode_defaults_to_timer() {
        assert_eq!(TrackingMode::default(), TrackingMode::Timer);
    }

    #[test]
    fn tracker_status_display() {
        assert_eq!(TrackerStatus::Off.to_string(), "off");
        assert_eq!(TrackerStatus::Paused.to_string(), "paused");
        assert_eq!(TrackerStatus::On.to_string(), "on");
    }
}
