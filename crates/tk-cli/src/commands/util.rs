//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use regex::Regex;

use tk_core::BudgetFields;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(minute|hour|day|week)s?\s+ago$").unwrap());

/// Pre-compiled regex for budget strings such as `1h30m` or `45s`.
static BUDGET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d+)h)?(?:(\d+)m)?(?:(\d+(?:\.\d{1,2})?)s)?$").unwrap()
});

/// Conservative bounds for relative time parsing (~1000 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

/// Parse a datetime string as ISO 8601, `now`, or relative time.
///
/// Supports:
/// - ISO 8601: "2026-01-15T10:30:00Z"
/// - "now"
/// - Relative: "2 hours ago", "30 minutes ago", "1 day ago", "1 week ago"
pub fn parse_datetime(s: &str, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
    // Try ISO 8601 first
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if s == "now" {
        return Ok(now);
    }

    // Try relative time: "N hours/minutes/days/weeks ago"
    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid datetime: {s}. Use ISO 8601 (e.g., 2026-01-15T10:30:00Z) or relative (e.g., '2 hours ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[2] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        "week" => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    // Safe to create Duration now that we've validated the range
    let duration = Duration::minutes(n * minutes_per_unit);
    Ok(now - duration)
}

/// Parse a budget as `XhYmZs` (any part optional, seconds may carry
/// hundredths) or as plain milliseconds.
pub fn parse_budget(s: &str) -> anyhow::Result<i64> {
    let s = s.trim();
    if let Ok(ms) = s.parse::<i64>() {
        if ms < 0 {
            anyhow::bail!("Budget cannot be negative: {s}");
        }
        return Ok(ms);
    }

    let caps = BUDGET_RE
        .captures(s)
        .filter(|_| !s.is_empty())
        .with_context(|| format!("Invalid budget: {s}. Use e.g. 25m, 1h30m, 90s or 1500"))?;

    let field = |i: usize| caps.get(i).map_or("0", |m| m.as_str());
    let (seconds, hundredths) = match field(3).split_once('.') {
        Some((secs, frac)) => (secs, format!("{frac:0<2}")),
        None => (field(3), "0".to_string()),
    };
    let fields = BudgetFields::parse(field(1), field(2), seconds, &hundredths);
    Ok(fields.to_ms())
}

/// Formats milliseconds as `HH:MM:SS.hh`. Negative durations show as zero.
pub fn format_clock(ms: i64) -> String {
    BudgetFields::from_ms(ms).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    use tk_core::from_millis;

    #[test]
    fn parses_rfc3339_and_relative_times() {
        let now = from_millis(1_800_000_000_000);
        assert_eq!(
            parse_datetime("2026-01-15T10:30:00Z", now).unwrap().to_rfc3339(),
            "2026-01-15T10:30:00+00:00"
        );
        assert_eq!(parse_datetime("now", now).unwrap(), now);
        assert_eq!(
            parse_datetime("2 hours ago", now).unwrap(),
            now - Duration::hours(2)
        );
        assert!(parse_datetime("yesterday-ish", now).is_err());
    }

    #[test]
    fn parses_budget_strings() {
        assert_eq!(parse_budget("25m").unwrap(), 1_500_000);
        assert_eq!(parse_budget("1h30m").unwrap(), 5_400_000);
        assert_eq!(parse_budget("1h2m3s").unwrap(), 3_723_000);
        assert_eq!(parse_budget("5s").unwrap(), 5_000);
        assert_eq!(parse_budget("2.5s").unwrap(), 2_500);
        assert_eq!(parse_budget("0.07s").unwrap(), 70);
        assert_eq!(parse_budget("1500").unwrap(), 1_500);
    }

    #[test]
    fn rejects_bad_budgets() {
        assert!(parse_budget("").is_err());
        assert!(parse_budget("soon").is_err());
        assert!(parse_budget("-5").is_err());
        assert!(parse_budget("5x").is_err());
    }

    #[test]
    fn formats_clock() {
        assert_eq!(format_clock(0), "00:00:00.00");
        assert_eq!(format_clock(6_000), "00:00:06.00");
        assert_eq!(format_clock(3_723_450), "01:02:03.45");
        assert_eq!(format_clock(-10), "00:00:00.00");
    }
}
