//! Today command for showing the time tracked since local midnight.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::Serialize;

use tk_core::WorkEntry;
use tk_core::daily::{local_midnight, todays_earliest_index, todays_total_ms, todays_total_seconds};

use super::util::format_clock;

/// Today's summary.
#[derive(Debug, Serialize)]
pub struct TodaySummary {
    pub midnight: DateTime<Utc>,
    pub entries: usize,
    pub total_seconds: f64,
}

/// Summarizes entries ending after the local midnight of `now`.
pub fn summarize<Tz: TimeZone>(entries: &[WorkEntry], now: &DateTime<Tz>) -> TodaySummary {
    let midnight = local_midnight(now);
    let first = todays_earliest_index(entries, midnight);
    TodaySummary {
        midnight,
        entries: entries.len() - first,
        total_seconds: todays_total_seconds(entries, midnight),
    }
}

pub fn run<W: Write, Tz: TimeZone>(
    writer: &mut W,
    entries: &[WorkEntry],
    now: &DateTime<Tz>,
    json: bool,
) -> Result<()> {
    let summary = summarize(entries, now);
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&summary)?)?;
        return Ok(());
    }

    let total_ms = todays_total_ms(entries, summary.midnight);
    writeln!(
        writer,
        "Today (since {}): {} in {} {}",
        summary.midnight.to_rfc3339_opts(SecondsFormat::Secs, true),
        format_clock(total_ms),
        summary.entries,
        if summary.entries == 1 { "entry" } else { "entries" }
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::FixedOffset;
    use tk_core::from_millis;

    use insta::assert_snapshot;

    fn entries() -> Vec<WorkEntry> {
        let yesterday_evening = 1_769_547_600_000; // 2026-01-27T21:00:00Z
        let this_morning = 1_769_590_800_000; // 2026-01-28T09:00:00Z
        vec![
            WorkEntry::new(
                from_millis(yesterday_evening),
                from_millis(yesterday_evening + 1_800_000),
                "late fix",
            ),
            WorkEntry::new(
                from_millis(this_morning),
                from_millis(this_morning + 1_500_000),
                "standup notes",
            ),
            WorkEntry::new(
                from_millis(this_morning + 3_600_000),
                from_millis(this_morning + 3_600_500),
                "",
            ),
        ]
    }

    #[test]
    fn today_counts_entries_since_midnight() {
        let now = Utc.with_ymd_and_hms(2026, 1, 28, 12, 0, 0).unwrap();
        let mut output = Vec::new();
        run(&mut output, &entries(), &now, false).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @"Today (since 2026-01-28T00:00:00Z): 00:25:00.50 in 2 entries");
    }

    #[test]
    fn today_respects_local_offset() {
        // 22:00 at UTC-5 is 03:00 UTC the next day; local midnight is 05:00 UTC.
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2026, 1, 27, 22, 0, 0).unwrap();
        let summary = summarize(&entries(), &now);
        assert_eq!(summary.midnight.to_rfc3339(), "2026-01-27T05:00:00+00:00");
        assert_eq!(summary.entries, 3);
    }

    #[test]
    fn today_json_reports_fractional_seconds() {
        let now = Utc.with_ymd_and_hms(2026, 1, 28, 12, 0, 0).unwrap();
        let mut output = Vec::new();
        run(&mut output, &entries(), &now, true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["entries"], 2);
        assert_eq!(value["total_seconds"], 1500.5);
    }
}
