//! List command for showing recorded entries.

use std::fmt::Display;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use tk_core::WorkEntry;

use super::util::format_clock;

/// JSON form of a listed entry.
#[derive(Debug, Serialize)]
struct ListedEntry<'a> {
    number: usize,
    #[serde(flatten)]
    entry: &'a WorkEntry,
}

/// Writes entries, numbered from 1, with times shown in `tz`.
pub fn run<W, Tz>(writer: &mut W, entries: &[WorkEntry], tz: &Tz, json: bool) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if json {
        let listed: Vec<_> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| ListedEntry {
                number: i + 1,
                entry,
            })
            .collect();
        writeln!(writer, "{}", serde_json::to_string_pretty(&listed)?)?;
        return Ok(());
    }

    if entries.is_empty() {
        writeln!(writer, "No entries recorded.")?;
        return Ok(());
    }

    writeln!(
        writer,
        "{:<3}  {:<10}  {:<8}  {:<8}  {:<11}  Description",
        "#", "Date", "Start", "End", "Spent"
    )?;
    for (i, entry) in entries.iter().enumerate() {
        let start = local(entry.start, tz);
        let end = local(entry.end, tz);
        let line = format!(
            "{:<3}  {}  {}  {}  {}  {}",
            i + 1,
            start.format("%Y-%m-%d"),
            start.format("%H:%M:%S"),
            end.format("%H:%M:%S"),
            format_clock(entry.spent),
            entry.description
        );
        writeln!(writer, "{}", line.trim_end())?;
    }
    Ok(())
}

fn local<Tz: TimeZone>(at: DateTime<Utc>, tz: &Tz) -> DateTime<Tz> {
    at.with_timezone(tz)
}
