//! Add command for recording an entry by hand.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;

use tk_core::{EntryLog, EntryStore, WorkEntry};

use super::util::{format_clock, parse_datetime};

#[derive(Debug, Args)]
pub struct AddArgs {
    /// When the work started (ISO 8601 or e.g. "2 hours ago").
    #[arg(long)]
    pub start: String,
    /// When the work ended (ISO 8601, "now" or e.g. "30 minutes ago").
    #[arg(long, default_value = "now")]
    pub end: String,
    /// What the work was about.
    #[arg(short, long, default_value = "")]
    pub description: String,
}

/// Adds the entry at its position by end time and reports its number.
pub fn run<W: Write, S: EntryStore>(
    writer: &mut W,
    log: &mut EntryLog<S>,
    args: &AddArgs,
    now: DateTime<Utc>,
) -> Result<()> {
    let start = parse_datetime(&args.start, now).context("invalid --start")?;
    let end = parse_datetime(&args.end, now).context("invalid --end")?;
    let entry = WorkEntry::new(start, end, args.description.trim());
    let spent = entry.spent;

    let index = log.insert_by_end(entry).context("failed to add entry")?;
    writeln!(writer, "Added entry {} ({})", index + 1, format_clock(spent))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use tk_core::{MemoryStore, from_millis};

    fn args(start: &str, end: &str, description: &str) -> AddArgs {
        AddArgs {
            start: start.to_string(),
            end: end.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn add_appends_entry() {
        let mut log = EntryLog::open(MemoryStore::default());
        let mut output = Vec::new();
        let now = from_millis(1_769_601_600_000);

        run(
            &mut output,
            &mut log,
            &args("2026-01-28T09:00:00Z", "2026-01-28T09:45:00Z", " review "),
            now,
        )
        .unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "Added entry 1 (00:45:00.00)\n");
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].description, "review");
        assert_eq!(log.store().load_entries(), log.entries());
    }

    #[test]
    fn add_relative_times_up_to_now() {
        let mut log = EntryLog::open(MemoryStore::default());
        let now = from_millis(1_769_601_600_000);
        run(&mut Vec::new(), &mut log, &args("30 minutes ago", "now", ""), now).unwrap();
        assert_eq!(log.entries()[0].end, now);
        assert_eq!(log.entries()[0].spent, 1_800_000);
    }

    #[test]
    fn add_rejects_end_before_start() {
        let mut log = EntryLog::open(MemoryStore::default());
        let now = from_millis(1_769_601_600_000);
        let result = run(&mut Vec::new(), &mut log, &args("now", "1 hour ago", ""), now);
        assert!(result.is_err());
        assert!(log.is_empty());
    }
}
