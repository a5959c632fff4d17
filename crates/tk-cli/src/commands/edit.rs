//! Edit and delete commands for recorded entries.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::Args;

use tk_core::{EntryLog, EntryStore};

use super::util::{format_clock, parse_datetime};

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Entry number as shown by `tk list`.
    pub number: usize,
    /// New start time.
    #[arg(long)]
    pub start: Option<String>,
    /// New end time.
    #[arg(long)]
    pub end: Option<String>,
    /// New description. Pass an empty string to clear it.
    #[arg(short, long)]
    pub description: Option<String>,
}

/// Converts a 1-based entry number to an index.
fn index_of(number: usize) -> Result<usize> {
    number
        .checked_sub(1)
        .context("entry numbers start at 1")
}

/// Replaces the given fields of an entry.
///
/// Changing either time recomputes `spent` from the new span and moves the
/// entry to keep the list ordered by end time.
pub fn run<W: Write, S: EntryStore>(
    writer: &mut W,
    log: &mut EntryLog<S>,
    args: &EditArgs,
    now: DateTime<Utc>,
) -> Result<()> {
    if args.start.is_none() && args.end.is_none() && args.description.is_none() {
        bail!("nothing to change; pass --start, --end or --description");
    }
    let index = index_of(args.number)?;
    let Some(current) = log.get(index) else {
        bail!("entry not found: {}", args.number);
    };

    let mut entry = current.clone();
    if let Some(description) = &args.description {
        entry.description = description.trim().to_string();
    }

    let times_changed = args.start.is_some() || args.end.is_some();
    if let Some(start) = &args.start {
        entry.start = parse_datetime(start, now).context("invalid --start")?;
    }
    if let Some(end) = &args.end {
        entry.end = parse_datetime(end, now).context("invalid --end")?;
    }

    let number = if times_changed {
        entry.spent = entry.span_ms();
        log.replace_sorted(index, entry.clone())
            .context("failed to update entry")?
            + 1
    } else {
        log.update(index, entry.clone())
            .context("failed to update entry")?;
        args.number
    };

    writeln!(
        writer,
        "Updated entry {number} ({}) {}",
        format_clock(entry.spent),
        entry.description
    )?;
    Ok(())
}

/// Removes an entry.
pub fn delete<W: Write, S: EntryStore>(
    writer: &mut W,
    log: &mut EntryLog<S>,
    number: usize,
) -> Result<()> {
    let index = index_of(number)?;
    if log.get(index).is_none() {
        bail!("entry not found: {number}");
    }
    let removed = log.remove(index).context("failed to delete entry")?;
    writeln!(
        writer,
        "Deleted entry {number} ({})",
        format_clock(removed.spent)
    )?;
    Ok(())
}
