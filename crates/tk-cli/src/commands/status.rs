//! Status command for showing what is stored.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};

use tk_core::EntryLog;
use tk_core::daily::{local_midnight, todays_total_ms};
use tk_db::Database;

use super::util::format_clock;
use crate::Config;

pub fn run<W: Write, Tz: TimeZone>(
    writer: &mut W,
    config: &Config,
    now: &DateTime<Tz>,
) -> Result<()> {
    let db = Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))?;
    let keys = db.keys()?;
    let log = EntryLog::open(db);

    writeln!(writer, "tk status")?;
    writeln!(writer, "Database: {}", config.database_path.display())?;
    writeln!(
        writer,
        "Defaults: {} mode, {} budget, notifications {}",
        config.default_mode,
        format_clock(config.default_budget_ms),
        config.notifications
    )?;

    if keys.is_empty() {
        writeln!(writer, "No entries recorded.")?;
        return Ok(());
    }

    writeln!(writer, "Entries: {}", log.len())?;
    if !log.is_sorted_by_end() {
        writeln!(
            writer,
            "Warning: entries are not ordered by end time, today's total may be off."
        )?;
    }
    let today_ms = todays_total_ms(log.entries(), local_midnight(now));
    writeln!(writer, "Today: {}", format_clock(today_ms))?;

    writeln!(writer, "Keys:")?;
    for key in keys {
        writeln!(writer, "- {}: updated {}", key.key, key.updated_at)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};
    use tk_core::{WorkEntry, from_millis};

    use insta::assert_snapshot;

    fn config(database_path: std::path::PathBuf) -> Config {
        Config {
            database_path,
            ..Config::default()
        }
    }

    #[test]
    fn status_reports_empty_database() {
        let temp = tempfile::tempdir().unwrap();
        let db_path = temp.path().join("tk.db");
        let now = Utc.with_ymd_and_hms(2026, 1, 28, 12, 0, 0).unwrap();

        let mut output = Vec::new();
        run(&mut output, &config(db_path.clone()), &now).unwrap();

        let output = String::from_utf8(output).unwrap();
        let output = output.replace(&db_path.display().to_string(), "[TEMP]/tk.db");
        assert_snapshot!(output, @r"
        tk status
        Database: [TEMP]/tk.db
        Defaults: timer mode, 00:25:00.00 budget, notifications default
        No entries recorded.
        ");
    }

    #[test]
    fn status_outputs_entry_count_and_today_total() {
        let temp = tempfile::tempdir().unwrap();
        let db_path = temp.path().join("tk.db");
        {
            let mut log = EntryLog::open(Database::open(&db_path).unwrap());
            let nine = 1_769_590_800_000; // 2026-01-28T09:00:00Z
            log.add(WorkEntry::new(from_millis(nine - 86_400_000), from_millis(nine - 86_000_000), ""))
                .unwrap();
            log.add(WorkEntry::new(from_millis(nine), from_millis(nine + 600_000), "triage"))
                .unwrap();
        }
        let now = Utc.with_ymd_and_hms(2026, 1, 28, 12, 0, 0).unwrap();

        let mut output = Vec::new();
        run(&mut output, &config(db_path.clone()), &now).unwrap();

        let output = String::from_utf8(output).unwrap();
        let output = output.replace(&db_path.display().to_string(), "[TEMP]/tk.db");
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[3], "Entries: 2");
        assert_eq!(lines[4], "Today: 00:10:00.00");
        assert_eq!(lines[5], "Keys:");
        assert!(lines[6].starts_with("- entries: updated 20"));
    }
}
