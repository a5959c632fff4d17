//! Today's tracked total.
//!
//! Entries are kept in ascending `end` order, so the first entry that ends
//! after local midnight can be found by binary search and everything from
//! there on belongs to today.

use chrono::{DateTime, LocalResult, NaiveTime, TimeZone, Utc};

use crate::entry::WorkEntry;

/// Index of the first entry whose `end` is after `midnight`.
///
/// Entries before the index ended at or before midnight. The caller must pass
/// entries sorted by `end`; otherwise the result is meaningless.
pub fn todays_earliest_index(entries: &[WorkEntry], midnight: DateTime<Utc>) -> usize {
    let mut low = 0;
    let mut high = entries.len();
    // Lower bound over [low, high); `high` stays one past the candidate.
    while low < high {
        let mid = low + (high - low) / 2;
        if entries[mid].end > midnight {
            high = mid;
        } else {
            low = mid + 1;
        }
    }
    low
}

/// Milliseconds tracked today, measured as `end - start` of each entry.
pub fn todays_total_ms(entries: &[WorkEntry], midnight: DateTime<Utc>) -> i64 {
    let idx = todays_earliest_index(entries, midnight);
    entries[idx..].iter().map(WorkEntry::span_ms).sum()
}

/// Seconds tracked today, unrounded.
#[expect(
    clippy::cast_precision_loss,
    reason = "daily totals are far below 2^52 ms"
)]
pub fn todays_total_seconds(entries: &[WorkEntry], midnight: DateTime<Utc>) -> f64 {
    todays_total_ms(entries, midnight) as f64 / 1000.0
}

/// Midnight at the start of `now`'s day, in `now`'s time zone, as UTC.
///
/// Ambiguous midnights (DST fall-back) resolve to the earlier instant. If
/// midnight does not exist (DST spring-forward) 01:00 is used instead.
pub fn local_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let tz = now.timezone();
    let date = now.date_naive();
    let resolve = |time: NaiveTime| match tz.from_local_datetime(&date.and_time(time)) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt.with_timezone(&Utc)),
        LocalResult::None => None,
    };
    resolve(NaiveTime::MIN)
        .or_else(|| NaiveTime::from_hms_opt(1, 0, 0).and_then(resolve))
        .unwrap_or_else(|| now.with_timezone(&Utc))
}
