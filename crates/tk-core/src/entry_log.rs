//! The persisted list of completed entries.
//!
//! Every mutation builds the next list, writes it to the store and only then
//! swaps it in, so the in-memory list always matches what was last persisted.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::daily;
use crate::entry::WorkEntry;
use crate::store::{EntryStore, StoreError};

/// Entry log errors.
#[derive(Debug, Error)]
pub enum LogError {
    /// No entry at the requested position.
    #[error("no entry at index {index} (log has {len} entries)")]
    NotFound { index: usize, len: usize },
    /// The entry ends before it starts.
    #[error("entry ends ({end}) before it starts ({start})")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Ordered list of completed entries plus the store it persists to.
#[derive(Debug)]
pub struct EntryLog<S> {
    store: S,
    entries: Vec<WorkEntry>,
}

impl<S: EntryStore> EntryLog<S> {
    /// Loads the persisted list from `store`.
    pub fn open(store: S) -> Self {
        let entries = store.load_entries();
        tracing::debug!(count = entries.len(), "loaded entries");
        Self { store, entries }
    }

    pub fn entries(&self) -> &[WorkEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&WorkEntry> {
        self.entries.get(index)
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Appends an entry.
    pub fn add(&mut self, entry: WorkEntry) -> Result<(), LogError> {
        check_range(&entry)?;
        let mut next = self.entries.clone();
        next.push(entry);
        self.commit(next)
    }

    /// Inserts an entry at its position by `end`, after any entries with the
    /// same `end`. Returns the index it landed at.
    pub fn insert_by_end(&mut self, entry: WorkEntry) -> Result<usize, LogError> {
        check_range(&entry)?;
        let mut next = self.entries.clone();
        let index = next.partition_point(|e| e.end <= entry.end);
        next.insert(index, entry);
        self.commit(next)?;
        Ok(index)
    }

    /// Replaces every field of the entry at `index`.
    ///
    /// The entry stays where it is even if its new `end` breaks the ordering;
    /// use [`Self::replace_sorted`] when times change.
    pub fn update(&mut self, index: usize, entry: WorkEntry) -> Result<(), LogError> {
        self.check_index(index)?;
        check_range(&entry)?;
        let mut next = self.entries.clone();
        next[index] = entry;
        self.commit(next)
    }

    /// Replaces the entry at `index` and moves it to its position by `end`.
    /// Returns the new index.
    pub fn replace_sorted(&mut self, index: usize, entry: WorkEntry) -> Result<usize, LogError> {
        self.check_index(index)?;
        check_range(&entry)?;
        let mut next = self.entries.clone();
        next.remove(index);
        let new_index = next.partition_point(|e| e.end <= entry.end);
        next.insert(new_index, entry);
        self.commit(next)?;
        Ok(new_index)
    }

    /// Whether entries are in ascending `end` order.
    pub fn is_sorted_by_end(&self) -> bool {
        self.entries.windows(2).all(|pair| pair[0].end <= pair[1].end)
    }

    /// Removes and returns the entry at `index`.
    pub fn remove(&mut self, index: usize) -> Result<WorkEntry, LogError> {
        self.check_index(index)?;
        let mut next = self.entries.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        Ok(removed)
    }

    /// Seconds tracked since `midnight`.
    pub fn todays_total_seconds(&self, midnight: DateTime<Utc>) -> f64 {
        daily::todays_total_seconds(&self.entries, midnight)
    }

    fn check_index(&self, index: usize) -> Result<(), LogError> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(LogError::NotFound {
                index,
                len: self.entries.len(),
            })
        }
    }

    fn commit(&mut self, next: Vec<WorkEntry>) -> Result<(), LogError> {
        self.store.save_entries(&next)?;
        tracing::debug!(count = next.len(), "saved entries");
        self.entries = next;
        Ok(())
    }
}

fn check_range(entry: &WorkEntry) -> Result<(), LogError> {
    if !entry.is_well_ordered() {
        return Err(LogError::InvalidRange {
            start: entry.start,
            end: entry.end,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::entry::from_millis;
    use crate::store::MemoryStore;

    /// Store whose writes always fail.
    struct ReadOnlyStore;

    impl EntryStore for ReadOnlyStore {
        fn load_entries(&self) -> Vec<WorkEntry> {
            vec![WorkEntry::new(from_millis(0), from_millis(1), "kept")]
        }

        fn save_entries(&mut self, _entries: &[WorkEntry]) -> Result<(), StoreError> {
            Err(StoreError::backend(std::io::Error::other("read-only")))
        }
    }

    fn entry(start: i64, end: i64, description: &str) -> WorkEntry {
        WorkEntry::new(from_millis(start), from_millis(end), description)
    }

    #[test]
    fn add_then_delete_restores_empty_list() {
        let mut log = EntryLog::open(MemoryStore::default());
        log.add(entry(10, 20, "x")).unwrap();
        assert_eq!(log.entries(), &[entry(10, 20, "x")]);
        assert_eq!(log.store().load_entries(), vec![entry(10, 20, "x")]);

        let removed = log.remove(0).unwrap();
        assert_eq!(removed.description, "x");
        assert!(log.is_empty());
        assert_eq!(log.store().raw(), Some("[]"));
    }

    #[test]
    fn update_replaces_all_fields() {
        let mut log = EntryLog::open(MemoryStore::default());
        log.add(entry(0, 100, "draft")).unwrap();
        log.add(entry(200, 300, "review")).unwrap();

        let replacement = WorkEntry {
            start: from_millis(150),
            end: from_millis(350),
            spent: 120,
            description: "code review".to_string(),
        };
        log.update(1, replacement.clone()).unwrap();

        assert_eq!(log.get(1), Some(&replacement));
        assert_eq!(log.get(0), Some(&entry(0, 100, "draft")));
        assert_eq!(log.store().load_entries()[1], replacement);
    }

    #[test]
    fn insert_by_end_keeps_order() {
        let mut log = EntryLog::open(MemoryStore::default());
        log.add(entry(0, 100, "a")).unwrap();
        log.add(entry(300, 400, "c")).unwrap();

        assert_eq!(log.insert_by_end(entry(150, 200, "b")).unwrap(), 1);
        assert_eq!(log.insert_by_end(entry(450, 500, "d")).unwrap(), 3);
        assert_eq!(log.insert_by_end(entry(90, 100, "a2")).unwrap(), 1);

        let names: Vec<_> = log.entries().iter().map(|e| e.description.as_str()).collect();
        assert_eq!(names, ["a", "a2", "b", "c", "d"]);
        assert!(log.is_sorted_by_end());
    }

    #[test]
    fn replace_sorted_moves_edited_entry() {
        let mut log = EntryLog::open(MemoryStore::default());
        log.add(entry(0, 100, "a")).unwrap();
        log.add(entry(200, 300, "b")).unwrap();
        log.add(entry(400, 500, "c")).unwrap();

        let moved = log.replace_sorted(0, entry(550, 600, "a")).unwrap();
        assert_eq!(moved, 2);
        let names: Vec<_> = log.entries().iter().map(|e| e.description.as_str()).collect();
        assert_eq!(names, ["b", "c", "a"]);

        log.update(0, entry(700, 800, "b")).unwrap();
        assert!(!log.is_sorted_by_end());
    }

    #[test]
    fn missing_index_is_rejected() {
        let mut log = EntryLog::open(MemoryStore::default());
        let err = log.remove(0).unwrap_err();
        assert!(matches!(err, LogError::NotFound { index: 0, len: 0 }));
        assert!(log.update(3, entry(0, 1, "")).is_err());
    }

    #[test]
    fn reversed_range_is_rejected() {
        let mut log = EntryLog::open(MemoryStore::default());
        let backwards = WorkEntry {
            start: from_millis(50),
            end: from_millis(10),
            spent: 0,
            description: String::new(),
        };
        assert!(matches!(
            log.add(backwards),
            Err(LogError::InvalidRange { .. })
        ));
        assert!(log.is_empty());
    }

    #[test]
    fn failed_write_leaves_list_untouched() {
        let mut log = EntryLog::open(ReadOnlyStore);
        assert!(matches!(
            log.add(entry(5, 6, "lost")),
            Err(LogError::Store(_))
        ));
        assert!(log.remove(0).is_err());
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].description, "kept");
    }

    #[test]
    fn today_total_counts_entries_after_midnight() {
        let mut log = EntryLog::open(MemoryStore::default());
        log.add(entry(0, 1_000, "")).unwrap();
        log.add(entry(2_000, 2_500, "")).unwrap();
        let total = log.todays_total_seconds(from_millis(1_500));
        assert!((total - 0.5).abs() < f64::EPSILON);
    }
}
