//! Persistence seam for the entry list.

use std::error::Error as StdError;

use thiserror::Error;

use crate::entry::WorkEntry;

/// Storage key under which the entry list is persisted.
pub const ENTRIES_KEY: &str = "entries";

/// Errors raised while persisting entries.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The entry list could not be encoded.
    #[error("failed to encode entries: {0}")]
    Encode(#[from] serde_json::Error),
    /// The storage backend rejected the write.
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn StdError + Send + Sync>),
}

impl StoreError {
    pub fn backend(err: impl StdError + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }
}

/// Loads and replaces the whole entry list.
pub trait EntryStore {
    /// Reads the persisted list.
    ///
    /// Missing or unreadable data yields an empty list; implementations log
    /// the problem instead of returning it.
    fn load_entries(&self) -> Vec<WorkEntry>;

    /// Replaces the persisted list.
    fn save_entries(&mut self, entries: &[WorkEntry]) -> Result<(), StoreError>;
}

/// Decodes a persisted entry list, falling back to empty on bad data.
pub fn decode_entries(raw: Option<&str>) -> Vec<WorkEntry> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(error = %err, "stored entries are unreadable, starting empty");
            Vec::new()
        }
    }
}

/// Entry store backed by a JSON string in memory.
///
/// Keeps the encoded form so loads go through the same decoding path as a
/// real backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    raw: Option<String>,
}

impl MemoryStore {
    /// Creates a store holding `raw` as its persisted value.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
        }
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }
}

impl EntryStore for MemoryStore {
    fn load_entries(&self) -> Vec<WorkEntry> {
        decode_entries(self.raw.as_deref())
    }

    fn save_entries(&mut self, entries: &[WorkEntry]) -> Result<(), StoreError> {
        self.raw = Some(serde_json::to_string(entries)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::entry::from_millis;

    #[test]
    fn absent_value_is_empty() {
        assert!(MemoryStore::default().load_entries().is_empty());
    }

    #[test]
    fn unparseable_value_is_empty() {
        assert!(MemoryStore::with_raw("{not json").load_entries().is_empty());
        assert!(MemoryStore::with_raw(r#"{"start":1}"#).load_entries().is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let entries = vec![
            WorkEntry::new(from_millis(10), from_millis(20), "x"),
            WorkEntry {
                start: from_millis(30),
                end: from_millis(90),
                spent: 40,
                description: String::new(),
            },
        ];
        let mut store = MemoryStore::default();
        store.save_entries(&entries).unwrap();
        assert_eq!(store.load_entries(), entries);
    }
}
