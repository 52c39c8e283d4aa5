//! Recent-queries list.
//!
//! Most-recent-first, at most [`HISTORY_CAPACITY`] entries, one entry per
//! [`SiteKey`]. Recording a key that is already present moves it to the
//! front with a new id and timestamp instead of adding a duplicate.
//!
//! Stored as a JSON array under [`HISTORY_STORAGE_KEY`]. Like the report
//! cache, a missing or malformed blob reads as an empty list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::key::SiteKey;
use crate::storage::{KvStorage, StorageError};

/// Storage key of the history blob.
pub const HISTORY_STORAGE_KEY: &str = "rankmaster_history";

/// Maximum number of entries kept.
pub const HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub site_key: SiteKey,
    pub recorded_at: DateTime<Utc>,
}

/// Persistent recent-queries list over a [`KvStorage`] backend.
pub struct History<S> {
    storage: S,
}

impl<S: KvStorage> History<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Current entries, most recent first.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        let bytes = match self.storage.read(HISTORY_STORAGE_KEY) {
            Ok(Some(b)) => b,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "history unreadable, treating as empty");
                return Vec::new();
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "history is malformed, treating as empty");
                Vec::new()
            }
        }
    }

    /// Promote `key` to the front of the list and persist it.
    ///
    /// Returns the updated list.
    pub fn record(
        &self,
        key: &SiteKey,
        now: DateTime<Utc>,
    ) -> Result<Vec<HistoryEntry>, StorageError> {
        let entries = promote(
            self.entries(),
            HistoryEntry {
                id: Uuid::new_v4().to_string(),
                site_key: key.clone(),
                recorded_at: now,
            },
        );
        let bytes = serde_json::to_vec(&entries).map_err(|e| StorageError::Backend {
            key: HISTORY_STORAGE_KEY.to_string(),
            message: e.to_string(),
        })?;
        self.storage.write(HISTORY_STORAGE_KEY, &bytes)?;
        Ok(entries)
    }
}

/// Drop any entry with the same key, prepend `entry`, truncate to capacity.
pub fn promote(mut entries: Vec<HistoryEntry>, entry: HistoryEntry) -> Vec<HistoryEntry> {
    entries.retain(|e| e.site_key != entry.site_key);
    entries.insert(0, entry);
    entries.truncate(HISTORY_CAPACITY);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::Duration;
    use std::sync::Arc;

    fn key(s: &str) -> SiteKey {
        SiteKey::normalize(s).unwrap()
    }

    fn keys(entries: &[HistoryEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.site_key.as_str()).collect()
    }

    #[test]
    fn empty_storage_has_no_history() {
        let history = History::new(MemoryStorage::new());
        assert!(history.entries().is_empty());
    }

    #[test]
    fn newest_entry_comes_first() {
        let history = History::new(MemoryStorage::new());
        let now = Utc::now();
        history.record(&key("a.com"), now).unwrap();
        history.record(&key("b.com"), now).unwrap();
        assert_eq!(keys(&history.entries()), vec!["b.com", "a.com"]);
    }

    #[test]
    fn repeat_lookup_moves_to_front_without_duplicate() {
        let history = History::new(MemoryStorage::new());
        let now = Utc::now();
        for site in ["a.com", "b.com", "c.com"] {
            history.record(&key(site), now).unwrap();
        }
        let later = now + Duration::minutes(5);
        let entries = history.record(&key("a.com"), later).unwrap();

        assert_eq!(keys(&entries), vec!["a.com", "c.com", "b.com"]);
        assert_eq!(entries[0].recorded_at, later);
        assert_eq!(history.entries(), entries);
    }

    #[test]
    fn never_exceeds_capacity() {
        let history = History::new(MemoryStorage::new());
        let now = Utc::now();
        for i in 0..25 {
            let entries = history
                .record(&key(&format!("site{}.com", i)), now)
                .unwrap();
            assert!(entries.len() <= HISTORY_CAPACITY);
        }
        let entries = history.entries();
        assert_eq!(entries.len(), HISTORY_CAPACITY);
        assert_eq!(entries[0].site_key.as_str(), "site24.com");
        assert_eq!(entries[9].site_key.as_str(), "site15.com");
    }

    #[test]
    fn promoting_existing_key_at_capacity_keeps_others() {
        let history = History::new(MemoryStorage::new());
        let now = Utc::now();
        for i in 0..HISTORY_CAPACITY {
            history.record(&key(&format!("s{}.com", i)), now).unwrap();
        }
        // s0.com is last; promoting it must not evict anything else.
        let entries = history.record(&key("s0.com"), now).unwrap();
        assert_eq!(entries.len(), HISTORY_CAPACITY);
        assert_eq!(entries[0].site_key.as_str(), "s0.com");
        assert_eq!(entries[9].site_key.as_str(), "s1.com");
    }

    #[test]
    fn malformed_blob_reads_as_empty_and_is_replaced() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write(HISTORY_STORAGE_KEY, b"{\"oops\":").unwrap();
        let history = History::new(storage);
        assert!(history.entries().is_empty());

        history.record(&key("a.com"), Utc::now()).unwrap();
        assert_eq!(keys(&history.entries()), vec!["a.com"]);
    }

    #[test]
    fn entries_get_distinct_ids() {
        let history = History::new(MemoryStorage::new());
        let now = Utc::now();
        history.record(&key("a.com"), now).unwrap();
        let entries = history.record(&key("b.com"), now).unwrap();
        assert_ne!(entries[0].id, entries[1].id);
    }
}
