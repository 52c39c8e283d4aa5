//! Report cache with a freshness window.
//!
//! All reports live in one JSON object stored under [`CACHE_STORAGE_KEY`],
//! keyed by [`SiteKey`]. A report is served only while
//! `now - fetched_at < window` (seven days by default). Staleness is decided
//! at read time: stale entries stay in storage until a refetch overwrites
//! them, and nothing is ever evicted.
//!
//! Reads never fail. An absent, unreadable, or malformed blob, or a single
//! malformed entry, is logged and treated as a miss.
//!
//! Writes are a full read-modify-write of the blob. Entries other than the
//! one being written are carried over as raw JSON, so a corrupt neighbour is
//! neither lost nor able to block the write.

use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};

use crate::key::SiteKey;
use crate::models::Report;
use crate::storage::{KvStorage, StorageError};

/// Storage key of the report cache blob.
pub const CACHE_STORAGE_KEY: &str = "rankmaster_reports_cache";

/// Default freshness window: seven days, in milliseconds.
pub const FRESHNESS_WINDOW_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Counts of what the cache currently holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub fresh: usize,
    pub stale: usize,
    /// Entries that no longer parse as a [`Report`].
    pub unreadable: usize,
}

impl CacheStats {
    pub fn total(&self) -> usize {
        self.fresh + self.stale + self.unreadable
    }
}

/// Keyed, time-boxed report store over a [`KvStorage`] backend.
pub struct ReportCache<S> {
    storage: S,
    window: Duration,
}

impl<S: KvStorage> ReportCache<S> {
    pub fn new(storage: S) -> Self {
        Self::with_window(storage, Duration::milliseconds(FRESHNESS_WINDOW_MS))
    }

    pub fn with_window(storage: S, window: Duration) -> Self {
        Self { storage, window }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Whether a report fetched at `fetched_at` may still be served at `now`.
    pub fn is_fresh(&self, fetched_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(fetched_at) < self.window
    }

    /// Return the stored report for `key` if it is still fresh at `now`.
    pub fn get(&self, key: &SiteKey, now: DateTime<Utc>) -> Option<Report> {
        let mut entries = self.load_entries();
        let raw = entries.remove(key.as_str())?;
        let report: Report = match serde_json::from_value(raw) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(site = %key, error = %e, "ignoring malformed cache entry");
                return None;
            }
        };
        if self.is_fresh(report.fetched_at, now) {
            Some(report)
        } else {
            tracing::debug!(site = %key, fetched_at = %report.fetched_at, "cache entry is stale");
            None
        }
    }

    /// Store `report` under `key`, replacing any previous entry, and persist
    /// the whole cache.
    pub fn put(&self, key: &SiteKey, report: &Report) -> Result<(), StorageError> {
        let mut entries = self.load_entries();
        let value = serde_json::to_value(report).map_err(|e| StorageError::Backend {
            key: CACHE_STORAGE_KEY.to_string(),
            message: format!("failed to encode report for {}: {}", key, e),
        })?;
        entries.insert(key.as_str().to_string(), value);

        let bytes = serde_json::to_vec(&Value::Object(entries)).map_err(|e| {
            StorageError::Backend {
                key: CACHE_STORAGE_KEY.to_string(),
                message: e.to_string(),
            }
        })?;
        self.storage.write(CACHE_STORAGE_KEY, &bytes)
    }

    /// Classify every stored entry relative to `now`.
    pub fn stats(&self, now: DateTime<Utc>) -> CacheStats {
        let mut stats = CacheStats::default();
        for (_, raw) in self.load_entries() {
            match serde_json::from_value::<Report>(raw) {
                Ok(r) if self.is_fresh(r.fetched_at, now) => stats.fresh += 1,
                Ok(_) => stats.stale += 1,
                Err(_) => stats.unreadable += 1,
            }
        }
        stats
    }

    fn load_entries(&self) -> Map<String, Value> {
        let bytes = match self.storage.read(CACHE_STORAGE_KEY) {
            Ok(Some(b)) => b,
            Ok(None) => return Map::new(),
            Err(e) => {
                tracing::warn!(error = %e, "report cache unreadable, treating as empty");
                return Map::new();
            }
        };
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                tracing::warn!("report cache is not a JSON object, treating as empty");
                Map::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "report cache is malformed, treating as empty");
                Map::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::report;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    fn key(s: &str) -> SiteKey {
        SiteKey::normalize(s).unwrap()
    }

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-03-01T12:00:00.250Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn put_then_get_returns_same_report() {
        let cache = ReportCache::new(MemoryStorage::new());
        let r = report("example.com", 72, t0());
        cache.put(&key("example.com"), &r).unwrap();
        assert_eq!(cache.get(&key("example.com"), t0()), Some(r));
    }

    #[test]
    fn empty_storage_is_a_miss() {
        let cache = ReportCache::new(MemoryStorage::new());
        assert!(cache.get(&key("example.com"), t0()).is_none());
    }

    #[test]
    fn freshness_boundary_is_exclusive() {
        let cache = ReportCache::new(MemoryStorage::new());
        let k = key("example.com");
        cache.put(&k, &report("example.com", 50, t0())).unwrap();

        let just_inside = t0() + Duration::milliseconds(FRESHNESS_WINDOW_MS - 1);
        let at_boundary = t0() + Duration::milliseconds(FRESHNESS_WINDOW_MS);
        assert!(cache.get(&k, just_inside).is_some());
        assert!(cache.get(&k, at_boundary).is_none());
    }

    #[test]
    fn stale_entry_stays_in_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let cache = ReportCache::new(storage.clone());
        let k = key("site.com");
        cache.put(&k, &report("site.com", 40, t0())).unwrap();
        let before = storage.snapshot(CACHE_STORAGE_KEY).unwrap();

        assert!(cache.get(&k, t0() + Duration::days(8)).is_none());
        assert_eq!(storage.snapshot(CACHE_STORAGE_KEY).unwrap(), before);
        assert_eq!(cache.stats(t0() + Duration::days(8)).stale, 1);
    }

    #[test]
    fn put_overwrites_wholesale() {
        let cache = ReportCache::new(MemoryStorage::new());
        let k = key("site.com");
        let mut old = report("site.com", 30, t0());
        old.summary = "old".to_string();
        cache.put(&k, &old).unwrap();

        let later = t0() + Duration::days(9);
        let mut new = report("site.com", 90, later);
        new.sections.seo.advantages.clear();
        cache.put(&k, &new).unwrap();

        assert_eq!(cache.get(&k, later), Some(new));
        assert_eq!(cache.stats(later).total(), 1);
    }

    #[test]
    fn malformed_blob_degrades_to_miss_and_is_replaced_on_put() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write(CACHE_STORAGE_KEY, b"{not json").unwrap();
        let cache = ReportCache::new(storage.clone());
        let k = key("example.com");

        assert!(cache.get(&k, t0()).is_none());
        cache.put(&k, &report("example.com", 72, t0())).unwrap();
        assert!(cache.get(&k, t0()).is_some());
    }

    /// Backend whose reads and writes always fail.
    struct BrokenStorage;

    impl KvStorage for BrokenStorage {
        fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
            Err(StorageError::Io {
                key: key.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        }

        fn write(&self, key: &str, _bytes: &[u8]) -> Result<(), StorageError> {
            Err(StorageError::Backend {
                key: key.to_string(),
                message: "read-only".to_string(),
            })
        }
    }

    #[test]
    fn backend_read_error_degrades_to_miss() {
        let cache = ReportCache::new(BrokenStorage);
        let k = key("example.com");

        assert!(cache.get(&k, t0()).is_none());
        assert_eq!(cache.stats(t0()), CacheStats::default());
        assert!(matches!(
            cache.put(&k, &report("example.com", 72, t0())),
            Err(StorageError::Backend { .. })
        ));
    }

    #[test]
    fn non_object_blob_is_a_miss() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write(CACHE_STORAGE_KEY, b"[1,2,3]").unwrap();
        let cache = ReportCache::new(storage);
        assert!(cache.get(&key("example.com"), t0()).is_none());
    }

    #[test]
    fn malformed_entry_does_not_hide_its_neighbours() {
        let storage = Arc::new(MemoryStorage::new());
        let cache = ReportCache::new(storage.clone());
        cache
            .put(&key("good.com"), &report("good.com", 60, t0()))
            .unwrap();

        let mut blob: Value =
            serde_json::from_slice(&storage.snapshot(CACHE_STORAGE_KEY).unwrap()).unwrap();
        blob["bad.com"] = serde_json::json!({"overallScore": "high"});
        storage
            .write(CACHE_STORAGE_KEY, &serde_json::to_vec(&blob).unwrap())
            .unwrap();

        assert!(cache.get(&key("bad.com"), t0()).is_none());
        assert!(cache.get(&key("good.com"), t0()).is_some());

        cache
            .put(&key("other.com"), &report("other.com", 10, t0()))
            .unwrap();
        let stats = cache.stats(t0());
        assert_eq!(stats.fresh, 2);
        assert_eq!(stats.unreadable, 1);
    }

    #[test]
    fn custom_window_is_respected() {
        let cache = ReportCache::with_window(MemoryStorage::new(), Duration::hours(1));
        let k = key("example.com");
        cache.put(&k, &report("example.com", 72, t0())).unwrap();
        assert!(cache.get(&k, t0() + Duration::minutes(59)).is_some());
        assert!(cache.get(&k, t0() + Duration::minutes(60)).is_none());
    }
}
