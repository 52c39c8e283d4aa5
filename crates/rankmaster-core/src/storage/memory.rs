//! In-memory [`KvStorage`] implementation for testing and embedding.
//!
//! Uses a `HashMap` behind `std::sync::RwLock`. Contents are lost when the
//! value is dropped.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{KvStorage, StorageError};

/// In-memory key-value store.
pub struct MemoryStorage {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// Snapshot of the raw blob under `key`, for byte-level comparisons.
    pub fn snapshot(&self, key: &str) -> Option<Vec<u8>> {
        self.blobs.read().unwrap().get(key).cloned()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.blobs.read().unwrap().get(key).cloned())
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.blobs
            .write()
            .unwrap()
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}
