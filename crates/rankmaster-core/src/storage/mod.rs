//! Durable key-value storage abstraction.
//!
//! The [`KvStorage`] trait is the only persistence capability the report
//! cache and history need: read a whole blob by key, or replace it. Each
//! consumer serializes its own state into a single self-contained blob
//! under its own key, so there is no partial update and no cross-key
//! transaction.
//!
//! Implementations must be `Send + Sync`. Access is synchronous; callers
//! perform a full read-modify-write and do not coordinate concurrent
//! writers.
//!
//! | Implementation | Location |
//! |----------------|----------|
//! | [`MemoryStorage`](memory::MemoryStorage) | this crate; tests and embedding |
//! | `FileStorage` | `rankmaster` app crate; one file per key |

pub mod memory;

pub use memory::MemoryStorage;

use std::sync::Arc;

use thiserror::Error;

/// Failure reading or writing a storage blob.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("storage backend error for '{key}': {message}")]
    Backend { key: String, message: String },
}

/// Whole-blob key-value storage.
pub trait KvStorage: Send + Sync {
    /// Read the blob stored under `key`, or `None` if nothing was ever
    /// written there.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replace the blob stored under `key`.
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;
}

impl<T: KvStorage + ?Sized> KvStorage for Arc<T> {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        (**self).write(key, bytes)
    }
}
