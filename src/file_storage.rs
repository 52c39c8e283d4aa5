//! File-backed [`KvStorage`] implementation.
//!
//! Each storage key maps to `<dir>/<key>.json`. Writes go to a temporary
//! file in the same directory and are renamed into place, so a crash never
//! leaves a half-written blob behind. A missing file reads as absent.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use uuid::Uuid;

use rankmaster_core::storage::{KvStorage, StorageError};

use crate::config::Config;

/// Open the durable store configured under `[storage]`.
pub fn open(config: &Config) -> Arc<dyn KvStorage> {
    Arc::new(FileStorage::new(&config.storage.dir))
}

pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::Backend {
                key: key.to_string(),
                message: "storage keys may only contain [A-Za-z0-9_-]".to_string(),
            });
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KvStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(io_err)?;
        let tmp = self.dir.join(format!(".{}.{}.tmp", key, Uuid::new_v4()));
        if let Err(e) = std::fs::write(&tmp, bytes) {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(e));
        }
        if let Err(e) = std::fs::rename(&tmp, &path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(e));
        }
        tracing::debug!(key, path = %path.display(), bytes = bytes.len(), "wrote storage blob");
        Ok(())
    }
}
