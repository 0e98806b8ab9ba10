//! Storage abstraction for persisted collections.
//!
//! The engine never touches platform storage directly. It is handed a
//! synchronous key-value [`Storage`] and performs complete
//! read-modify-write cycles against it. Two backends ship with the
//! crate: [`MemoryStorage`] for tests and host-managed persistence, and
//! [`FileStorage`] for one-file-per-key persistence on disk.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error raised by a storage backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct StorageError(String);

impl StorageError {
    /// Create a new backend error.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A synchronous key-value store.
///
/// `get` returns `Ok(None)` for an absent key. `set` overwrites the full
/// value under the key; there are no partial writes.
pub trait Storage {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory storage.
///
/// Used in tests and by the FFI layer, where the host seeds the store
/// with previously persisted text and writes the canonical text back out
/// after mutations.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed storage: one file per key under a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    data_dir: PathBuf,
}

impl FileStorage {
    /// Create a storage instance rooted at `data_dir`.
    ///
    /// The directory is created lazily on the first write.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the full path for a key.
    pub fn path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::new(format!(
                "failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir).map_err(|e| {
            StorageError::new(format!(
                "failed to create {}: {}",
                self.data_dir.display(),
                e
            ))
        })?;

        let path = self.path(key);
        fs::write(&path, value)
            .map_err(|e| StorageError::new(format!("failed to write {}: {}", path.display(), e)))
    }
}
