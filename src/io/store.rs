use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tempfile::NamedTempFile;
use tracing::{debug, trace};

use crate::io::lock::{self, LockError, StoreLock};

/// Error type for durable store access
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} is not a valid store file: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error("store skipped the update of {key}")]
    UpdateSkipped { key: String },
}

/// A string-keyed, string-valued durable store.
///
/// Values are opaque strings; encoding them is the caller's business.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Read-modify-write of one key with no other writer in between.
    ///
    /// `f` is called once with the current value and returns the new one,
    /// or `None` to leave the key as it is. Returns whether a value was
    /// written.
    fn update(
        &mut self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> Option<String>,
    ) -> Result<bool, StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn update(
        &mut self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> Option<String>,
    ) -> Result<bool, StoreError> {
        (**self).update(key, f)
    }
}

/// In-process store, for tests and throwaway sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: IndexMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a key before handing the store out
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn update(
        &mut self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> Option<String>,
    ) -> Result<bool, StoreError> {
        match f(self.entries.get(key).cloned()) {
            Some(value) => {
                self.entries.insert(key.to_string(), value);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// A store backed by one JSON object file (`{"key": "value", ...}`).
///
/// Every `get` re-reads the file so writes from other processes are seen.
/// Writes hold a `StoreLock` from the read through the atomic replace, so
/// concurrent updates from a TUI and CLI runs queue up instead of
/// overwriting each other.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    path: PathBuf,
}

impl FileStore {
    pub fn open(dir: &Path, file_name: &str) -> Self {
        FileStore {
            dir: dir.to_path_buf(),
            path: dir.join(file_name),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<IndexMap<String, String>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(IndexMap::new()),
            Err(e) => {
                return Err(StoreError::ReadError {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        if content.trim().is_empty() {
            return Ok(IndexMap::new());
        }
        serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            source: e,
        })
    }

    fn write_all(&self, entries: &IndexMap<String, String>) -> Result<(), StoreError> {
        let write_err = |e: std::io::Error| StoreError::WriteError {
            path: self.path.clone(),
            source: e,
        };
        let content = serde_json::to_string_pretty(entries).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            source: e,
        })?;

        let mut temp = NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        temp.write_all(content.as_bytes()).map_err(write_err)?;
        temp.flush().map_err(write_err)?;
        temp.persist(&self.path).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        trace!(file = %self.path.display(), key, "store get");
        Ok(self.read_all()?.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(key, &mut |_| Some(value.to_string()))?;
        Ok(())
    }

    fn update(
        &mut self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> Option<String>,
    ) -> Result<bool, StoreError> {
        let _lock = StoreLock::acquire(&self.path, lock::DEFAULT_TIMEOUT)?;
        let mut entries = self.read_all()?;
        let Some(value) = f(entries.get(key).cloned()) else {
            trace!(file = %self.path.display(), key, "store update left key alone");
            return Ok(false);
        };
        let bytes = value.len();
        entries.insert(key.to_string(), value);
        self.write_all(&entries)?;
        debug!(file = %self.path.display(), key, bytes, "store set");
        Ok(true)
    }
}
