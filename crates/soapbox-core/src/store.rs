//! Local key-value persistence for the anonymous user state.
//!
//! The store holds exactly two keys: the generated user identifier and the
//! JSON-encoded snapshot of voted feature ids. [`FsStore`] keeps one file
//! per key under a platform data directory; [`MemoryStore`] backs tests and
//! ephemeral sessions.
//!
//! Storage failures here are never fatal to callers — the vote tracker
//! absorbs them and keeps operating on in-memory state.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Key under which the persistent user identifier is stored.
pub const USER_ID_KEY: &str = "user_id";
/// Key under which the JSON-encoded vote snapshot is stored.
pub const USER_VOTES_KEY: &str = "user_votes";

/// Environment variable overriding the on-disk store location.
pub const DATA_DIR_ENV: &str = "SOAPBOX_DATA_DIR";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Durable string key-value storage.
///
/// The seam between the user session and whatever actually persists it.
pub trait KeyValueStore {
    /// Read a key, returning `None` when it has never been written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a key, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key; removing a key that was never written is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing storage cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// One file per key under a data directory.
#[derive(Debug, Clone)]
pub struct FsStore {
    dir: PathBuf,
}

impl FsStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// Directory creation failure is logged, not returned: later writes
    /// will fail and callers absorb those per the storage failure posture.
    #[must_use]
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if let Err(err) = std::fs::create_dir_all(&dir) {
            tracing::warn!(dir = %dir.display(), error = %err, "failed to create data directory");
        }
        Self { dir }
    }

    /// Open the default store location.
    ///
    /// Resolution order: `SOAPBOX_DATA_DIR`, the platform data directory,
    /// then the system temp directory as a last resort.
    #[must_use]
    pub fn open_default() -> Self {
        let dir = std::env::var_os(DATA_DIR_ENV).map_or_else(
            || {
                dirs::data_dir()
                    .unwrap_or_else(std::env::temp_dir)
                    .join("soapbox")
            },
            PathBuf::from,
        );
        Self::open(dir)
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStore for FsStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::write(self.key_path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Io(io::Error::other("memory store lock poisoned"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_store_round_trips_keys() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let store = FsStore::open(tmp.path().join("state"));

        assert!(store.get(USER_ID_KEY).expect("get").is_none());
        store.set(USER_ID_KEY, "user_123_abc").expect("set");
        assert_eq!(
            store.get(USER_ID_KEY).expect("get").as_deref(),
            Some("user_123_abc")
        );

        store.remove(USER_ID_KEY).expect("remove");
        assert!(store.get(USER_ID_KEY).expect("get").is_none());
    }

    #[test]
    fn fs_store_remove_missing_key_is_ok() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let store = FsStore::open(tmp.path());
        store.remove("never_written").expect("remove is idempotent");
    }

    #[test]
    fn memory_store_round_trips_keys() {
        let store = MemoryStore::new();
        store.set(USER_VOTES_KEY, "[1,2]").expect("set");
        assert_eq!(
            store.get(USER_VOTES_KEY).expect("get").as_deref(),
            Some("[1,2]")
        );
        store.remove(USER_VOTES_KEY).expect("remove");
        assert!(store.get(USER_VOTES_KEY).expect("get").is_none());
    }
}
