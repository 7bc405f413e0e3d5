//! Cart Storage
//!
//! Durable key/value storage the cart is persisted to after every mutation.

use std::{
    collections::BTreeMap,
    fmt::Debug,
    fs, io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::warn;

/// Key holding the serialized line list.
pub const CART_ITEMS_KEY: &str = "cart_items";

/// Key holding the bound client id.
pub const CART_CLIENT_ID_KEY: &str = "cart_client_id";

/// Key holding the bound client name.
pub const CART_CLIENT_NAME_KEY: &str = "cart_client_name";

/// Errors raised by cart storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("cart storage I/O failed")]
    Io(#[from] io::Error),

    /// Stored data could not be encoded or decoded.
    #[error("cart storage holds malformed data")]
    Json(#[from] serde_json::Error),
}

/// String key/value storage that survives a restart of the console.
pub trait CartStorage: Debug + Send {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend cannot be written.
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;

    /// Remove a value. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage. Clones share the same entries.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<FxHashMap<String, String>>>,
}

impl MemoryStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` currently holds a value.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }
}

impl CartStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value);

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);

        Ok(())
    }
}

/// Storage backed by a single JSON object file, rewritten on every change.
///
/// Two consoles sharing a file overwrite each other; the last write wins.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStorage {
    /// Open the file at `path`, starting empty when it does not exist yet or does not parse.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();

        let entries = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|error| {
                warn!(path = %path.display(), %error, "discarding malformed cart file");

                BTreeMap::new()
            }),
            Err(error) if error.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(error) => return Err(error.into()),
        };

        Ok(Self { path, entries })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write beside the target and rename so a crash never leaves a truncated file.
        let tmp_path = self.path.with_extension("json.tmp");

        fs::write(&tmp_path, serde_json::to_vec_pretty(&self.entries)?)?;

        if let Err(error) = fs::rename(&tmp_path, &self.path) {
            _ = fs::remove_file(&tmp_path);

            return Err(error.into());
        }

        Ok(())
    }
}

impl CartStorage for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value);

        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn memory_storage_clones_share_entries() -> TestResult {
        let storage = MemoryStorage::new();
        let mut handle = storage.clone();

        handle.set(CART_ITEMS_KEY, "[]".to_owned())?;

        assert!(storage.contains(CART_ITEMS_KEY));
        assert_eq!(storage.get(CART_ITEMS_KEY)?, Some("[]".to_owned()));

        handle.remove(CART_ITEMS_KEY)?;

        assert!(!storage.contains(CART_ITEMS_KEY));

        Ok(())
    }

    #[test]
    fn file_storage_starts_empty_when_missing() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = JsonFileStorage::open(dir.path().join("cart.json"))?;

        assert_eq!(storage.get(CART_CLIENT_ID_KEY)?, None);

        Ok(())
    }

    #[test]
    fn file_storage_survives_reopen() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("state").join("cart.json");

        let mut storage = JsonFileStorage::open(&path)?;
        storage.set(CART_CLIENT_ID_KEY, "7".to_owned())?;
        storage.set(CART_CLIENT_NAME_KEY, "Ana Ruiz".to_owned())?;
        storage.remove(CART_CLIENT_NAME_KEY)?;

        let reopened = JsonFileStorage::open(&path)?;

        assert_eq!(reopened.get(CART_CLIENT_ID_KEY)?, Some("7".to_owned()));
        assert_eq!(reopened.get(CART_CLIENT_NAME_KEY)?, None);

        Ok(())
    }

    #[test]
    fn file_storage_discards_truncated_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("cart.json");

        fs::write(&path, r#"{"cart_items": "[{trunc"#)?;

        let mut storage = JsonFileStorage::open(&path)?;

        assert_eq!(storage.get(CART_ITEMS_KEY)?, None);

        storage.set(CART_CLIENT_ID_KEY, "3".to_owned())?;

        let reopened = JsonFileStorage::open(&path)?;

        assert_eq!(reopened.get(CART_CLIENT_ID_KEY)?, Some("3".to_owned()));
        assert!(!path.with_extension("json.tmp").exists());

        Ok(())
    }
}
