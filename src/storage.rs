// Durable key-value medium behind the task store

use crate::error::{Result, StoreError};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Key under which the serialized task collection is stored.
pub const TASKS_KEY: &str = "tasks";
/// Key under which the dark-mode preference is stored (UI concern).
pub const DARK_MODE_KEY: &str = "darkMode";

/// Scalar key-value medium the store persists into.
///
/// Injected into [`TaskStore`](crate::store::TaskStore) so tests can
/// substitute an in-memory double.
pub trait Storage {
    /// Read the value stored under `key`, `None` if never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// On-disk storage: one `<key>.json` file per key under a `.todostore`
/// subdirectory of the given base path.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Open or create storage rooted at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = path.as_ref().join(".todostore");
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    /// Get the base path of this storage
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.base_path.join(format!("{}.json", key)))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;

        let mut file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;

        // Acquire exclusive lock before writing
        file.lock_exclusive()?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;

        // Lock is automatically released when file is dropped
        debug!(key, bytes = value.len(), "wrote storage key");
        Ok(())
    }
}

/// In-memory storage, used as a test double and in the demos.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(StoreError::Validation("storage key cannot be empty".to_string()));
    }
    if key.len() > 64 {
        return Err(StoreError::Validation(format!(
            "storage key too long: {} (max 64 chars)",
            key
        )));
    }
    if !key.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(StoreError::Validation(format!(
            "invalid storage key: {} (must be alphanumeric with _/-)",
            key
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_creates_directory() {
        let temp = TempDir::new().unwrap();

        let _storage = FileStorage::open(temp.path()).unwrap();
        assert!(temp.path().join(".todostore").exists());
    }

    #[test]
    fn test_file_storage_set_then_get() {
        let temp = TempDir::new().unwrap();
        let mut storage = FileStorage::open(temp.path()).unwrap();

        storage.set(TASKS_KEY, "[]").unwrap();
        assert_eq!(storage.get(TASKS_KEY).unwrap().as_deref(), Some("[]"));

        // Value files land under the base directory
        assert!(temp.path().join(".todostore/tasks.json").exists());
    }

    #[test]
    fn test_file_storage_overwrite() {
        let temp = TempDir::new().unwrap();
        let mut storage = FileStorage::open(temp.path()).unwrap();

        storage.set(DARK_MODE_KEY, "false").unwrap();
        storage.set(DARK_MODE_KEY, "true").unwrap();
        assert_eq!(storage.get(DARK_MODE_KEY).unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn test_file_storage_missing_key() {
        let temp = TempDir::new().unwrap();
        let storage = FileStorage::open(temp.path()).unwrap();

        assert!(storage.get(TASKS_KEY).unwrap().is_none());
    }

    #[test]
    fn test_memory_storage_round_trip() {
        let mut storage = MemoryStorage::new();
        assert!(storage.get(TASKS_KEY).unwrap().is_none());

        storage.set(TASKS_KEY, "[1,2]").unwrap();
        assert_eq!(storage.get(TASKS_KEY).unwrap().as_deref(), Some("[1,2]"));
    }

    #[test]
    fn test_validate_key() {
        // Valid
        assert!(validate_key("tasks").is_ok());
        assert!(validate_key("darkMode").is_ok());
        assert!(validate_key("some-key_2").is_ok());

        // Invalid
        assert!(validate_key("").is_err());
        assert!(validate_key("bad/key").is_err());
        assert!(validate_key(&"a".repeat(65)).is_err());
    }
}
