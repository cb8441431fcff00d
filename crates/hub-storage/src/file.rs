//! JSON-file storage backend.
//!
//! The whole store is a single JSON object of string values. Every write
//! rewrites the file through a temp file + rename so a crash never leaves a
//! half-written store behind. Content that does not parse is treated as an
//! empty store and replaced by the next write.

use crate::{SessionStorage, StorageError, StorageResult};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

type Entries = BTreeMap<String, String>;

/// File-backed key-value store.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStorage {
    /// Open a store at `path`, creating the parent directory if needed.
    /// The file itself is created on first write.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            lock: Mutex::new(()),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> StorageResult<Entries> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(StorageError::Io(e)),
        };

        if content.trim().is_empty() {
            return Ok(Entries::new());
        }

        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Session store is corrupt, treating as empty"
                );
                Ok(Entries::new())
            }
        }
    }

    fn write_entries(&self, entries: &Entries) -> StorageResult<()> {
        let tmp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&tmp_path, content)?;
        std::fs::rename(&tmp_path, &self.path)?;
        debug!(path = %self.path.display(), keys = entries.len(), "Session store written");
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let _guard = self.lock.lock();
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let _guard = self.lock.lock();
        Ok(self.read_entries()?.get(key).cloned())
    }

    fn remove(&self, key: &str) -> StorageResult<bool> {
        let _guard = self.lock.lock();
        let mut entries = self.read_entries()?;
        if entries.remove(key).is_none() {
            if entries.is_empty() && self.path.exists() {
                // Drop whatever unreadable content is left on disk.
                self.write_entries(&entries)?;
            }
            return Ok(false);
        }
        self.write_entries(&entries)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::open(&dir.path().join("session.json")).unwrap();

        assert_eq!(storage.get("session_token").unwrap(), None);
        assert!(!storage.remove("session_token").unwrap());
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_values_persist_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let first = FileStorage::open(&path).unwrap();
        first.set("session_token", "abc123").unwrap();
        first.set("user", r#"{"id":1}"#).unwrap();

        let second = FileStorage::open(&path).unwrap();
        assert_eq!(
            second.get("session_token").unwrap(),
            Some("abc123".to_string())
        );
        assert_eq!(second.get("user").unwrap(), Some(r#"{"id":1}"#.to_string()));

        assert!(second.remove("session_token").unwrap());
        assert_eq!(first.get("session_token").unwrap(), None);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_reads_as_empty_and_is_replaced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"session_token": "abc"#).unwrap();

        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.get("session_token").unwrap(), None);

        storage.set("session_token", "fresh").unwrap();
        assert_eq!(
            storage.get("session_token").unwrap(),
            Some("fresh".to_string())
        );

        let on_disk: Entries =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.len(), 1);
    }

    #[test]
    fn test_remove_resets_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "[1, 2").unwrap();

        let storage = FileStorage::open(&path).unwrap();
        assert!(!storage.remove("session_token").unwrap());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(serde_json::from_str::<Entries>(&content).unwrap().is_empty());
    }

    #[test]
    fn test_empty_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "").unwrap();

        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.get("user").unwrap(), None);
        storage.set("user", "{}").unwrap();
        assert!(storage.has("user").unwrap());
    }
}
