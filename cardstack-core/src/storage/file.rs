//! File-backed key/value store.
//!
//! All entries live in a single JSON object file inside the data directory.
//! Every operation reads the file and writes it back in full, the same way
//! browser local storage persists a whole origin.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use super::{KeyValueStore, StorageError};

/// Filename of the store inside the data directory.
const STORE_FILE: &str = "local_storage.json";

#[derive(Clone, Debug)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `data_dir`. Nothing is written until the first `set`.
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    pub fn path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE)
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let path = self.path();

        match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|e| StorageError::ParseError(path, e))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(StorageError::IoError(path, e)),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StorageError::IoError(self.data_dir.clone(), e))?;

        let path = self.path();
        let contents =
            serde_json::to_string_pretty(entries).map_err(|e| StorageError::ParseError(path.clone(), e))?;
        fs::write(&path, contents).map_err(|e| StorageError::IoError(path, e))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}
