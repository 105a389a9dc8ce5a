use std::{collections::HashMap, fs, path::PathBuf, sync::Mutex};

use log::debug;
use serde::{Deserialize, Serialize};

use super::KeyValueStore;
use crate::errors::StorageError;

const CURRENT_VERSION: u32 = 1;

/// All records in one pretty-printed JSON file.
///
/// Every write rewrites the file through a sibling temp file and a rename,
/// so a crash mid-write leaves the previous contents in place.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    lock: Mutex<()>,
}

#[derive(Serialize, Deserialize, Default)]
struct StoreFile {
    version: u32,
    records: HashMap<String, String>,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn with_records<F>(&self, op: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut HashMap<String, String>),
    {
        let _guard = self.lock.lock().map_err(|_| StorageError::LockPoisoned)?;
        let mut records = self.load_locked()?;
        op(&mut records);
        self.persist_locked(records)
    }

    fn load_locked(&self) -> Result<HashMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let raw = fs::read(&self.path).map_err(|e| StorageError::ReadFailed(e.to_string()))?;
        if raw.is_empty() {
            return Ok(HashMap::new());
        }

        let file: StoreFile =
            serde_json::from_slice(&raw).map_err(|e| StorageError::Corrupt {
                key: self.path.display().to_string(),
                message: e.to_string(),
            })?;
        Ok(file.records)
    }

    fn persist_locked(&self, records: HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StorageError::WriteFailed(e.to_string()))?;
            }
        }

        let file = StoreFile {
            version: CURRENT_VERSION,
            records,
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        debug!("Persisted storage file {}", self.path.display());
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(self.load_locked()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.with_records(|records| {
            records.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.with_records(|records| {
            records.remove(key);
        })
    }
}
