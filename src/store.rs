// filepath: photo-board/src/store.rs
//! Persistent click counters
//!
//! Counters live in one JSON object per namespace, keyed by button id.
//! Every write is a read-modify-write of the whole object with no locking,
//! so the store assumes a single writer: two processes sharing a namespace
//! can lose each other's updates.

use log::warn;
use serde_json::Value;
use std::cell::RefCell;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The whole persisted map. Values that are not counters are preserved.
pub type CounterMap = serde_json::Map<String, Value>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("counter store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("counter store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Key-value storage for button counters
pub trait CounterStore {
    /// Read the whole map
    fn load(&self) -> Result<CounterMap, StoreError>;

    /// Replace the whole map
    fn save(&self, map: &CounterMap) -> Result<(), StoreError>;

    /// Counter for `id`, zero when absent, not an integer, or unreadable
    fn counter(&self, id: &str) -> u64 {
        match self.load() {
            Ok(map) => map.get(id).and_then(Value::as_u64).unwrap_or(0),
            Err(e) => {
                warn!("Reading counter for {} failed, using 0: {}", id, e);
                0
            }
        }
    }

    /// Merge one counter into the stored map
    fn put_counter(&self, id: &str, value: u64) -> Result<(), StoreError> {
        let mut map = self.load().unwrap_or_else(|e| {
            warn!("Discarding unreadable counter store: {}", e);
            CounterMap::new()
        });
        map.insert(id.to_string(), Value::from(value));
        self.save(&map)
    }
}

/// Counters in `{data_dir}/photo-board/{namespace}.json`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for `namespace` under the platform data directory
    pub fn for_namespace(namespace: &str) -> Option<Self> {
        let dir = dirs::data_dir()?.join("photo-board");
        Some(Self::new(dir.join(format!("{namespace}.json"))))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CounterStore for JsonFileStore {
    fn load(&self) -> Result<CounterMap, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(CounterMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(CounterMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, map: &CounterMap) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string(map)?)?;
        Ok(())
    }
}

/// Store that lives for the session only
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: RefCell<CounterMap>,
}

impl MemoryStore {
    pub fn with_counters<'a>(counters: impl IntoIterator<Item = (&'a str, u64)>) -> Self {
        let map = counters
            .into_iter()
            .map(|(id, value)| (id.to_string(), Value::from(value)))
            .collect();
        Self {
            map: RefCell::new(map),
        }
    }
}

impl CounterStore for MemoryStore {
    fn load(&self) -> Result<CounterMap, StoreError> {
        Ok(self.map.borrow().clone())
    }

    fn save(&self, map: &CounterMap) -> Result<(), StoreError> {
        *self.map.borrow_mut() = map.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("j6w.json"));
        assert!(store.load().unwrap().is_empty());
        assert_eq!(store.counter("a"), 0);
    }

    #[test]
    fn put_merges_with_existing_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("j6w.json");
        fs::write(&path, r#"{"a": 3, "note": "kept"}"#).unwrap();
        let store = JsonFileStore::new(&path);

        store.put_counter("b", 5).unwrap();

        let map = store.load().unwrap();
        assert_eq!(map.get("a"), Some(&Value::from(3)));
        assert_eq!(map.get("b"), Some(&Value::from(5)));
        assert_eq!(map.get("note"), Some(&Value::from("kept")));
    }

    #[test]
    fn corrupt_file_falls_back_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("j6w.json");
        fs::write(&path, "{not json").unwrap();
        let store = JsonFileStore::new(&path);

        assert!(matches!(store.load(), Err(StoreError::Corrupt(_))));
        assert_eq!(store.counter("a"), 0);

        store.put_counter("a", 1).unwrap();
        assert_eq!(store.counter("a"), 1);
    }

    #[test]
    fn non_integer_values_read_as_zero() {
        let store = MemoryStore::default();
        let mut map = CounterMap::new();
        map.insert("a".into(), Value::from("three"));
        map.insert("b".into(), Value::from(-2));
        store.save(&map).unwrap();

        assert_eq!(store.counter("a"), 0);
        assert_eq!(store.counter("b"), 0);
    }
}
