//! In-memory snapshot store implementation for testing.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;
use crate::store::SnapshotStore;

/// In-memory snapshot store.
///
/// Stores snapshots as JSON values in a map and provides the same
/// interface as the file-backed implementation. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Value>>>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored snapshots.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Returns true if no snapshots are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Injects a raw JSON value under `key`, bypassing serialization.
    /// Lets tests stand in for a corrupt or hand-written snapshot.
    pub fn insert_raw(&self, key: &str, value: Value) {
        self.entries.write().unwrap().insert(key.to_string(), value);
    }
}

impl SnapshotStore for MemoryStore {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let entries = self.entries.read().unwrap();
        match entries.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.entries.write().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let store = MemoryStore::new();
        store.save("orders", &vec!["a", "b"]).unwrap();

        let loaded: Option<Vec<String>> = store.load("orders").unwrap();
        assert_eq!(loaded, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_clones_share_storage() {
        let store = MemoryStore::new();
        let clone = store.clone();
        store.save("cart", &vec![1]).unwrap();

        let loaded: Option<Vec<i32>> = clone.load("cart").unwrap();
        assert_eq!(loaded, Some(vec![1]));
    }

    #[test]
    fn test_mismatched_shape_recovers_to_default() {
        let store = MemoryStore::new();
        store.insert_raw("cart", serde_json::json!({"not": "a list"}));

        let loaded: Vec<i32> = store.load_or_default("cart");
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_remove() {
        let store = MemoryStore::new();
        store.save("cart", &vec![1]).unwrap();
        store.remove("cart").unwrap();
        assert!(store.is_empty());
    }
}
