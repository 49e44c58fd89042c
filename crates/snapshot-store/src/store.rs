//! The snapshot store trait.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// Durable keyed snapshot storage.
///
/// Callers persist the full value under its key on every mutation and
/// load it back once at session start. Implementations must replace the
/// previous snapshot atomically: a crash mid-write may lose the new
/// snapshot but never leaves a half-written one behind.
pub trait SnapshotStore: Send + Sync {
    /// Loads the snapshot stored under `key`.
    ///
    /// Returns `Ok(None)` when no snapshot exists; a snapshot that exists
    /// but cannot be parsed is an error.
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>;

    /// Replaces the snapshot stored under `key`.
    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()>;

    /// Removes the snapshot stored under `key`, if any.
    fn remove(&self, key: &str) -> Result<()>;

    /// Loads the snapshot under `key`, falling back to the default value
    /// when it is missing or unreadable.
    ///
    /// A corrupt snapshot is logged and recovered locally; it is never
    /// surfaced to the user and never fatal.
    fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.load(key) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                tracing::warn!(key, error = %e, "unreadable snapshot, starting from default");
                T::default()
            }
        }
    }
}
