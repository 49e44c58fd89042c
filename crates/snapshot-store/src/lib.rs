//! Durable keyed JSON snapshots.
//!
//! Every mutable collection in the system (cart, orders, identity) is
//! persisted as a whole snapshot under a string key on every mutation,
//! and read back once at session start. This crate provides:
//! - The [`SnapshotStore`] trait with corrupt-snapshot recovery
//! - [`FileStore`], one JSON file per key with atomic replacement
//! - [`MemoryStore`], the same interface backed by a map, for tests
//!
//! Concurrent writers are not coordinated; the last write wins.

pub mod error;
pub mod file;
pub mod memory;
pub mod store;

pub use error::{Result, StoreError};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::SnapshotStore;
