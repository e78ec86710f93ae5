//! Snapshot outbound adapter.
//!
//! Persists the merged user set as a single JSON file and reads it back,
//! implementing the `SnapshotStore` port.

mod atomic_write;
mod file_store;

pub use file_store::{DEFAULT_SNAPSHOT_FILE, FileSnapshotStore, InvalidSnapshotPath};
