//! Driven port for the persisted user snapshot.
use async_trait::async_trait;

use super::define_port_error;
use crate::domain::UserRecord;

define_port_error! {
    /// Errors surfaced by the snapshot adapter.
    pub enum SnapshotStoreError {
        /// The snapshot exists but could not be read or written.
        Io { message: String } => "snapshot store I/O failed: {message}",
        /// The stored bytes are not a valid list of user records.
        Corrupt { message: String } => "snapshot is corrupt: {message}",
        /// Records could not be encoded for storage.
        Serialization { message: String } => "snapshot serialisation failed: {message}",
    }
}

/// Port for reading and replacing the user snapshot.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read the stored records.
    ///
    /// Returns `Ok(None)` when no snapshot has been written yet.
    async fn load(&self) -> Result<Option<Vec<UserRecord>>, SnapshotStoreError>;

    /// Replace the stored snapshot with `records`.
    async fn save(&self, records: &[UserRecord]) -> Result<(), SnapshotStoreError>;
}

/// Fixture store that never holds a snapshot and discards writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureSnapshotStore;

#[async_trait]
impl SnapshotStore for FixtureSnapshotStore {
    async fn load(&self) -> Result<Option<Vec<UserRecord>>, SnapshotStoreError> {
        Ok(None)
    }

    async fn save(&self, _records: &[UserRecord]) -> Result<(), SnapshotStoreError> {
        Ok(())
    }
}
