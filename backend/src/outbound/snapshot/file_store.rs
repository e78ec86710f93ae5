//! JSON file implementation of the `SnapshotStore` port.
//!
//! File access goes through `cap_std` handles opened on the snapshot's
//! parent directory and runs on Tokio's blocking pool.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use thiserror::Error;
use tracing::debug;

use super::atomic_write::replace_file;
use crate::domain::UserRecord;
use crate::domain::ports::{SnapshotStore, SnapshotStoreError};

/// Default snapshot file name, relative to the working directory.
pub const DEFAULT_SNAPSHOT_FILE: &str = "users_cache.json";

/// Rejected snapshot path.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("snapshot path {path:?} must name a UTF-8 file")]
pub struct InvalidSnapshotPath {
    /// Path as configured.
    pub path: PathBuf,
}

#[derive(Debug)]
struct SnapshotLocation {
    directory: PathBuf,
    file_name: String,
}

impl SnapshotLocation {
    fn display(&self) -> String {
        self.directory.join(&self.file_name).display().to_string()
    }
}

/// Snapshot store persisting records as an indented JSON array.
///
/// # Examples
/// ```rust,no_run
/// use roster::outbound::snapshot::FileSnapshotStore;
///
/// let store = FileSnapshotStore::new("users_cache.json").expect("valid snapshot path");
/// assert!(store.path().ends_with("users_cache.json"));
/// ```
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    location: Arc<SnapshotLocation>,
}

impl FileSnapshotStore {
    /// Build a store for the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSnapshotPath`] when `path` has no UTF-8 file name.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, InvalidSnapshotPath> {
        let path = path.into();
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            return Err(InvalidSnapshotPath { path });
        };
        let file_name = file_name.to_owned();
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Ok(Self {
            location: Arc::new(SnapshotLocation {
                directory,
                file_name,
            }),
        })
    }

    /// Full path of the snapshot file.
    pub fn path(&self) -> PathBuf {
        self.location.directory.join(&self.location.file_name)
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn load(&self) -> Result<Option<Vec<UserRecord>>, SnapshotStoreError> {
        let location = Arc::clone(&self.location);
        tokio::task::spawn_blocking(move || load_blocking(&location))
            .await
            .map_err(|err| SnapshotStoreError::io(format!("snapshot read task failed: {err}")))?
    }

    async fn save(&self, records: &[UserRecord]) -> Result<(), SnapshotStoreError> {
        let contents = serde_json::to_vec_pretty(records)
            .map_err(|err| SnapshotStoreError::serialization(err.to_string()))?;
        let location = Arc::clone(&self.location);
        tokio::task::spawn_blocking(move || save_blocking(&location, &contents))
            .await
            .map_err(|err| SnapshotStoreError::io(format!("snapshot write task failed: {err}")))?
    }
}

fn load_blocking(
    location: &SnapshotLocation,
) -> Result<Option<Vec<UserRecord>>, SnapshotStoreError> {
    let Some(dir) = open_dir(&location.directory).map_err(|err| io_error(location, &err))? else {
        return Ok(None);
    };
    let bytes = match dir.read(&location.file_name) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(io_error(location, &err)),
    };
    let records: Vec<UserRecord> = serde_json::from_slice(&bytes).map_err(|err| {
        SnapshotStoreError::corrupt(format!("{}: {err}", location.display()))
    })?;
    debug!(path = %location.display(), records = records.len(), "snapshot loaded");
    Ok(Some(records))
}

fn save_blocking(location: &SnapshotLocation, contents: &[u8]) -> Result<(), SnapshotStoreError> {
    Dir::create_ambient_dir_all(&location.directory, ambient_authority())
        .map_err(|err| io_error(location, &err))?;
    let dir = Dir::open_ambient_dir(&location.directory, ambient_authority())
        .map_err(|err| io_error(location, &err))?;
    replace_file(&dir, &location.file_name, contents).map_err(|err| io_error(location, &err))?;
    debug!(path = %location.display(), bytes = contents.len(), "snapshot written");
    Ok(())
}

fn open_dir(directory: &Path) -> io::Result<Option<Dir>> {
    match Dir::open_ambient_dir(directory, ambient_authority()) {
        Ok(dir) => Ok(Some(dir)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

fn io_error(location: &SnapshotLocation, err: &io::Error) -> SnapshotStoreError {
    SnapshotStoreError::io(format!("{}: {err}", location.display()))
}
