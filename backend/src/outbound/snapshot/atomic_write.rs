//! Temp-file-and-rename replacement of the snapshot file.
//!
//! The new contents are written and synced under a hidden name in the same
//! directory, then renamed over the target, so a concurrent reader sees
//! either the previous snapshot or the new one and never a partial write.

use std::io::{self, Write};

use cap_std::fs::{Dir, OpenOptions};
use uuid::Uuid;

/// Replace `file_name` inside `dir` with `contents`.
///
/// On failure the temporary file is removed on a best-effort basis and the
/// previous snapshot, if any, is left in place.
pub(super) fn replace_file(dir: &Dir, file_name: &str, contents: &[u8]) -> io::Result<()> {
    let staging_name = format!(".{file_name}.{}.tmp", Uuid::new_v4().simple());

    let staged = write_staging_file(dir, &staging_name, contents)
        .and_then(|()| rename_over_target(dir, &staging_name, file_name));
    if staged.is_err() {
        drop(dir.remove_file(&staging_name));
        return staged;
    }

    // Directory sync makes the rename durable where the platform allows it.
    if dir.open(".").and_then(|handle| handle.sync_all()).is_err() {
        tracing::debug!(file_name, "snapshot directory sync skipped");
    }
    Ok(())
}

fn write_staging_file(dir: &Dir, staging_name: &str, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(staging_name, &options)?;
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(windows)]
fn rename_over_target(dir: &Dir, staging_name: &str, file_name: &str) -> io::Result<()> {
    // Windows refuses to rename over an existing file.
    match dir.remove_file(file_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(staging_name, dir, file_name)
}

#[cfg(not(windows))]
fn rename_over_target(dir: &Dir, staging_name: &str, file_name: &str) -> io::Result<()> {
    dir.rename(staging_name, dir, file_name)
}
