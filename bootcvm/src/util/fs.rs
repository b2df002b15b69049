//! Small filesystem helpers shared by the store and the image cache.

use bootcvm_shared::errors::{BootcError, BootcResult};
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::Path;

/// Check whether `path` exists.
///
/// Absence is `Ok(false)`; any other stat failure (permission denied, a
/// file used as a directory component) is a `Storage` error.
pub fn file_exists(path: &Path) -> BootcResult<bool> {
    match std::fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(BootcError::Storage(format!(
            "failed to stat {}: {e}",
            path.display()
        ))),
    }
}

/// Read `path` and decode it as JSON.
///
/// Read failures are `Storage` errors, decode failures are `Malformed`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> BootcResult<T> {
    let content = std::fs::read(path).map_err(|e| {
        BootcError::Storage(format!("failed to read {}: {e}", path.display()))
    })?;

    serde_json::from_slice(&content).map_err(|source| BootcError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}
