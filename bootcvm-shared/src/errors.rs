//! Error types for bootcvm.
//!
//! Errors are categorized by what the caller can do about them:
//! - [`BootcError::NotFound`]: create or install first
//! - [`BootcError::NotRunning`]: start the VM first
//! - [`BootcError::Malformed`]: an existing file does not match its schema
//! - [`BootcError::Probe`]: a PID file exists but cannot be trusted
//! - [`BootcError::Storage`]: any other filesystem failure

use std::path::PathBuf;
use thiserror::Error;

pub type BootcResult<T> = Result<T, BootcError>;

#[derive(Debug, Error)]
pub enum BootcError {
    /// Named VM or cached image does not exist.
    #[error("{0}")]
    NotFound(String),

    /// File exists but does not decode as the expected JSON schema.
    #[error("malformed {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Run configuration requested while the VM is not running.
    #[error("VM '{0}' is not running, you need to start it first")]
    NotRunning(String),

    /// PID file is unreadable or does not hold a decimal PID.
    #[error("invalid PID file {}: {reason}", path.display())]
    Probe { path: PathBuf, reason: String },

    /// Filesystem I/O failure.
    #[error("storage error: {0}")]
    Storage(String),
}

impl BootcError {
    pub fn vm_not_found(name: &str) -> Self {
        BootcError::NotFound(format!("VM '{name}' does not exist"))
    }

    pub fn image_not_found(id: &str) -> Self {
        BootcError::NotFound(format!("local installation '{id}' does not exist"))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BootcError::NotFound(_))
    }

    pub fn is_not_running(&self) -> bool {
        matches!(self, BootcError::NotRunning(_))
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, BootcError::Malformed { .. })
    }

    pub fn is_probe(&self) -> bool {
        matches!(self, BootcError::Probe { .. })
    }
}
