//! VM lifecycle status.
//!
//! Status is never stored. It is classified on every query from two PID
//! files written by external processes:
//! ```text
//! install.pid alive          → Installing
//! else run.pid alive         → Running
//! else                       → Stopped
//! ```
//! Installing wins when both are alive. A PID file that cannot be read or
//! parsed counts as "not alive" for that file, so classification never fails.

use crate::util::process::{ProcessChecker, is_process_alive};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Lifecycle status of a VM, derived from PID-file evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VmStatus {
    /// Installer process is alive.
    Installing,

    /// Hypervisor process is alive and no installer is.
    Running,

    /// Neither process is alive.
    Stopped,
}

impl VmStatus {
    pub fn is_installing(&self) -> bool {
        matches!(self, VmStatus::Installing)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, VmStatus::Running)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, VmStatus::Stopped)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VmStatus::Installing => "Installing",
            VmStatus::Running => "Running",
            VmStatus::Stopped => "Stopped",
        }
    }
}

impl std::str::FromStr for VmStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Installing" => Ok(VmStatus::Installing),
            "Running" => Ok(VmStatus::Running),
            "Stopped" => Ok(VmStatus::Stopped),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for VmStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a VM from its install and run PID files.
pub fn derive_status(
    install_pid_file: &Path,
    run_pid_file: &Path,
    checker: &dyn ProcessChecker,
) -> VmStatus {
    if probe_or_dead(install_pid_file, checker) {
        return VmStatus::Installing;
    }

    if probe_or_dead(run_pid_file, checker) {
        return VmStatus::Running;
    }

    VmStatus::Stopped
}

fn probe_or_dead(pid_file: &Path, checker: &dyn ProcessChecker) -> bool {
    match is_process_alive(pid_file, checker) {
        Ok(alive) => alive,
        Err(e) => {
            tracing::warn!(error = %e, "Treating unreadable PID file as not alive");
            false
        }
    }
}
