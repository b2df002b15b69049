//! PID file probing.
//!
//! A PID file holds the decimal PID of a process, optionally with a trailing
//! newline. Liveness is decided by sending the null signal to that PID. Any
//! ambiguity (PID out of range, signal refused) is reported as "not alive":
//! a stale PID file left by a crashed hypervisor must never look running.

use bootcvm_shared::errors::{BootcError, BootcResult};
use std::io::ErrorKind;
use std::path::Path;

/// Capability to ask whether a process exists.
///
/// Implemented by [`SignalProcessChecker`] for the real process table and by
/// any `Fn(i64) -> bool` closure, which tests use as a fake.
pub trait ProcessChecker: Send + Sync {
    fn is_alive(&self, pid: i64) -> bool;
}

impl<F> ProcessChecker for F
where
    F: Fn(i64) -> bool + Send + Sync,
{
    fn is_alive(&self, pid: i64) -> bool {
        self(pid)
    }
}

/// Checks liveness with `kill(pid, 0)`.
///
/// A process that exists but belongs to another user yields `EPERM` and is
/// reported as not alive, as is a PID that is zero, negative or too large
/// for the platform (0 and -1 would address process groups).
#[derive(Clone, Copy, Debug, Default)]
pub struct SignalProcessChecker;

impl ProcessChecker for SignalProcessChecker {
    #[cfg(unix)]
    fn is_alive(&self, pid: i64) -> bool {
        use nix::sys::signal::{Signal, kill};
        use nix::unistd::Pid;

        let raw = match i32::try_from(pid) {
            Ok(raw) if raw > 0 => raw,
            _ => return false,
        };

        kill(Pid::from_raw(raw), None::<Signal>).is_ok()
    }

    #[cfg(not(unix))]
    fn is_alive(&self, _pid: i64) -> bool {
        // No null signal to probe with.
        false
    }
}

/// Read PID from file.
///
/// Newlines around the PID are stripped; anything else that is not a
/// base-10 integer is a `Probe` error.
pub fn read_pid_file(path: &Path) -> BootcResult<i64> {
    let content = std::fs::read_to_string(path).map_err(|e| BootcError::Probe {
        path: path.to_path_buf(),
        reason: format!("failed to read: {e}"),
    })?;

    let pid = content.trim_matches('\n');
    pid.parse::<i64>().map_err(|e| BootcError::Probe {
        path: path.to_path_buf(),
        reason: format!("'{pid}' is not a PID: {e}"),
    })
}

/// Check whether the process recorded in `pid_file` is alive.
///
/// # Returns
/// * `Ok(false)` - No PID file, or the recorded process is gone
/// * `Ok(true)` - The recorded process accepts signals
/// * `Err(Probe)` - The PID file exists but cannot be read or parsed
pub fn is_process_alive(pid_file: &Path, checker: &dyn ProcessChecker) -> BootcResult<bool> {
    match std::fs::metadata(pid_file) {
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::trace!(pid_file = %pid_file.display(), "No PID file");
            return Ok(false);
        }
        Err(e) => {
            return Err(BootcError::Probe {
                path: pid_file.to_path_buf(),
                reason: format!("failed to stat: {e}"),
            });
        }
    }

    let pid = read_pid_file(pid_file)?;
    let alive = checker.is_alive(pid);
    tracing::debug!(pid_file = %pid_file.display(), pid, alive, "Probed PID file");
    Ok(alive)
}
