//! Logging initialisation for processes embedding bootcvm.
//!
//! `init` writes structured logs to `{run_dir}/logs/bootcvm.log` with daily
//! rotation; `init_stderr` writes to the terminal. Both honour `RUST_LOG`.
//!
//! The returned guard must be kept alive for the duration of the process so
//! that buffered log lines are flushed on exit. If a global subscriber is
//! already installed it is left in place.

use crate::runtime::constants::{LOG_FILE, dirs as const_dirs};
use crate::runtime::options::BootcOptions;
use crate::util::register_to_tracing;
use bootcvm_shared::errors::{BootcError, BootcResult};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initialize tracing with file logging under the run root.
pub fn init(options: &BootcOptions) -> BootcResult<WorkerGuard> {
    let logs_dir = options.run_dir.join(const_dirs::LOGS_DIR);
    std::fs::create_dir_all(&logs_dir).map_err(|e| {
        BootcError::Storage(format!("failed to create {}: {e}", logs_dir.display()))
    })?;

    let file_appender = tracing_appender::rolling::daily(&logs_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    if !register_to_tracing(non_blocking, env_filter("info"), false) {
        tracing::debug!("Global subscriber already set, keeping it");
    }
    Ok(guard)
}

/// Initialize tracing on stderr (default level `warn`).
pub fn init_stderr() -> WorkerGuard {
    let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stderr());
    register_to_tracing(non_blocking, env_filter("warn"), true);
    guard
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}
