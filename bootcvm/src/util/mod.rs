pub mod fs;
pub mod process;

use tracing_appender::non_blocking::NonBlocking;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub use fs::{file_exists, read_json};
pub use process::{ProcessChecker, SignalProcessChecker, is_process_alive, read_pid_file};

/// Install a global subscriber writing through `non_blocking`.
///
/// Returns false when a global subscriber was already set; the existing one
/// is kept.
pub fn register_to_tracing(
    non_blocking: NonBlocking,
    env_filter: EnvFilter,
    ansi: bool,
) -> bool {
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(ansi),
        )
        .try_init()
        .is_ok()
}
