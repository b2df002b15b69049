//! Constants for the bootcvm runtime

pub use bootcvm_shared::constants::{image_files, vm_files};

/// Environment variables overriding the default root directories.
pub mod envs {
    pub const CONFIG_DIR: &str = "BOOTCVM_CONFIG_DIR";
    pub const CACHE_DIR: &str = "BOOTCVM_CACHE_DIR";
    pub const RUN_DIR: &str = "BOOTCVM_RUN_DIR";
    pub const SSH_DIR: &str = "BOOTCVM_SSH_DIR";
}

/// Directory names under the platform base directories.
pub mod dirs {
    /// Per-application directory under config/cache/runtime base dirs
    pub const APP_DIR: &str = "bootcvm";

    /// Run directory used when the platform has no runtime dir
    pub const FALLBACK_RUN_DIR: &str = "bootcvm-run";

    /// SSH key directory under the home directory
    pub const SSH_DIR: &str = ".ssh";

    /// Log directory under the run root
    pub const LOGS_DIR: &str = "logs";
}

/// Log file written by [`crate::logging::init`]
pub const LOG_FILE: &str = "bootcvm.log";
