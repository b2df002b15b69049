//! bootcvm shared - the on-disk contract for locally run bootc VMs
//!
//! This crate contains the file names, path layout, JSON schemas and error
//! types used by both the bootcvm core (which reads VM state) and the
//! installer/runner (which writes it).

pub mod config;
pub mod constants;
pub mod errors;
pub mod layout;

pub use config::{BcVmConfig, RunVmConfig, VmConfig};
pub use errors::{BootcError, BootcResult};
pub use layout::{CachedImageLayout, FilesystemLayout, VmFilesystemLayout};
