//! bootcvm - lifecycle state of locally run bootc virtual machines
//!
//! Everything here is derived from the filesystem: VM configuration is read
//! from JSON files under the config root, and whether a VM is installing,
//! running or stopped is decided by probing the PIDs recorded under the run
//! root. There is no daemon and no in-memory state between invocations.

pub mod images;
pub mod logging;
pub mod runtime;
pub mod util;
pub mod vm;

pub use bootcvm_shared::{
    BcVmConfig, BootcError, BootcResult, CachedImageLayout, FilesystemLayout, RunVmConfig,
    VmConfig, VmFilesystemLayout,
};
pub use images::ImageCache;
pub use runtime::options::BootcOptions;
pub use util::process::{ProcessChecker, SignalProcessChecker};
pub use vm::{VmStatus, VmStore};
