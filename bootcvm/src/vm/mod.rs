//! VM state: status derivation and the configuration store.

pub mod status;
pub mod store;

pub use status::{VmStatus, derive_status};
pub use store::VmStore;
