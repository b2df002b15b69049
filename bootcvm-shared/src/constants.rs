//! Shared constants between the core and the installer/runner
//!
//! These names must be identical on both sides: the installer writes the
//! files, the core only reads them.

/// Files inside a VM's config directory and run directory.
pub mod vm_files {
    /// Durable VM configuration: `{config_root}/{name}/vm.json`
    pub const CONFIG_FILE: &str = "vm.json";

    /// VM disk image: `{config_root}/{name}/disk.qcow2`
    pub const DISK_IMAGE: &str = "disk.qcow2";

    /// Ephemeral port assignments: `{run_root}/{name}/run.json`
    pub const RUN_CONFIG_FILE: &str = "run.json";

    /// PID of the running hypervisor: `{run_root}/{name}/run.pid`
    pub const RUN_PID_FILE: &str = "run.pid";

    /// PID of the installer: `{run_root}/{name}/install.pid`
    pub const INSTALL_PID_FILE: &str = "install.pid";

    /// Appended to the private key path to get the public key path.
    pub const SSH_PUBLIC_KEY_SUFFIX: &str = ".pub";
}

/// Files inside a cached base image directory (`{cache_root}/{image_id}/`).
pub mod image_files {
    /// OCI archive of the bootc image
    pub const OCI_ARCHIVE: &str = "image-archive.tar";

    /// Unpacked OCI layout directory
    pub const OCI_DIR: &str = "image-dir";

    /// cloud-init NoCloud data directory
    pub const CIDATA_DIR: &str = "cidata";

    /// cloud-init NoCloud ISO built from [`CIDATA_DIR`]
    pub const CIDATA_ISO: &str = "cidata.iso";

    /// Private key used to reach a machine booted from this image
    pub const SSH_KEY_FILE: &str = "sshkey";

    /// SSH port forwarded for a machine booted from this image
    pub const SSH_PORT_FILE: &str = "sshport";

    /// Embedded image configuration ([`crate::BcVmConfig`] JSON)
    pub const CONFIG_FILE: &str = "bc.cfg";
}
