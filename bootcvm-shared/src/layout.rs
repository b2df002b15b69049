//! Filesystem layout of VM state.
//!
//! Pure path computation from the four root directories and a VM name:
//! - `FilesystemLayout`: the roots themselves
//! - `VmFilesystemLayout`: every file belonging to one VM
//! - `CachedImageLayout`: every file inside one cached base image
//!
//! Nothing here touches the filesystem except [`FilesystemLayout::prepare`].

use crate::constants::{image_files, vm_files};
use crate::errors::{BootcError, BootcResult};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

// ============================================================================
// FILESYSTEM LAYOUT (root directories)
// ============================================================================

/// Root directories every VM path is derived from.
///
/// ```text
/// {config_root}/{name}/vm.json
/// {config_root}/{name}/disk.qcow2
/// {run_root}/{name}/run.json
/// {run_root}/{name}/run.pid
/// {run_root}/{name}/install.pid
/// {ssh_root}/{name}        (.pub alongside)
/// {cache_root}/{image_id}/bc.cfg
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilesystemLayout {
    config_dir: PathBuf,
    cache_dir: PathBuf,
    run_dir: PathBuf,
    ssh_dir: PathBuf,
}

impl FilesystemLayout {
    pub fn new(
        config_dir: impl Into<PathBuf>,
        cache_dir: impl Into<PathBuf>,
        run_dir: impl Into<PathBuf>,
        ssh_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config_dir: config_dir.into(),
            cache_dir: cache_dir.into(),
            run_dir: run_dir.into(),
            ssh_dir: ssh_dir.into(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    pub fn ssh_dir(&self) -> &Path {
        &self.ssh_dir
    }

    /// Layout for the VM called `name`.
    pub fn vm(&self, name: &str) -> VmFilesystemLayout {
        VmFilesystemLayout {
            config_dir: self.config_dir.join(name),
            run_dir: self.run_dir.join(name),
            ssh_private_key: self.ssh_dir.join(name),
        }
    }

    /// Layout for the cache entry stored in directory `dir_name`.
    pub fn cached_image(&self, dir_name: &str) -> CachedImageLayout {
        CachedImageLayout::new(self.cache_dir.join(dir_name))
    }

    /// Initialize the root directories.
    ///
    /// Creates the config, cache and run roots if missing. Idempotent.
    /// The SSH root is owned by the user and left alone.
    pub fn prepare(&self) -> BootcResult<()> {
        for dir in [&self.config_dir, &self.cache_dir, &self.run_dir] {
            std::fs::create_dir_all(dir).map_err(|e| {
                BootcError::Storage(format!("failed to create {}: {e}", dir.display()))
            })?;
        }
        Ok(())
    }
}

// ============================================================================
// VM FILESYSTEM LAYOUT (per-VM paths)
// ============================================================================

/// Every path belonging to a single VM.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VmFilesystemLayout {
    config_dir: PathBuf,
    run_dir: PathBuf,
    ssh_private_key: PathBuf,
}

impl VmFilesystemLayout {
    /// Config directory: {config_root}/{name}
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Config file: {config_root}/{name}/vm.json
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(vm_files::CONFIG_FILE)
    }

    /// Disk image: {config_root}/{name}/disk.qcow2
    pub fn disk_image(&self) -> PathBuf {
        self.config_dir.join(vm_files::DISK_IMAGE)
    }

    /// Run directory: {run_root}/{name}
    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    /// Run config file: {run_root}/{name}/run.json
    pub fn run_config_file(&self) -> PathBuf {
        self.run_dir.join(vm_files::RUN_CONFIG_FILE)
    }

    /// Hypervisor PID file: {run_root}/{name}/run.pid
    pub fn run_pid_file(&self) -> PathBuf {
        self.run_dir.join(vm_files::RUN_PID_FILE)
    }

    /// Installer PID file: {run_root}/{name}/install.pid
    pub fn install_pid_file(&self) -> PathBuf {
        self.run_dir.join(vm_files::INSTALL_PID_FILE)
    }

    /// Private key: {ssh_root}/{name}
    pub fn ssh_private_key(&self) -> &Path {
        &self.ssh_private_key
    }

    /// Public key: {ssh_root}/{name}.pub
    pub fn ssh_public_key(&self) -> PathBuf {
        public_key_path(&self.ssh_private_key)
    }
}

/// Public key path for a private key: the same path with `.pub` appended.
///
/// Appends to the file name rather than replacing an extension, so
/// `fedora.40` becomes `fedora.40.pub`.
pub fn public_key_path(private_key: &Path) -> PathBuf {
    let mut raw: OsString = private_key.as_os_str().to_os_string();
    raw.push(vm_files::SSH_PUBLIC_KEY_SUFFIX);
    PathBuf::from(raw)
}

// ============================================================================
// CACHED IMAGE LAYOUT (per-image paths)
// ============================================================================

/// Files inside one base image cache entry.
///
/// ```text
/// {cache_root}/{image_id}/
/// ├── image-archive.tar
/// ├── image-dir/
/// ├── cidata/
/// ├── cidata.iso
/// ├── sshkey
/// ├── sshport
/// └── bc.cfg
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedImageLayout {
    root: PathBuf,
}

impl CachedImageLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(image_files::CONFIG_FILE)
    }

    pub fn oci_archive(&self) -> PathBuf {
        self.root.join(image_files::OCI_ARCHIVE)
    }

    pub fn oci_dir(&self) -> PathBuf {
        self.root.join(image_files::OCI_DIR)
    }

    pub fn cidata_dir(&self) -> PathBuf {
        self.root.join(image_files::CIDATA_DIR)
    }

    pub fn cidata_iso(&self) -> PathBuf {
        self.root.join(image_files::CIDATA_ISO)
    }

    pub fn ssh_key_file(&self) -> PathBuf {
        self.root.join(image_files::SSH_KEY_FILE)
    }

    pub fn ssh_port_file(&self) -> PathBuf {
        self.root.join(image_files::SSH_PORT_FILE)
    }
}
