//! JSON schemas of the VM state files.
//!
//! Field names on the wire are fixed (`Name`, `VCPU`, `SshPriKey`, ...);
//! the installer writes exactly these documents. Missing fields decode to
//! their zero value and unknown fields are ignored.

use crate::constants::vm_files;
use crate::layout::{FilesystemLayout, public_key_path};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ============================================================================
// VM CONFIG (durable, vm.json)
// ============================================================================

/// Durable configuration of one VM.
///
/// The path fields are derived from `name` and the layout when the value is
/// constructed; there is no way to set them independently.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VmConfig {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "VCPU")]
    pub vcpu: u64,

    #[serde(rename = "Mem")]
    pub mem: u64,

    #[serde(rename = "DiskSize")]
    pub disk_size: u64,

    #[serde(rename = "DiskImage")]
    disk_image: PathBuf,

    #[serde(rename = "RunPidFile")]
    run_pid_file: PathBuf,

    #[serde(rename = "SshPriKey")]
    ssh_pri_key: PathBuf,
}

impl VmConfig {
    /// Configuration for a new VM with its resources.
    pub fn new(
        layout: &FilesystemLayout,
        name: &str,
        vcpu: u64,
        mem: u64,
        disk_size: u64,
    ) -> Self {
        Self {
            vcpu,
            mem,
            disk_size,
            ..Self::partial(layout, name)
        }
    }

    /// Configuration carrying only the name and derived paths.
    ///
    /// Used to locate an existing VM's files before its vm.json is read.
    pub fn partial(layout: &FilesystemLayout, name: &str) -> Self {
        let vm = layout.vm(name);
        Self {
            name: name.to_string(),
            vcpu: 0,
            mem: 0,
            disk_size: 0,
            disk_image: vm.disk_image(),
            run_pid_file: vm.run_pid_file(),
            ssh_pri_key: vm.ssh_private_key().to_path_buf(),
        }
    }

    pub fn disk_image(&self) -> &Path {
        &self.disk_image
    }

    pub fn run_pid_file(&self) -> &Path {
        &self.run_pid_file
    }

    pub fn ssh_pri_key(&self) -> &Path {
        &self.ssh_pri_key
    }

    /// Directory holding vm.json and the disk image.
    pub fn config_dir(&self) -> PathBuf {
        parent_dir(&self.disk_image)
    }

    /// Directory holding the PID files and run.json.
    pub fn run_dir(&self) -> PathBuf {
        parent_dir(&self.run_pid_file)
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir().join(vm_files::CONFIG_FILE)
    }

    pub fn run_config_file(&self) -> PathBuf {
        self.run_dir().join(vm_files::RUN_CONFIG_FILE)
    }

    pub fn install_pid_file(&self) -> PathBuf {
        self.run_dir().join(vm_files::INSTALL_PID_FILE)
    }

    /// SSH key pair as `(public, private)`.
    pub fn ssh_keys(&self) -> (PathBuf, PathBuf) {
        (public_key_path(&self.ssh_pri_key), self.ssh_pri_key.clone())
    }
}

/// Parent directory of `path`, `.` for a bare file name.
fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

// ============================================================================
// RUN VM CONFIG (ephemeral, run.json)
// ============================================================================

/// Port assignments of a running VM.
///
/// Only meaningful while the run PID is alive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunVmConfig {
    #[serde(rename = "SshPort")]
    pub ssh_port: u64,

    #[serde(rename = "VncPort")]
    pub vnc_port: u64,
}

// ============================================================================
// BC VM CONFIG (cached image, bc.cfg)
// ============================================================================

/// How to reach a machine booted from a cached base image.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BcVmConfig {
    #[serde(rename = "SshPort")]
    pub ssh_port: i64,

    #[serde(rename = "SshPriKey")]
    pub ssh_identity: String,
}
