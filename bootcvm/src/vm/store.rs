//! VM configuration store.
//!
//! Loads the durable `vm.json` and the ephemeral `run.json` of a VM by name.
//! Read-only: the installer writes vm.json (write-then-rename) once it has
//! materialized the VM directory, and the runner writes run.json and the
//! PID files.
//!
//! There is no locking. Two processes targeting the same VM can both observe
//! `Stopped`; callers that need mutual exclusion must provide it.

use crate::util::fs::{file_exists, read_json};
use crate::util::process::{ProcessChecker, SignalProcessChecker};
use crate::vm::status::{VmStatus, derive_status};
use bootcvm_shared::errors::{BootcError, BootcResult};
use bootcvm_shared::{FilesystemLayout, RunVmConfig, VmConfig};
use std::sync::Arc;

/// Reads VM configuration and derives VM status from the filesystem.
#[derive(Clone)]
pub struct VmStore {
    layout: FilesystemLayout,
    checker: Arc<dyn ProcessChecker>,
}

impl std::fmt::Debug for VmStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VmStore")
            .field("config_dir", &self.layout.config_dir())
            .field("run_dir", &self.layout.run_dir())
            .finish()
    }
}

impl VmStore {
    pub fn new(layout: FilesystemLayout, checker: Arc<dyn ProcessChecker>) -> Self {
        Self { layout, checker }
    }

    /// Store probing the real process table.
    pub fn with_signal_checker(layout: FilesystemLayout) -> Self {
        Self::new(layout, Arc::new(SignalProcessChecker))
    }

    pub fn layout(&self) -> &FilesystemLayout {
        &self.layout
    }

    /// Whether the VM's vm.json exists.
    pub fn is_created(&self, name: &str) -> BootcResult<bool> {
        file_exists(&self.layout.vm(name).config_file())
    }

    /// Load the durable configuration of VM `name`.
    ///
    /// # Errors
    /// * `NotFound` - vm.json does not exist
    /// * `Malformed` - vm.json does not decode as [`VmConfig`]
    /// * `Storage` - vm.json exists but cannot be read
    pub fn load_vm_from_disk(&self, name: &str) -> BootcResult<VmConfig> {
        self.ensure_created(name)?;

        let config_file = self.layout.vm(name).config_file();
        let vm: VmConfig = read_json(&config_file)?;
        tracing::debug!(vm = name, config_file = %config_file.display(), "Loaded VM config");
        Ok(vm)
    }

    /// Load the run configuration of VM `name`, which must be running.
    ///
    /// # Errors
    /// * `NotFound` - vm.json does not exist
    /// * `NotRunning` - status is Installing or Stopped, even if run.json exists
    /// * `Malformed` - run.json does not decode as [`RunVmConfig`]
    /// * `Storage` - run.json cannot be read
    pub fn load_running_vm_from_disk(&self, name: &str) -> BootcResult<RunVmConfig> {
        self.ensure_created(name)?;

        let status = self.status(name);
        if !status.is_running() {
            tracing::debug!(vm = name, %status, "Refusing run config of non-running VM");
            return Err(BootcError::NotRunning(name.to_string()));
        }

        read_json(&self.layout.vm(name).run_config_file())
    }

    /// Status of VM `name` from the PID files at its layout paths.
    pub fn status(&self, name: &str) -> VmStatus {
        let vm = self.layout.vm(name);
        let status = derive_status(
            &vm.install_pid_file(),
            &vm.run_pid_file(),
            self.checker.as_ref(),
        );
        tracing::debug!(vm = name, %status, "Derived VM status");
        status
    }

    /// Status of a loaded VM from the PID file paths it records.
    pub fn status_of(&self, vm: &VmConfig) -> VmStatus {
        derive_status(
            &vm.install_pid_file(),
            vm.run_pid_file(),
            self.checker.as_ref(),
        )
    }

    fn ensure_created(&self, name: &str) -> BootcResult<()> {
        if self.is_created(name)? {
            Ok(())
        } else {
            Err(BootcError::vm_not_found(name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    const LIVE: i64 = 4242;

    fn store(tmp: &TempDir) -> VmStore {
        let layout = FilesystemLayout::new(
            tmp.path().join("config"),
            tmp.path().join("cache"),
            tmp.path().join("run"),
            tmp.path().join("ssh"),
        );
        layout.prepare().unwrap();
        VmStore::new(layout, Arc::new(|pid: i64| pid == LIVE))
    }

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn create_vm(store: &VmStore, name: &str) -> VmConfig {
        let vm = VmConfig::new(store.layout(), name, 2, 2048, 10);
        write(&vm.config_file(), &serde_json::to_string(&vm).unwrap());
        vm
    }

    #[test]
    fn test_load_missing_vm_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = store(&tmp).load_vm_from_disk("ghost").unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "VM 'ghost' does not exist");
    }

    #[test]
    fn test_load_vm_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let vm = create_vm(&store, "fedora");

        assert!(store.is_created("fedora").unwrap());
        assert_eq!(store.load_vm_from_disk("fedora").unwrap(), vm);
    }

    #[test]
    fn test_load_vm_malformed() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        write(&store.layout().vm("fedora").config_file(), "{ not json");

        assert!(store.load_vm_from_disk("fedora").unwrap_err().is_malformed());
    }

    #[test]
    fn test_load_vm_null_document_is_malformed() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        write(&store.layout().vm("fedora").config_file(), "null");

        assert!(store.load_vm_from_disk("fedora").unwrap_err().is_malformed());
    }

    #[test]
    fn test_running_vm_requires_existing_vm() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        let err = store.load_running_vm_from_disk("ghost").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_running_vm_not_running_even_with_run_json() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        create_vm(&store, "fedora");
        let paths = store.layout().vm("fedora");
        write(&paths.run_config_file(), r#"{"SshPort":2222,"VncPort":5900}"#);

        let err = store.load_running_vm_from_disk("fedora").unwrap_err();
        assert!(err.is_not_running());
        assert_eq!(
            err.to_string(),
            "VM 'fedora' is not running, you need to start it first"
        );
    }

    #[test]
    fn test_running_vm_while_installing_is_not_running() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        create_vm(&store, "fedora");
        let paths = store.layout().vm("fedora");
        write(&paths.install_pid_file(), &LIVE.to_string());
        write(&paths.run_pid_file(), &LIVE.to_string());
        write(&paths.run_config_file(), r#"{"SshPort":2222,"VncPort":5900}"#);

        assert_eq!(store.status("fedora"), VmStatus::Installing);
        assert!(store.load_running_vm_from_disk("fedora").unwrap_err().is_not_running());
    }

    #[test]
    fn test_running_vm_loads_run_config() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        create_vm(&store, "fedora");
        let paths = store.layout().vm("fedora");
        write(&paths.run_pid_file(), &format!("{LIVE}\n"));
        write(&paths.run_config_file(), r#"{"SshPort":2222,"VncPort":5900}"#);

        let run = store.load_running_vm_from_disk("fedora").unwrap();
        assert_eq!(run.ssh_port, 2222);
        assert_eq!(run.vnc_port, 5900);
    }

    #[test]
    fn test_running_vm_malformed_run_config() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        create_vm(&store, "fedora");
        let paths = store.layout().vm("fedora");
        write(&paths.run_pid_file(), &LIVE.to_string());
        write(&paths.run_config_file(), r#"{"SshPort":"x"}"#);

        assert!(store.load_running_vm_from_disk("fedora").unwrap_err().is_malformed());
    }

    #[test]
    fn test_running_vm_missing_run_config_is_storage() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        create_vm(&store, "fedora");
        write(&store.layout().vm("fedora").run_pid_file(), &LIVE.to_string());

        let err = store.load_running_vm_from_disk("fedora").unwrap_err();
        assert!(matches!(err, BootcError::Storage(_)));
    }

    #[test]
    fn test_status_of_uses_recorded_paths() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let vm = create_vm(&store, "fedora");
        write(vm.run_pid_file(), &LIVE.to_string());

        assert_eq!(store.status_of(&vm), VmStatus::Running);
        assert_eq!(store.status("fedora"), VmStatus::Running);
        assert_eq!(store.status("other"), VmStatus::Stopped);
    }
}
