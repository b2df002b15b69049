//! Fixtures for bootcvm integration tests.
//!
//! `TestRoots` owns an isolated set of root directories in a temp dir and
//! materializes what the installer, runner and image fetcher would leave on
//! disk: vm.json, PID files, run.json and cache entries.

use bootcvm::{BcVmConfig, BootcOptions, FilesystemLayout, RunVmConfig, VmConfig};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A PID far above any platform's `pid_max`.
pub const DEAD_PID: i64 = 999_999_999;

/// PID of the test process itself, always alive.
pub fn current_pid() -> i64 {
    i64::from(std::process::id())
}

pub struct TestRoots {
    pub options: BootcOptions,
    _temp_dir: TempDir, // Dropped after test
}

impl Default for TestRoots {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRoots {
    /// Fresh roots, already prepared.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let options = BootcOptions::with_root(temp_dir.path());
        options
            .layout()
            .prepare()
            .expect("Failed to prepare root directories");
        Self {
            options,
            _temp_dir: temp_dir,
        }
    }

    pub fn layout(&self) -> FilesystemLayout {
        self.options.layout()
    }

    /// Persist `vm` the way the installer does (write, then rename).
    pub fn save_vm(&self, vm: &VmConfig) {
        let json = serde_json::to_string_pretty(vm).expect("Failed to serialize VmConfig");
        write_atomic(&vm.config_file(), &json);
    }

    /// Create and persist a VM with the given resources.
    pub fn create_vm(&self, name: &str, vcpu: u64, mem: u64, disk_size: u64) -> VmConfig {
        let vm = VmConfig::new(&self.layout(), name, vcpu, mem, disk_size);
        self.save_vm(&vm);
        vm
    }

    /// Write raw content as the VM's vm.json.
    pub fn write_vm_json(&self, name: &str, content: &str) {
        write_atomic(&self.layout().vm(name).config_file(), content);
    }

    pub fn write_install_pid(&self, name: &str, pid: impl Display) {
        write_atomic(
            &self.layout().vm(name).install_pid_file(),
            &format!("{pid}\n"),
        );
    }

    pub fn write_run_pid(&self, name: &str, pid: impl Display) {
        write_atomic(&self.layout().vm(name).run_pid_file(), &format!("{pid}\n"));
    }

    pub fn remove_install_pid(&self, name: &str) {
        let _ = std::fs::remove_file(self.layout().vm(name).install_pid_file());
    }

    pub fn remove_run_pid(&self, name: &str) {
        let _ = std::fs::remove_file(self.layout().vm(name).run_pid_file());
    }

    pub fn write_run_config(&self, name: &str, run: &RunVmConfig) {
        let json = serde_json::to_string(run).expect("Failed to serialize RunVmConfig");
        write_atomic(&self.layout().vm(name).run_config_file(), &json);
    }

    /// Create a cache entry directory, with bc.cfg when `config` is given.
    pub fn create_cached_image(&self, dir_name: &str, config: Option<&BcVmConfig>) -> PathBuf {
        let image = self.layout().cached_image(dir_name);
        std::fs::create_dir_all(image.root()).expect("Failed to create cache entry");
        if let Some(config) = config {
            let json = serde_json::to_string(config).expect("Failed to serialize BcVmConfig");
            write_atomic(&image.config_file(), &json);
        }
        image.root().to_path_buf()
    }
}

/// Write `content` to a sibling temp file, then rename it over `path`.
pub fn write_atomic(path: &Path, content: &str) {
    let parent = path.parent().expect("Path has no parent");
    std::fs::create_dir_all(parent).expect("Failed to create parent directory");

    let mut tmp_name = path.file_name().expect("Path has no file name").to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = parent.join(tmp_name);

    std::fs::write(&tmp_path, content).expect("Failed to write temp file");
    std::fs::rename(&tmp_path, path).expect("Failed to rename temp file");
}
