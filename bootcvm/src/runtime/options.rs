//! Configuration for bootcvm.

use crate::runtime::constants::{dirs as const_dirs, envs as const_envs};
use bootcvm_shared::FilesystemLayout;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root directories of all VM state.
///
/// Built once at startup and passed explicitly to [`crate::VmStore`] and
/// [`crate::ImageCache`]. Users can create it with defaults and modify
/// fields as needed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootcOptions {
    /// Durable VM configuration and disks: `{config_dir}/{name}/`
    pub config_dir: PathBuf,
    /// Cached base images: `{cache_dir}/{image_id}/`
    pub cache_dir: PathBuf,
    /// PID files and run configs: `{run_dir}/{name}/`
    pub run_dir: PathBuf,
    /// SSH key pairs: `{ssh_dir}/{name}` and `{ssh_dir}/{name}.pub`
    pub ssh_dir: PathBuf,
}

impl Default for BootcOptions {
    fn default() -> Self {
        Self::resolve_with(|key| std::env::var(key).ok())
    }
}

impl BootcOptions {
    /// All four roots under a single base directory.
    pub fn with_root(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self {
            config_dir: base.join("config"),
            cache_dir: base.join("cache"),
            run_dir: base.join("run"),
            ssh_dir: base.join("ssh"),
        }
    }

    /// Resolve the roots from `env` overrides, then platform directories.
    pub fn resolve_with(env: impl Fn(&str) -> Option<String>) -> Self {
        let from_env = |key: &str| env(key).filter(|v| !v.is_empty()).map(PathBuf::from);
        let app_dir = |base: Option<PathBuf>| {
            base.unwrap_or_else(|| PathBuf::from("."))
                .join(const_dirs::APP_DIR)
        };

        let config_dir =
            from_env(const_envs::CONFIG_DIR).unwrap_or_else(|| app_dir(dirs::config_dir()));
        let cache_dir =
            from_env(const_envs::CACHE_DIR).unwrap_or_else(|| app_dir(dirs::cache_dir()));
        let run_dir = from_env(const_envs::RUN_DIR).unwrap_or_else(|| {
            dirs::runtime_dir()
                .map(|dir| dir.join(const_dirs::APP_DIR))
                .unwrap_or_else(|| std::env::temp_dir().join(const_dirs::FALLBACK_RUN_DIR))
        });
        let ssh_dir = from_env(const_envs::SSH_DIR).unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(const_dirs::SSH_DIR)
        });

        Self {
            config_dir,
            cache_dir,
            run_dir,
            ssh_dir,
        }
    }

    /// Path layout over these roots.
    pub fn layout(&self) -> FilesystemLayout {
        FilesystemLayout::new(
            &self.config_dir,
            &self.cache_dir,
            &self.run_dir,
            &self.ssh_dir,
        )
    }
}
