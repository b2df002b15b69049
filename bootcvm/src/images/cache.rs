//! Cached base image lookup.
//!
//! The image fetcher stores each base image in its own directory under the
//! cache root, named by image ID. Users may refer to an image by any prefix
//! of that ID. This module only resolves the prefix and reads `bc.cfg`.
//!
//! Does NOT handle:
//! - Fetching or extracting images (image fetcher's responsibility)
//! - Building cloud-init data (installer's responsibility)

use crate::util::fs::read_json;
use bootcvm_shared::errors::{BootcError, BootcResult};
use bootcvm_shared::{BcVmConfig, CachedImageLayout, FilesystemLayout};
use std::path::PathBuf;

/// Read-only view of the base image cache.
#[derive(Clone, Debug)]
pub struct ImageCache {
    layout: FilesystemLayout,
}

impl ImageCache {
    pub fn new(layout: FilesystemLayout) -> Self {
        Self { layout }
    }

    /// Resolve an image ID prefix to a cache directory name.
    ///
    /// Only directories qualify. An exact name match wins; otherwise the
    /// lexicographically greatest matching name is chosen, independent of
    /// directory listing order.
    pub fn resolve_id(&self, id_prefix: &str) -> BootcResult<String> {
        let cache_dir = self.layout.cache_dir();
        let entries = std::fs::read_dir(cache_dir).map_err(|e| {
            BootcError::Storage(format!("failed to list {}: {e}", cache_dir.display()))
        })?;

        let mut matches = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                BootcError::Storage(format!("failed to list {}: {e}", cache_dir.display()))
            })?;

            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if !file_type.is_dir() {
                continue;
            }

            // Image IDs are ASCII; skip anything that isn't UTF-8.
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.starts_with(id_prefix) {
                matches.push(name);
            }
        }

        if matches.iter().any(|name| name == id_prefix) {
            return Ok(id_prefix.to_string());
        }

        matches.sort();
        let Some(chosen) = matches.last().cloned() else {
            return Err(BootcError::image_not_found(id_prefix));
        };

        if matches.len() > 1 {
            tracing::warn!(
                prefix = id_prefix,
                candidates = ?matches,
                chosen = %chosen,
                "Ambiguous image prefix, using last match"
            );
        }
        Ok(chosen)
    }

    /// Path of the cache directory matching `id_prefix`.
    pub fn image_path(&self, id_prefix: &str) -> BootcResult<PathBuf> {
        Ok(self.image_layout(id_prefix)?.root().to_path_buf())
    }

    /// File layout of the cache entry matching `id_prefix`.
    pub fn image_layout(&self, id_prefix: &str) -> BootcResult<CachedImageLayout> {
        let id = self.resolve_id(id_prefix)?;
        Ok(self.layout.cached_image(&id))
    }

    /// Load `bc.cfg` of the cache entry matching `id_prefix`.
    ///
    /// Read failures are `Storage` errors, decode failures `Malformed`.
    pub fn load_config(&self, id_prefix: &str) -> BootcResult<BcVmConfig> {
        let image = self.image_layout(id_prefix)?;
        let config: BcVmConfig = read_json(&image.config_file())?;
        tracing::debug!(image = %image.root().display(), "Loaded cached image config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cache(tmp: &TempDir, dirs: &[&str]) -> ImageCache {
        let layout = FilesystemLayout::new(
            tmp.path().join("config"),
            tmp.path().join("cache"),
            tmp.path().join("run"),
            tmp.path().join("ssh"),
        );
        layout.prepare().unwrap();
        for dir in dirs {
            std::fs::create_dir_all(layout.cache_dir().join(dir)).unwrap();
        }
        ImageCache::new(layout)
    }

    #[test]
    fn test_prefix_picks_last_sorted_match() {
        let tmp = TempDir::new().unwrap();
        let cache = cache(&tmp, &["abc123def", "abc999", "xyz"]);

        assert_eq!(cache.resolve_id("abc").unwrap(), "abc999");
        assert_eq!(
            cache.image_path("abc").unwrap(),
            tmp.path().join("cache").join("abc999")
        );
    }

    #[test]
    fn test_unique_prefix() {
        let tmp = TempDir::new().unwrap();
        let cache = cache(&tmp, &["abc123def", "abc999", "xyz"]);

        assert_eq!(cache.resolve_id("abc1").unwrap(), "abc123def");
        assert_eq!(cache.resolve_id("x").unwrap(), "xyz");
    }

    #[test]
    fn test_exact_match_wins() {
        let tmp = TempDir::new().unwrap();
        let cache = cache(&tmp, &["abc", "abcdef"]);

        assert_eq!(cache.resolve_id("abc").unwrap(), "abc");
    }

    #[test]
    fn test_no_match_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let cache = cache(&tmp, &["abc123def", "xyz"]);

        let err = cache.resolve_id("nomatch").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "local installation 'nomatch' does not exist");
    }

    #[test]
    fn test_files_never_match() {
        let tmp = TempDir::new().unwrap();
        let cache = cache(&tmp, &[]);
        std::fs::write(tmp.path().join("cache").join("abc.tar"), "").unwrap();

        assert!(cache.resolve_id("abc").unwrap_err().is_not_found());
    }

    #[test]
    fn test_missing_cache_root_is_storage() {
        let tmp = TempDir::new().unwrap();
        let cache = ImageCache::new(FilesystemLayout::new(
            tmp.path().join("config"),
            tmp.path().join("missing"),
            tmp.path().join("run"),
            tmp.path().join("ssh"),
        ));

        assert!(matches!(
            cache.resolve_id("abc").unwrap_err(),
            BootcError::Storage(_)
        ));
    }

    #[test]
    fn test_load_config() {
        let tmp = TempDir::new().unwrap();
        let cache = cache(&tmp, &["abc123"]);
        std::fs::write(
            tmp.path().join("cache/abc123/bc.cfg"),
            r#"{"SshPort":2222,"SshPriKey":"/cache/abc123/sshkey"}"#,
        )
        .unwrap();

        let config = cache.load_config("abc").unwrap();
        assert_eq!(config.ssh_port, 2222);
        assert_eq!(config.ssh_identity, "/cache/abc123/sshkey");
    }

    #[test]
    fn test_load_config_missing_file() {
        let tmp = TempDir::new().unwrap();
        let cache = cache(&tmp, &["abc123"]);

        assert!(matches!(
            cache.load_config("abc").unwrap_err(),
            BootcError::Storage(_)
        ));
    }

    #[test]
    fn test_load_config_malformed() {
        let tmp = TempDir::new().unwrap();
        let cache = cache(&tmp, &["abc123"]);
        std::fs::write(tmp.path().join("cache/abc123/bc.cfg"), r#"{"SshPort":"x"}"#).unwrap();

        assert!(cache.load_config("abc").unwrap_err().is_malformed());
    }
}
