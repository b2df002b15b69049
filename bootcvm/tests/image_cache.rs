//! Integration tests for cached base image lookup.

use bootcvm::{BcVmConfig, ImageCache};
use bootcvm_test_utils::TestRoots;

fn bc_config(port: i64, key: &str) -> BcVmConfig {
    BcVmConfig {
        ssh_port: port,
        ssh_identity: key.to_string(),
    }
}

#[test]
fn prefix_matches_only_matching_directories() {
    let roots = TestRoots::new();
    roots.create_cached_image("abc123def", None);
    roots.create_cached_image("abc999", None);
    let xyz = roots.create_cached_image("xyz", None);

    let cache = ImageCache::new(roots.layout());
    let path = cache.image_path("abc").unwrap();

    assert_ne!(path, xyz);
    // Lexicographically last match
    assert_eq!(path, roots.layout().cache_dir().join("abc999"));
}

#[test]
fn unmatched_prefix_is_not_found() {
    let roots = TestRoots::new();
    roots.create_cached_image("abc123def", None);

    let err = ImageCache::new(roots.layout())
        .image_path("nomatch")
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "local installation 'nomatch' does not exist");
}

#[test]
fn load_config_reads_bc_cfg_of_match() {
    let roots = TestRoots::new();
    roots.create_cached_image("aaa111", Some(&bc_config(2201, "/k/aaa")));
    roots.create_cached_image("bbb222", Some(&bc_config(2202, "/k/bbb")));

    let cache = ImageCache::new(roots.layout());
    assert_eq!(cache.load_config("aaa").unwrap(), bc_config(2201, "/k/aaa"));
    assert_eq!(cache.load_config("bbb2").unwrap(), bc_config(2202, "/k/bbb"));
}

#[test]
fn image_layout_points_inside_entry() {
    let roots = TestRoots::new();
    let root = roots.create_cached_image("abc123", None);

    let image = ImageCache::new(roots.layout()).image_layout("abc").unwrap();
    assert_eq!(image.root(), root.as_path());
    assert_eq!(image.config_file(), root.join("bc.cfg"));
    assert_eq!(image.cidata_iso(), root.join("cidata.iso"));
}
