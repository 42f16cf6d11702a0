//! Architecture discovery from an indexed distribution tree.

use std::collections::BTreeSet;
use std::path::Path;

use crate::error::Result;

/// Prefix of per-architecture index directories.
const BINARY_PREFIX: &str = "binary-";

/// Enumerate the architectures actually indexed under a distribution
/// directory.
///
/// Walks the immediate component subdirectories of `dist_dir` and collects
/// the suffixes of their `binary-*` subdirectories. Non-directory entries
/// are skipped. The `all` pseudo-architecture (`binary-all`) is only
/// included when `include_arch_all` is set. The result is a sorted set, so
/// serializing it is deterministic regardless of directory creation order.
pub fn discover_architectures(dist_dir: &Path, include_arch_all: bool) -> Result<BTreeSet<String>> {
    let mut architectures = BTreeSet::new();

    for component in std::fs::read_dir(dist_dir)? {
        let component = component?;
        if !component.file_type()?.is_dir() {
            continue;
        }

        for entry in std::fs::read_dir(component.path())? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name();
            let Some(arch) = name.to_string_lossy().strip_prefix(BINARY_PREFIX).map(String::from)
            else {
                continue;
            };
            if arch == "all" && !include_arch_all {
                continue;
            }
            architectures.insert(arch);
        }
    }

    Ok(architectures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn mkdirs(root: &Path, paths: &[&str]) {
        for p in paths {
            fs::create_dir_all(root.join(p)).unwrap();
        }
    }

    #[test]
    fn test_collects_architectures_across_components() {
        let dir = TempDir::new().unwrap();
        mkdirs(
            dir.path(),
            &[
                "main/binary-amd64",
                "main/binary-arm64",
                "contrib/binary-amd64",
            ],
        );

        let archs = discover_architectures(dir.path(), false).unwrap();
        assert_eq!(
            archs.into_iter().collect::<Vec<_>>(),
            vec!["amd64".to_string(), "arm64".to_string()]
        );
    }

    #[test]
    fn test_result_is_order_independent() {
        let a = TempDir::new().unwrap();
        mkdirs(a.path(), &["main/binary-i386", "main/binary-amd64"]);

        let b = TempDir::new().unwrap();
        mkdirs(b.path(), &["other/binary-amd64", "main/binary-i386"]);

        assert_eq!(
            discover_architectures(a.path(), false).unwrap(),
            discover_architectures(b.path(), false).unwrap()
        );
    }

    #[test]
    fn test_skips_non_directories() {
        let dir = TempDir::new().unwrap();
        mkdirs(dir.path(), &["main/binary-amd64"]);
        fs::write(dir.path().join("Release"), "").unwrap();
        fs::write(dir.path().join("main/binary-fake"), "").unwrap();

        let archs = discover_architectures(dir.path(), false).unwrap();
        assert_eq!(archs.into_iter().collect::<Vec<_>>(), vec!["amd64"]);
    }

    #[test]
    fn test_ignores_unrelated_subdirectories() {
        let dir = TempDir::new().unwrap();
        mkdirs(dir.path(), &["main/binary-amd64", "main/source", "main/i18n"]);

        let archs = discover_architectures(dir.path(), false).unwrap();
        assert_eq!(archs.into_iter().collect::<Vec<_>>(), vec!["amd64"]);
    }

    #[test]
    fn test_binary_all_policy() {
        let dir = TempDir::new().unwrap();
        mkdirs(dir.path(), &["main/binary-amd64", "main/binary-all"]);

        let excluded = discover_architectures(dir.path(), false).unwrap();
        assert_eq!(excluded.into_iter().collect::<Vec<_>>(), vec!["amd64"]);

        let included = discover_architectures(dir.path(), true).unwrap();
        assert_eq!(
            included.into_iter().collect::<Vec<_>>(),
            vec!["all", "amd64"]
        );
    }

    #[test]
    fn test_missing_dist_dir_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = discover_architectures(&dir.path().join("dists/absent"), false);
        assert!(result.is_err());
    }
}
