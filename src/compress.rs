//! Compressed index variants produced by external compressors.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::command::run_tool;
use crate::error::{RepoError, Result};

/// An external compressor that derives `<file>.<extension>` from `<file>`,
/// leaving the original in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compressor {
    /// Program to invoke.
    pub program: PathBuf,
    /// File extension produced, without the leading dot.
    pub extension: String,
}

impl Compressor {
    /// Create a compressor from a program and the extension it produces.
    pub fn new<P: Into<PathBuf>, S: Into<String>>(program: P, extension: S) -> Self {
        Self {
            program: program.into(),
            extension: extension.into(),
        }
    }

    /// The gzip compressor.
    pub fn gzip() -> Self {
        Self::new("gzip", "gz")
    }

    /// The bzip2 compressor.
    pub fn bzip2() -> Self {
        Self::new("bzip2", "bz2")
    }

    /// The xz compressor.
    pub fn xz() -> Self {
        Self::new("xz", "xz")
    }

    /// Compressors used by default for index files, chosen for broad
    /// client compatibility.
    pub fn defaults() -> Vec<Compressor> {
        vec![Self::gzip(), Self::bzip2(), Self::xz()]
    }

    /// Path of the variant this compressor derives from `source`.
    pub fn variant_path(&self, source: &Path) -> PathBuf {
        let mut name = source.as_os_str().to_os_string();
        name.push(".");
        name.push(&self.extension);
        PathBuf::from(name)
    }

    /// Derive the compressed variant of `source` next to it.
    ///
    /// A missing source file is an error, never a silent skip. `-f` lets
    /// regeneration overwrite a variant left by a previous run.
    pub fn compress_file(&self, source: &Path) -> Result<PathBuf> {
        if !source.exists() {
            return Err(RepoError::FileNotFound(source.to_path_buf()));
        }

        let cwd = source.parent().unwrap_or_else(|| Path::new("."));
        debug!(
            "compressing {} with {}",
            source.display(),
            self.program.display()
        );
        run_tool(&self.program, [Path::new("-f"), Path::new("-k"), source], cwd)?;
        Ok(self.variant_path(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_compressor_table() {
        let defaults = Compressor::defaults();
        assert_eq!(defaults.len(), 3);
        assert_eq!(defaults[0].extension, "gz");
        assert_eq!(defaults[1].extension, "bz2");
        assert_eq!(defaults[2].extension, "xz");
    }

    #[test]
    fn test_variant_path() {
        let c = Compressor::gzip();
        assert_eq!(
            c.variant_path(Path::new("/tmp/dists/Packages")),
            PathBuf::from("/tmp/dists/Packages.gz")
        );
    }

    #[test]
    fn test_missing_source_fails_loudly() {
        let dir = TempDir::new().unwrap();
        let c = Compressor::gzip();
        let err = c.compress_file(&dir.path().join("Packages")).unwrap_err();
        assert!(matches!(err, RepoError::FileNotFound(_)));
    }
}
