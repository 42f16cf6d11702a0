//! Repository configuration and the indexing / release generation pipeline.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::command::{remove_existing, run_tool};
use crate::compress::Compressor;
use crate::discover::discover_architectures;
use crate::error::{RepoError, Result};
use crate::release::{ComponentRelease, ReleaseDescriptor};
use crate::sign::{sign_release, INRELEASE, INRELEASE_TMP, RELEASE, RELEASE_GPG};
use crate::{DEFAULT_INDEXER, DEFAULT_ORIGIN, DEFAULT_POOL, DEFAULT_SIGNER, DEFAULT_VERSION};

/// Package listing file name.
const PACKAGES: &str = "Packages";

/// An on-disk Debian-style package repository.
///
/// All fields are fixed for the lifetime of one indexing/release run; the
/// only mutable state is the filesystem tree the operations write to.
#[derive(Debug, Clone)]
pub struct Repository {
    /// Repository root. Exists by construction.
    pub path: PathBuf,
    /// Distribution name the operations act on.
    pub release: String,
    /// Pool subdirectory holding uploaded packages, grouped by component.
    pub pool: String,
    /// Display version for generated descriptors.
    pub version: String,
    /// Origin (and label) for generated descriptors.
    pub origin: String,
    /// Whether `binary-all` counts toward the discovered architecture set.
    pub include_arch_all: bool,
    /// Suppress the unsigned-release warning.
    pub quiet: bool,
    /// External indexer program.
    pub indexer: PathBuf,
    /// External signer program.
    pub signer: PathBuf,
    /// Compressors applied to each package listing.
    pub compressors: Vec<Compressor>,
}

impl Repository {
    /// Open a repository with default settings.
    pub fn open<P: Into<PathBuf>, S: Into<String>>(path: P, release: S) -> Result<Self> {
        RepositoryBuilder::new(path, release).build()
    }

    /// Index one (component, architecture) pair.
    ///
    /// Invokes the external indexer over the component's pool subdirectory,
    /// writes the package listing under
    /// `dists/<release>/<component>/binary-<arch>/`, derives the compressed
    /// variants and writes the per-directory descriptor fragment.
    /// Re-invocation overwrites prior artifacts for the same pair.
    pub fn index(&self, component: &str, arch: &str) -> Result<()> {
        let component_rel = Path::new(&self.pool).join(component);
        let component_dir = self.path.join(&component_rel);
        if !component_dir.exists() {
            return Err(RepoError::ComponentNotFound(component_dir));
        }

        let output_dir = self
            .dist_dir()
            .join(component)
            .join(format!("binary-{}", arch));
        fs::create_dir_all(&output_dir)?;

        let mut args: Vec<OsString> = Vec::new();
        if !arch.is_empty() {
            args.push(format!("--arch={}", arch).into());
        }
        args.push("packages".into());
        args.push(component_rel.into_os_string());

        // The indexer runs from the repository root so that emitted file
        // references are repository-relative.
        let listing = run_tool(&self.indexer, args, &self.path)?;

        let packages = output_dir.join(PACKAGES);
        if listing.is_empty() {
            // An empty component yields an empty artifact, not a blank line.
            fs::write(&packages, "")?;
        } else {
            let mut contents = listing;
            contents.push('\n');
            fs::write(&packages, contents)?;
        }

        for compressor in &self.compressors {
            compressor.compress_file(&packages)?;
        }

        let fragment = ComponentRelease {
            archive: self.release.clone(),
            origin: self.origin.clone(),
            version: self.version.clone(),
            component: component.to_string(),
            architecture: arch.to_string(),
        };
        fs::write(output_dir.join(RELEASE), fragment.to_string())?;

        info!(
            "indexed component {} for {} into {}",
            component,
            arch,
            output_dir.display()
        );
        Ok(())
    }

    /// Assemble the top-level release descriptor and optionally sign it.
    ///
    /// Assembly always starts from a clean slate: pre-existing descriptor
    /// and signature files are deleted first, so a half-written descriptor
    /// from a previous failed run is never mistaken for a valid one. The
    /// checksum table is obtained before the descriptor file is created; an
    /// indexer failure therefore leaves no partial descriptor behind.
    pub fn generate_release(&self, gpgkey: Option<&str>) -> Result<()> {
        let dist_rel = Path::new("dists").join(&self.release);
        let dist_dir = self.dist_dir();

        // A stale descriptor or signature that cannot be deleted must abort
        // the run rather than silently surviving next to a new descriptor.
        for name in [RELEASE, RELEASE_GPG, INRELEASE, INRELEASE_TMP] {
            remove_existing(&dist_dir.join(name))?;
        }

        let checksums = run_tool(
            &self.indexer,
            [OsString::from("release"), dist_rel.into_os_string()],
            &self.path,
        )?;

        let descriptor = ReleaseDescriptor {
            origin: self.origin.clone(),
            suite: self.release.clone(),
            version: self.version.clone(),
            date: chrono::Utc::now(),
            architectures: discover_architectures(&dist_dir, self.include_arch_all)?,
            components: self.pool_components()?,
            checksums,
        };
        fs::write(dist_dir.join(RELEASE), descriptor.to_string())?;

        info!("wrote release descriptor for {}", self.release);

        sign_release(&self.signer, gpgkey, &dist_dir, self.quiet)
    }

    /// Component names, defined by presence in the upload pool.
    fn pool_components(&self) -> Result<BTreeSet<String>> {
        let mut components = BTreeSet::new();
        for entry in fs::read_dir(self.path.join(&self.pool))? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                components.insert(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(components)
    }

    fn dist_dir(&self) -> PathBuf {
        self.path.join("dists").join(&self.release)
    }
}

/// Builder for [`Repository`] instances.
#[derive(Debug, Clone)]
pub struct RepositoryBuilder {
    repository: Repository,
}

impl RepositoryBuilder {
    /// Create a builder for the repository at `path` acting on `release`.
    pub fn new<P: Into<PathBuf>, S: Into<String>>(path: P, release: S) -> Self {
        Self {
            repository: Repository {
                path: path.into(),
                release: release.into(),
                pool: DEFAULT_POOL.to_string(),
                version: DEFAULT_VERSION.to_string(),
                origin: DEFAULT_ORIGIN.to_string(),
                include_arch_all: false,
                quiet: false,
                indexer: PathBuf::from(DEFAULT_INDEXER),
                signer: PathBuf::from(DEFAULT_SIGNER),
                compressors: Compressor::defaults(),
            },
        }
    }

    /// Set the pool subdirectory name.
    pub fn pool<S: Into<String>>(mut self, pool: S) -> Self {
        self.repository.pool = pool.into();
        self
    }

    /// Set the display version.
    pub fn version<S: Into<String>>(mut self, version: S) -> Self {
        self.repository.version = version.into();
        self
    }

    /// Set the origin label.
    pub fn origin<S: Into<String>>(mut self, origin: S) -> Self {
        self.repository.origin = origin.into();
        self
    }

    /// Count `binary-all` toward the discovered architecture set.
    pub fn include_arch_all(mut self, include: bool) -> Self {
        self.repository.include_arch_all = include;
        self
    }

    /// Suppress the unsigned-release warning.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.repository.quiet = quiet;
        self
    }

    /// Set the external indexer program.
    pub fn indexer<P: Into<PathBuf>>(mut self, indexer: P) -> Self {
        self.repository.indexer = indexer.into();
        self
    }

    /// Set the external signer program.
    pub fn signer<P: Into<PathBuf>>(mut self, signer: P) -> Self {
        self.repository.signer = signer.into();
        self
    }

    /// Set the compressor table.
    pub fn compressors(mut self, compressors: Vec<Compressor>) -> Self {
        self.repository.compressors = compressors;
        self
    }

    /// Build the repository, validating its configuration.
    pub fn build(self) -> Result<Repository> {
        if !self.repository.path.exists() {
            return Err(RepoError::RepositoryNotFound(self.repository.path));
        }
        if self.repository.release.is_empty() {
            return Err(RepoError::invalid_config("release name cannot be empty"));
        }
        if self.repository.pool.is_empty() {
            return Err(RepoError::invalid_config(
                "pool directory name cannot be empty",
            ));
        }
        Ok(self.repository)
    }
}
