//! # debrepo
//!
//! Index generation and release signing for package repositories laid out
//! in the Debian archive convention. The crate drives three external
//! collaborators as subprocesses: an indexer (`apt-ftparchive`) for package
//! listings and checksum tables, per-codec compressors (`gzip`, `bzip2`,
//! `xz`) for index variants, and a signer (`gpg`) for the detached and
//! clear-signed release artifacts.
//!
//! ## Example
//!
//! ```no_run
//! use debrepo::Repository;
//!
//! # fn main() -> debrepo::Result<()> {
//! let repo = Repository::open("/srv/apt", "bookworm")?;
//! repo.index("main", "amd64")?;
//! repo.generate_release(Some("7BEFA74A"))?;
//! # Ok(())
//! # }
//! ```
//!
//! Indexing different components may run concurrently from separate
//! processes since each targets a distinct output directory; release
//! generation must run after all indexing completes, and never concurrently
//! with another release pass over the same distribution.

pub mod command;
pub mod compress;
pub mod discover;
pub mod error;
pub mod release;
pub mod repository;
pub mod sign;

pub use compress::Compressor;
pub use discover::discover_architectures;
pub use error::{RepoError, Result};
pub use release::{ComponentRelease, ReleaseDescriptor};
pub use repository::{Repository, RepositoryBuilder};

/// Default pool subdirectory name.
pub const DEFAULT_POOL: &str = "pool";
/// Default display version.
pub const DEFAULT_VERSION: &str = "1.0";
/// Default origin label.
pub const DEFAULT_ORIGIN: &str = "Debrepo";
/// Default external indexer program.
pub const DEFAULT_INDEXER: &str = "apt-ftparchive";
/// Default external signer program.
pub const DEFAULT_SIGNER: &str = "gpg";
