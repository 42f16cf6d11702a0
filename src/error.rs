//! Error types for repository indexing and release generation.

use std::path::PathBuf;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepoError>;

/// Errors that can occur while indexing a repository or generating a release.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// The repository root does not exist.
    #[error("repository does not exist: {0}")]
    RepositoryNotFound(PathBuf),

    /// The requested component has no directory in the pool.
    #[error("component does not exist: {0}")]
    ComponentNotFound(PathBuf),

    /// An external tool exited non-zero.
    #[error("{program} failed with exit code {code}: {stderr}")]
    ExternalTool {
        /// Program that was invoked.
        program: String,
        /// Exit code, or -1 if terminated by signal.
        code: i32,
        /// Captured standard error output.
        stderr: String,
    },

    /// A file an operation depends on is missing.
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    /// Invalid repository configuration.
    #[error("invalid repository configuration: {0}")]
    InvalidConfiguration(String),

    /// I/O error occurred during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RepoError {
    /// Create a new invalid configuration error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}
