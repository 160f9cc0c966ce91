use thiserror::Error;

/// Unified error type for git-versioning operations
#[derive(Error, Debug)]
pub enum VersioningError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Invalid repository state: {0}")]
    State(String),

    #[error("No current revision: the repository has no commits yet")]
    NoCurrentRevision,

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-versioning
pub type Result<T> = std::result::Result<T, VersioningError>;

impl VersioningError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        VersioningError::Config(msg.into())
    }

    /// Create a version parsing error with context
    pub fn version(msg: impl Into<String>) -> Self {
        VersioningError::Version(msg.into())
    }

    /// Create a repository state error with context
    pub fn state(msg: impl Into<String>) -> Self {
        VersioningError::State(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        VersioningError::Remote(msg.into())
    }
}
