//! Error types for judge-git

use std::path::PathBuf;

/// Result type for judge-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in judge-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] judge_fs::Error),

    #[error("Not inside a git working tree: {path}")]
    NotARepository { path: PathBuf },

    #[error("Repository at {path} has no working tree")]
    BareRepository { path: PathBuf },

    #[error("Cannot diff commit range '{range}': {source}")]
    InvalidRange {
        range: String,
        #[source]
        source: git2::Error,
    },
}
