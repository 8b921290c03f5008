//! Error types for judge-core

use std::path::PathBuf;

use crate::platform::PlatformError;

/// Result type for judge-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in judge-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The manifest is required but absent
    #[error("Manifest not found at {path}")]
    ManifestNotFound { path: PathBuf },

    /// The manifest exists but cannot be parsed
    #[error("Manifest at {path} is malformed: {message}")]
    ManifestMalformed { path: PathBuf, message: String },

    /// The pending-request file does not exist
    #[error("Pending request file not found at {path}")]
    PendingNotFound { path: PathBuf },

    /// The pending-request file exists but cannot be parsed
    #[error("Pending request file at {path} is malformed: {message}")]
    PendingMalformed { path: PathBuf, message: String },

    /// Zero or several validator sources for a problem with a custom validator
    #[error("Problem {problem}: expected exactly one validator file, found {found:?}")]
    Validator { problem: String, found: Vec<String> },

    /// A problem archive could not be written or read
    #[error("Archive error for {problem}: {message}")]
    Archive { problem: String, message: String },

    /// The problem does not exist remotely and creation is not allowed
    #[error("Problem {alias} does not exist remotely and creation is disabled")]
    CreateNotAllowed { alias: String },

    /// Course alias outside the configured allow-list
    #[error("Course '{course}' is not allowed")]
    CourseNotAllowed { course: String },

    /// Remote assignment missing for a removal
    #[error("Assignment '{assignment}' not found in course '{course}'")]
    AssignmentNotFound { course: String, assignment: String },

    #[error(transparent)]
    Platform(#[from] PlatformError),

    // Transparent wrappers for underlying crate errors
    #[error(transparent)]
    Fs(#[from] judge_fs::Error),

    #[error(transparent)]
    Git(#[from] judge_git::Error),

    #[error(transparent)]
    Meta(#[from] judge_meta::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error must stop the whole run rather than a single item.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ManifestNotFound { .. }
                | Self::ManifestMalformed { .. }
                | Self::PendingNotFound { .. }
                | Self::PendingMalformed { .. }
                | Self::Git(_)
        )
    }
}
