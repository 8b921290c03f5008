//! Error types for judge-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that end a CLI run
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] judge_core::Error),

    #[error(transparent)]
    Client(#[from] judge_client::Error),

    #[error(transparent)]
    Git(#[from] judge_git::Error),

    #[error(transparent)]
    Fs(#[from] judge_fs::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },

    /// The run finished but some items failed
    #[error("{failed} item(s) failed")]
    Incomplete { failed: usize },
}

impl CliError {
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// 1 when the run completed with item failures, 2 when it could not
    /// run at all.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Incomplete { .. } => 1,
            _ => 2,
        }
    }
}
