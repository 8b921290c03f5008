//! Error types for judge-client

use judge_core::PlatformError;

/// Result type for judge-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur talking to the judge
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The judge answered `"status": "error"` or a non-success HTTP code
    #[error("{endpoint} failed ({name}): {message}")]
    Api {
        endpoint: String,
        /// `errorname` from the response, or the HTTP status
        name: String,
        message: String,
        http_status: u16,
    },

    #[error("Unexpected response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("No credentials: set --api-token or both --username and --password")]
    MissingCredentials,

    #[error("Login failed for {username}: {message}")]
    Login { username: String, message: String },
}

impl Error {
    /// The judge reported that the target does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api {
                name, http_status, ..
            } => *http_status == 404 || name.ends_with("NotFound") || name.ends_with("NotExist"),
            _ => false,
        }
    }

    /// The judge reported that the target is already there.
    pub fn is_duplicate(&self) -> bool {
        match self {
            Self::Api { name, .. } => {
                let name = name.to_ascii_lowercase();
                name.contains("exists") || name.contains("already") || name.starts_with("duplicated")
            }
            _ => false,
        }
    }
}

impl From<Error> for PlatformError {
    fn from(error: Error) -> Self {
        if error.is_not_found() {
            return PlatformError::NotFound(error.to_string());
        }
        if error.is_duplicate() {
            return PlatformError::AlreadyExists(error.to_string());
        }
        match error {
            Error::Http(e) => PlatformError::Transport(e.to_string()),
            Error::Api { name, message, .. } => PlatformError::Api {
                status: name,
                message,
            },
            Error::Decode { endpoint, message } => {
                PlatformError::Decode(format!("{endpoint}: {message}"))
            }
            e @ (Error::MissingCredentials | Error::Login { .. }) => {
                PlatformError::Transport(e.to_string())
            }
        }
    }
}
