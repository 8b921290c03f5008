//! How the client authenticates

use std::fmt;

use crate::{Error, Result};

/// Credentials for the judge.
///
/// An API token is sent as `Authorization: token <value>` on every call.
/// A username and password are exchanged once for a session token.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Token(String),
    Password { username: String, password: String },
}

impl Credentials {
    /// Pick credentials from the available values; the token wins.
    ///
    /// Empty strings count as absent.
    ///
    /// # Errors
    ///
    /// [`Error::MissingCredentials`] when neither a token nor a complete
    /// username/password pair is given.
    pub fn resolve(
        api_token: Option<&str>,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self> {
        fn present(value: Option<&str>) -> Option<&str> {
            value.map(str::trim).filter(|v| !v.is_empty())
        }

        if let Some(token) = present(api_token) {
            return Ok(Self::Token(token.to_string()));
        }
        match (present(username), password.filter(|p| !p.is_empty())) {
            (Some(username), Some(password)) => Ok(Self::Password {
                username: username.to_string(),
                password: password.to_string(),
            }),
            _ => Err(Error::MissingCredentials),
        }
    }

    /// Username, when logging in with a password.
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Token(_) => None,
            Self::Password { username, .. } => Some(username),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(_) => f.write_str("Credentials::Token(***)"),
            Self::Password { username, .. } => f
                .debug_struct("Credentials::Password")
                .field("username", username)
                .finish_non_exhaustive(),
        }
    }
}
