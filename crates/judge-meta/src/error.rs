//! Error types for judge-meta

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] judge_fs::Error),

    #[error("settings.json not found at {path}")]
    SettingsNotFound { path: PathBuf },

    #[error("Invalid settings.json at {path}: {message}")]
    InvalidSettings { path: PathBuf, message: String },

    #[error("Invalid limit value format: {value}")]
    InvalidLimit { value: String },
}
