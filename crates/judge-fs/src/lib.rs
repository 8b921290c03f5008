//! Filesystem primitives for judge-sync
//!
//! Provides normalized paths, atomic writes, format-aware config loading
//! and the naming rules used for mirror directories.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod naming;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use naming::sanitize_alias;
pub use path::NormalizedPath;
