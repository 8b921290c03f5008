//! Git change detection for judge-sync
//!
//! Resolves the repository root, picks the comparison range a CI system
//! asks for, and lists the files touched inside that range.

pub mod diff;
pub mod error;
pub mod range;
pub mod root;

pub use diff::{changed_files, head_commit};
pub use error::{Error, Result};
pub use range::{CommitRange, DEFAULT_COMMIT_RANGE, RangeSource};
pub use root::repository_root;
