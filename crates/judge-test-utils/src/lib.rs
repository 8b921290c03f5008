//! Shared test utilities for the judge-sync workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`] — git repository fixtures
//! - [`repo`] — [`repo::TestRepo`] builder for problem repositories

pub mod git;
pub mod repo;
