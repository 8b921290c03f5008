//! omegaUp API client for judge-sync
//!
//! [`OmegaUpClient`] implements [`judge_core::JudgePlatform`] over the
//! judge's form-encoded HTTP API. Every call is blocking.
//!
//! ```rust,no_run
//! use judge_client::{Credentials, OmegaUpClient};
//! use judge_core::JudgePlatform;
//!
//! let client = OmegaUpClient::connect(
//!     "https://omegaup.com",
//!     Credentials::Token("secret".into()),
//! )?;
//! let exists = client.problem_exists("sumas")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod auth;
pub mod client;
pub mod error;
mod platform;
mod response;

pub use auth::Credentials;
pub use client::OmegaUpClient;
pub use error::{Error, Result};
