//! Problem metadata for judge-sync
//!
//! Parses a problem's `settings.json`, turns it into the upload parameters
//! the judge expects, and checks statement content before publishing.

pub mod error;
pub mod languages;
pub mod limits;
pub mod loader;
pub mod settings;
pub mod validation;

pub use error::{Error, Result};
pub use languages::expand_languages;
pub use limits::parse_limit_value;
pub use loader::{Problem, SETTINGS_JSON, normalize_relative};
pub use settings::{Limits, LimitValue, Misc, ProblemSettings, ValidatorSettings};
pub use validation::{ContentIssue, validate_problem_content};
