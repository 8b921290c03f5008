//! Pending course requests (`adding_removing_problems.json`)
//!
//! ```json
//! {
//!   "add_problem": [
//!     { "course_alias": "curso-publico", "assignment_alias": "semana-1",
//!       "problem_alias": "sumas", "points": 100 }
//!   ],
//!   "remove_problem": []
//! }
//! ```

use judge_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Points assigned when a request omits them
pub const DEFAULT_POINTS: f64 = 100.0;

fn default_points() -> f64 {
    DEFAULT_POINTS
}

/// One (course, assignment, problem) request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingItem {
    pub course_alias: String,
    pub assignment_alias: String,
    pub problem_alias: String,
    #[serde(default = "default_points")]
    pub points: f64,
}

/// Both request queues
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PendingRequests {
    #[serde(default)]
    pub add_problem: Vec<PendingItem>,
    #[serde(default)]
    pub remove_problem: Vec<PendingItem>,
}

impl PendingRequests {
    /// Read the request file at `path`.
    ///
    /// # Errors
    ///
    /// - [`Error::PendingNotFound`] if the file does not exist
    /// - [`Error::PendingMalformed`] if it cannot be parsed
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        match ConfigStore::new().load(path) {
            Ok(requests) => Ok(requests),
            Err(e) if e.is_not_found() => Err(Error::PendingNotFound {
                path: path.to_native(),
            }),
            Err(judge_fs::Error::ConfigParse { message, .. }) => Err(Error::PendingMalformed {
                path: path.to_native(),
                message,
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrite the request file with two empty queues.
    pub fn clear(path: &NormalizedPath) -> Result<()> {
        ConfigStore::new().save(path, &Self::default())?;
        tracing::info!(path = %path.as_str(), "Cleared pending course requests");
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.add_problem.is_empty() && self.remove_problem.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn points_default_to_one_hundred() {
        let requests: PendingRequests = serde_json::from_value(json!({
            "add_problem": [
                { "course_alias": "c", "assignment_alias": "a", "problem_alias": "p" }
            ]
        }))
        .unwrap();
        assert_eq!(requests.add_problem[0].points, DEFAULT_POINTS);
        assert!(requests.remove_problem.is_empty());
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = NormalizedPath::new(dir.path()).join("pending.json");
        assert!(matches!(
            PendingRequests::load(&path),
            Err(Error::PendingNotFound { .. })
        ));
    }

    #[test]
    fn clear_leaves_two_empty_arrays() {
        let dir = tempfile::tempdir().unwrap();
        let path = NormalizedPath::new(dir.path()).join("pending.json");
        PendingRequests::clear(&path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path.to_native()).unwrap()).unwrap();
        assert_eq!(raw, json!({ "add_problem": [], "remove_problem": [] }));
    }
}
