//! ProblemLoader: reads a problem directory's `settings.json`
//!
//! A problem is identified by its repository-relative path, e.g.
//!
//! ```text
//! Courses/
//!   curso-publico/
//!     semana-1/
//!       sumas/
//!         settings.json
//!         statements/es.markdown
//!         cases/1.in
//! ```

use crate::settings::ProblemSettings;
use crate::{Error, Result};
use judge_fs::{ConfigStore, NormalizedPath};

/// File name of the per-problem settings document.
pub const SETTINGS_JSON: &str = "settings.json";

/// A loaded problem. Read-only for the rest of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    /// Repository-relative path, forward slashes, no trailing slash
    pub path: String,
    pub title: String,
    /// Remote alias: `settings.alias`, else the directory name
    pub alias: String,
    pub settings: ProblemSettings,
}

impl Problem {
    /// Load the problem at `path` (relative to `root`).
    ///
    /// # Errors
    ///
    /// - [`Error::SettingsNotFound`] if `settings.json` is absent
    /// - [`Error::InvalidSettings`] if it is not valid JSON for the schema,
    ///   lacks a title, or no alias can be resolved
    pub fn load(path: &str, root: &NormalizedPath) -> Result<Self> {
        let path = normalize_relative(path);
        let settings_path = root.join(&path).join(SETTINGS_JSON);

        let settings: ProblemSettings = match ConfigStore::new().load(&settings_path) {
            Ok(settings) => settings,
            Err(e) if e.is_not_found() => {
                return Err(Error::SettingsNotFound {
                    path: settings_path.to_native(),
                });
            }
            Err(judge_fs::Error::ConfigParse { message, .. }) => {
                return Err(Error::InvalidSettings {
                    path: settings_path.to_native(),
                    message,
                });
            }
            Err(e) => return Err(e.into()),
        };

        let invalid = |message: &str| Error::InvalidSettings {
            path: settings_path.to_native(),
            message: message.to_string(),
        };

        let title = settings
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| invalid("missing required field `title`"))?
            .to_string();

        let alias = settings
            .alias
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .or_else(|| path.rsplit('/').next().filter(|s| !s.is_empty()))
            .ok_or_else(|| invalid("cannot resolve problem alias"))?
            .to_string();

        tracing::debug!(problem = %alias, path = %path, "Loaded problem settings");

        Ok(Self {
            path,
            title,
            alias,
            settings,
        })
    }

    /// Absolute directory of this problem under `root`.
    pub fn directory(&self, root: &NormalizedPath) -> NormalizedPath {
        root.join(&self.path)
    }

    /// `(course, assignment)` inferred from the two directories above the
    /// problem directory, if the path is deep enough.
    pub fn course_link(&self) -> Option<(&str, &str)> {
        let segments: Vec<&str> = self.path.split('/').collect();
        match segments.as_slice() {
            [.., course, assignment, _problem] => Some((course, assignment)),
            _ => None,
        }
    }
}

/// Forward slashes, no `.` segments, no leading or trailing slash.
pub fn normalize_relative(path: &str) -> String {
    NormalizedPath::new(path)
        .segments()
        .collect::<Vec<_>>()
        .join("/")
}
