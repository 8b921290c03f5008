//! Repository-level configuration (`judge-sync.toml`)
//!
//! Every key is optional; missing keys fall back to the built-in defaults.
//!
//! ```toml
//! [remote]
//! url = "https://omegaup.com"
//!
//! [manifest]
//! file = "problems.json"
//!
//! [courses]
//! allowed = ["curso-publico", "omi-public-course"]
//! mirror_dir = "Courses"
//! pending_file = "adding_removing_problems.json"
//! ```

use judge_fs::{ConfigStore, NormalizedPath, sanitize_alias};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Name of the configuration file at the repository root
pub const CONFIG_FILE: &str = "judge-sync.toml";

pub const DEFAULT_URL: &str = "https://omegaup.com";
pub const DEFAULT_MANIFEST_FILE: &str = "problems.json";
pub const DEFAULT_MIRROR_DIR: &str = "Courses";
pub const DEFAULT_PENDING_FILE: &str = "adding_removing_problems.json";
pub const DEFAULT_COURSES: [&str; 2] = ["curso-publico", "omi-public-course"];

/// Effective configuration for one repository
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub remote: RemoteConfig,
    pub manifest: ManifestConfig,
    pub courses: CoursesConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of the judge
    pub url: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Manifest path relative to the repository root
    pub file: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            file: DEFAULT_MANIFEST_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoursesConfig {
    /// Course aliases the course workflows may touch
    pub allowed: Vec<String>,
    /// Mirror root relative to the repository root; empty means the root itself
    pub mirror_dir: String,
    /// Pending-request file relative to the repository root
    pub pending_file: String,
}

impl Default for CoursesConfig {
    fn default() -> Self {
        Self {
            allowed: DEFAULT_COURSES.iter().map(|c| c.to_string()).collect(),
            mirror_dir: DEFAULT_MIRROR_DIR.to_string(),
            pending_file: DEFAULT_PENDING_FILE.to_string(),
        }
    }
}

impl SyncConfig {
    /// Load `judge-sync.toml` from `root`, or the defaults when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is not valid TOML for this
    /// schema.
    pub fn load(root: &NormalizedPath) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        let config = ConfigStore::new().load_optional(&path)?;
        if config.is_some() {
            tracing::debug!(path = %path.as_str(), "Loaded configuration");
        }
        Ok(config.unwrap_or_default())
    }

    pub fn manifest_path(&self, root: &NormalizedPath) -> NormalizedPath {
        root.join(&self.manifest.file)
    }

    pub fn pending_path(&self, root: &NormalizedPath) -> NormalizedPath {
        root.join(&self.courses.pending_file)
    }

    /// Directory that holds `<course>/<assignment>/<problem>` mirrors.
    pub fn mirror_root(&self, root: &NormalizedPath) -> NormalizedPath {
        root.join(&self.courses.mirror_dir)
    }

    pub fn is_course_allowed(&self, course: &str) -> bool {
        self.courses.allowed.iter().any(|c| c == course)
    }

    /// Repository-relative path of a mirrored problem.
    ///
    /// Each segment is sanitized the same way the mirror directory is, so
    /// the manifest entry always names the directory on disk.
    pub fn mirror_path(&self, course: &str, assignment: &str, problem: &str) -> String {
        let mirror_dir = self.courses.mirror_dir.trim_matches('/');
        let segments = [
            sanitize_alias(course),
            sanitize_alias(assignment),
            sanitize_alias(problem),
        ];
        if mirror_dir.is_empty() {
            segments.join("/")
        } else {
            format!("{mirror_dir}/{}", segments.join("/"))
        }
    }
}
