//! [`TestRepo`] builder for problem-repository test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

/// A temporary problems repository with helpers for setup and assertion.
///
/// # Example
///
/// ```rust,no_run
/// use judge_test_utils::repo::TestRepo;
///
/// let repo = TestRepo::new();
/// repo.init_git();
/// repo.add_problem("Courses/c/a/sumas", "sumas");
/// repo.write_manifest(&["Courses/c/a/sumas"]);
/// repo.assert_file_exists("Courses/c/a/sumas/settings.json");
/// ```
pub struct TestRepo {
    temp_dir: TempDir,
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRepo {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `rel` inside the repository.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Initialise a git repository with one commit on `main`.
    ///
    /// Returns the initial commit id.
    pub fn init_git(&self) -> String {
        crate::git::real_git_repo_with_commit(self.root())
    }

    /// Commit every pending change, returning the new commit id.
    pub fn commit(&self, message: &str) -> String {
        crate::git::commit_all(self.root(), message)
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn write_file(&self, rel: &str, content: impl AsRef<[u8]>) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    /// Write `value` as pretty JSON to `rel`.
    pub fn write_json(&self, rel: &str, value: &Value) {
        self.write_file(rel, serde_json::to_string_pretty(value).unwrap());
    }

    /// Read and parse the JSON document at `rel`.
    pub fn read_json(&self, rel: &str) -> Value {
        let path = self.path(rel);
        let content = fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()));
        serde_json::from_str(&content).unwrap()
    }

    /// Create a minimal, uploadable problem directory at `rel`.
    ///
    /// Contains `settings.json`, a Spanish statement, one solution and one
    /// test case.
    pub fn add_problem(&self, rel: &str, alias: &str) {
        self.add_problem_with_settings(
            rel,
            json!({
                "title": alias,
                "alias": alias,
                "Validator": { "Name": "token-caseless" },
                "misc": {}
            }),
        );
    }

    /// Create a problem directory at `rel` with custom settings.
    pub fn add_problem_with_settings(&self, rel: &str, settings: Value) {
        self.write_json(&format!("{rel}/settings.json"), &settings);
        self.write_file(&format!("{rel}/statements/es.markdown"), "# Problema\n");
        self.write_file(&format!("{rel}/solutions/es.markdown"), "Solución\n");
        self.write_file(&format!("{rel}/cases/1.in"), "1 2\n");
        self.write_file(&format!("{rel}/cases/1.out"), "3\n");
    }

    /// Write `problems.json` listing `paths`.
    pub fn write_manifest(&self, paths: &[&str]) {
        let problems: Vec<Value> = paths.iter().map(|p| json!({ "path": p })).collect();
        self.write_json("problems.json", &json!({ "problems": problems }));
    }

    /// Paths currently listed in `problems.json`.
    pub fn manifest_paths(&self) -> Vec<String> {
        self.read_json("problems.json")["problems"]
            .as_array()
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|e| e["path"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Write a pending-request file at `rel`.
    pub fn write_pending(&self, rel: &str, add: Value, remove: Value) {
        self.write_json(rel, &json!({ "add_problem": add, "remove_problem": remove }));
    }

    /// Assert that `path` (relative to the repo root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the repo root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }
}
