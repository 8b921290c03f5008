//! ChangeSetSelector: which problems a run processes
//!
//! Explicit paths always win. Otherwise the enabled manifest entries are
//! taken, either all of them or only those touched by the version-control
//! diff against the resolved commit range.

use judge_fs::NormalizedPath;
use judge_git::CommitRange;
use judge_meta::{Problem, normalize_relative};

use crate::Result;
use crate::manifest::ManifestStore;

/// Which manifest entries are in scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectMode {
    All,
    #[default]
    Changed,
}

/// Source of the changed-file list for [`SelectMode::Changed`].
pub trait ChangeSource {
    /// Repository-relative paths changed since the comparison baseline.
    fn changed_files(&self, root: &NormalizedPath) -> Result<Vec<String>>;
}

/// Changed files from a git diff over a [`CommitRange`]
#[derive(Debug, Clone)]
pub struct GitChangeSource {
    range: CommitRange,
}

impl GitChangeSource {
    pub fn new(range: CommitRange) -> Self {
        Self { range }
    }

    /// Resolve the range from the CI environment of this process.
    pub fn from_process_env() -> Self {
        Self::new(CommitRange::from_process_env())
    }

    pub fn range(&self) -> &CommitRange {
        &self.range
    }
}

impl ChangeSource for GitChangeSource {
    fn changed_files(&self, root: &NormalizedPath) -> Result<Vec<String>> {
        tracing::info!(range = %self.range, "Loading git diff");
        Ok(judge_git::changed_files(root, &self.range)?)
    }
}

/// A problem path that could not be loaded
#[derive(Debug)]
pub struct SelectionFailure {
    pub path: String,
    pub error: judge_meta::Error,
}

/// Result of a selection: loaded problems plus per-item load failures
#[derive(Debug, Default)]
pub struct Selection {
    pub problems: Vec<Problem>,
    pub failures: Vec<SelectionFailure>,
}

/// Whether `file` lies at or under the problem directory `path`.
///
/// Stricter than a string prefix: the match must end on a path boundary,
/// so `a/p` does not claim `a/p2/x`.
pub fn touches(path: &str, file: &str) -> bool {
    file == path
        || file
            .strip_prefix(path)
            .is_some_and(|rest| rest.starts_with('/'))
}

pub struct ChangeSetSelector<C> {
    changes: C,
}

impl<C: ChangeSource> ChangeSetSelector<C> {
    pub fn new(changes: C) -> Self {
        Self { changes }
    }

    /// Repository-relative problem paths in scope, without loading them.
    ///
    /// # Errors
    ///
    /// A failing diff is fatal: no partial list is returned.
    pub fn select_paths(
        &self,
        mode: SelectMode,
        explicit: &[String],
        root: &NormalizedPath,
        manifest: &ManifestStore,
    ) -> Result<Vec<String>> {
        if !explicit.is_empty() {
            return Ok(explicit.iter().map(|p| normalize_relative(p)).collect());
        }

        let mut declared = Vec::new();
        for entry in manifest.entries() {
            if entry.disabled {
                tracing::warn!(problem = %entry.label(), "Problem disabled, skipping");
                continue;
            }
            declared.push(normalize_relative(&entry.path));
        }

        if mode == SelectMode::All {
            tracing::info!(count = declared.len(), "Selecting every declared problem");
            return Ok(declared);
        }

        let changed = self.changes.changed_files(root)?;
        tracing::debug!(count = changed.len(), "Changed files");

        Ok(declared
            .into_iter()
            .filter(|path| {
                let hit = changed.iter().any(|file| touches(path, file));
                if !hit {
                    tracing::info!(problem = %path, "No changes, skipping");
                }
                hit
            })
            .collect())
    }

    /// Select and load the problems in scope.
    ///
    /// Problems whose settings cannot be loaded are reported in
    /// [`Selection::failures`] and do not stop the others.
    pub fn select(
        &self,
        mode: SelectMode,
        explicit: &[String],
        root: &NormalizedPath,
        manifest: &ManifestStore,
    ) -> Result<Selection> {
        let mut selection = Selection::default();
        for path in self.select_paths(mode, explicit, root, manifest)? {
            match Problem::load(&path, root) {
                Ok(problem) => selection.problems.push(problem),
                Err(error) => {
                    tracing::error!(problem = %path, error = %error, "Could not load problem");
                    selection.failures.push(SelectionFailure { path, error });
                }
            }
        }
        Ok(selection)
    }
}
