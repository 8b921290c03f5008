use chrono::{DateTime, Utc};
use judge_fs::{NormalizedPath, io::remove_dir_if_exists};

use super::mirror::mirror_problem;
use crate::config::SyncConfig;
use crate::manifest::{ManifestEntry, ManifestStore};
use crate::pending::{PendingItem, PendingRequests};
use crate::platform::{JudgePlatform, NewAssignment, PlatformError};
use crate::report::RunReport;
use crate::{Error, Result};

/// Applies the pending course requests.
///
/// Add requests are processed before remove requests. The manifest is
/// saved after each batch and the pending file is cleared last; a crash
/// before that point makes the next run retry every item, which is safe
/// because duplicate adds and missing removals are not failures.
pub struct CourseSyncWorkflow<'a, P: ?Sized> {
    platform: &'a P,
    config: &'a SyncConfig,
    root: &'a NormalizedPath,
    now: DateTime<Utc>,
}

enum RemoveOutcome {
    Removed,
    Skipped(String),
}

impl<'a, P: JudgePlatform + ?Sized> CourseSyncWorkflow<'a, P> {
    pub fn new(platform: &'a P, config: &'a SyncConfig, root: &'a NormalizedPath) -> Self {
        Self {
            platform,
            config,
            root,
            now: Utc::now(),
        }
    }

    /// Use `now` as the start of auto-created assignments.
    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Process the pending file at the configured location.
    pub fn run(&self) -> Result<RunReport> {
        self.run_from(&self.config.pending_path(self.root))
    }

    /// Process the pending file at `pending_path`.
    ///
    /// # Errors
    ///
    /// Fatal when the pending file is missing or malformed, the manifest is
    /// malformed, or either file cannot be written. Item failures are
    /// reported in the returned [`RunReport`].
    pub fn run_from(&self, pending_path: &NormalizedPath) -> Result<RunReport> {
        let requests = PendingRequests::load(pending_path)?;
        let mut manifest = ManifestStore::load(self.config.manifest_path(self.root))?;
        let mut report = RunReport::new();

        if requests.is_empty() {
            tracing::info!("No pending course requests");
        }

        for item in &requests.add_problem {
            let label = label(item);
            tracing::info!(course = %item.course_alias, assignment = %item.assignment_alias, problem = %item.problem_alias, "Adding problem to assignment");
            match self.add(item, &mut manifest) {
                Ok(()) => report.succeeded(label),
                Err(e) => {
                    tracing::error!(course = %item.course_alias, assignment = %item.assignment_alias, problem = %item.problem_alias, error = %e, "Failed to add problem");
                    report.failed(label, e.to_string());
                }
            }
        }
        manifest.save()?;

        for item in &requests.remove_problem {
            let label = label(item);
            tracing::info!(course = %item.course_alias, assignment = %item.assignment_alias, problem = %item.problem_alias, "Removing problem from assignment");
            match self.remove(item, &mut manifest) {
                Ok(RemoveOutcome::Removed) => report.succeeded(label),
                Ok(RemoveOutcome::Skipped(reason)) => {
                    tracing::warn!(course = %item.course_alias, assignment = %item.assignment_alias, problem = %item.problem_alias, reason = %reason, "Skipping removal");
                    report.skipped(label, reason);
                }
                Err(e) => {
                    tracing::error!(course = %item.course_alias, assignment = %item.assignment_alias, problem = %item.problem_alias, error = %e, "Failed to remove problem");
                    report.failed(label, e.to_string());
                }
            }
        }
        manifest.save()?;

        PendingRequests::clear(pending_path)?;
        Ok(report)
    }

    fn check_course(&self, course: &str) -> Result<()> {
        if self.config.is_course_allowed(course) {
            Ok(())
        } else {
            Err(Error::CourseNotAllowed {
                course: course.to_string(),
            })
        }
    }

    fn assignment_exists(&self, course: &str, assignment: &str) -> Result<bool> {
        let assignments = self.platform.list_assignments(course)?;
        Ok(assignments.iter().any(|a| a.alias == assignment))
    }

    fn add(&self, item: &PendingItem, manifest: &mut ManifestStore) -> Result<()> {
        let course = item.course_alias.as_str();
        let assignment = item.assignment_alias.as_str();
        let problem = item.problem_alias.as_str();
        self.check_course(course)?;

        if !self.assignment_exists(course, assignment)? {
            tracing::warn!(course = %course, assignment = %assignment, "Assignment not found, creating it");
            match self
                .platform
                .create_assignment(course, &NewAssignment::homework(assignment, self.now))
            {
                Ok(()) | Err(PlatformError::AlreadyExists(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }

        match self
            .platform
            .add_problem_to_assignment(course, assignment, problem, item.points, "")
        {
            Ok(()) => {}
            Err(PlatformError::AlreadyExists(_)) => {
                tracing::info!(problem = %problem, assignment = %assignment, "Problem already in assignment");
            }
            Err(e) => return Err(e.into()),
        }

        let path = self.config.mirror_path(course, assignment, problem);
        mirror_problem(self.platform, problem, &self.root.join(&path))?;

        if manifest.add(ManifestEntry::new(&path)) {
            tracing::info!(path = %path, "Manifest updated");
        }
        Ok(())
    }

    fn remove(&self, item: &PendingItem, manifest: &mut ManifestStore) -> Result<RemoveOutcome> {
        let course = item.course_alias.as_str();
        let assignment = item.assignment_alias.as_str();
        let problem = item.problem_alias.as_str();
        self.check_course(course)?;

        if !self.assignment_exists(course, assignment)? {
            return Ok(RemoveOutcome::Skipped(
                Error::AssignmentNotFound {
                    course: course.to_string(),
                    assignment: assignment.to_string(),
                }
                .to_string(),
            ));
        }

        match self
            .platform
            .remove_problem_from_assignment(course, assignment, problem)
        {
            Ok(()) => {}
            Err(PlatformError::NotFound(_)) => {
                tracing::info!(problem = %problem, assignment = %assignment, "Problem already absent from assignment");
            }
            Err(e) => return Err(e.into()),
        }

        let path = self.config.mirror_path(course, assignment, problem);
        let dir = self.root.join(&path);
        if !remove_dir_if_exists(&dir)? {
            tracing::warn!(path = %dir.as_str(), "Mirror directory not found, skipping deletion");
        }

        if manifest.remove(&path) {
            tracing::info!(path = %path, "Manifest entry removed");
        }
        Ok(RemoveOutcome::Removed)
    }
}

fn label(item: &PendingItem) -> String {
    format!(
        "{}/{}/{}",
        item.course_alias, item.assignment_alias, item.problem_alias
    )
}
