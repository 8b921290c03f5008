use std::collections::HashMap;

use judge_fs::NormalizedPath;
use judge_meta::{Problem, expand_languages, parse_limit_value};
use serde_json::Value;

use crate::archive::build_archive;
use crate::pending::DEFAULT_POINTS;
use crate::platform::{JudgePlatform, PlatformError, ProblemPayload};
use crate::reconcile::{DesiredMetadata, MetadataReconciler};
use crate::report::RunReport;
use crate::{Error, Result};

/// Settings for an upload run
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    /// Create problems that do not exist remotely
    pub can_create: bool,
    /// Commit id recorded in the judge's version message
    pub commit: String,
    /// Identity the platform acts as; protected from admin removal
    pub acting_user: Option<String>,
}

/// Version message recorded with each upload.
pub fn commit_message(commit: &str) -> String {
    format!("Deployed automatically from commit {commit}")
}

/// Commit being deployed: `GITHUB_SHA` under GitHub Actions, else HEAD.
pub fn deploy_commit(env: &HashMap<String, String>, root: &NormalizedPath) -> Result<String> {
    if env.get("GITHUB_ACTIONS").is_some_and(|v| !v.is_empty())
        && let Some(sha) = env.get("GITHUB_SHA").filter(|v| !v.is_empty())
    {
        return Ok(sha.clone());
    }
    Ok(judge_git::head_commit(root)?)
}

fn form_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Translate a problem's settings into create/update form fields.
///
/// # Errors
///
/// [`judge_meta::Error::InvalidLimit`] for an unparseable limit.
pub fn build_payload(problem: &Problem, message: &str) -> judge_meta::Result<ProblemPayload> {
    let settings = &problem.settings;
    let misc = settings.misc();

    let mut payload = ProblemPayload {
        problem_alias: problem.alias.clone(),
        title: problem.title.clone(),
        message: message.to_string(),
        visibility: misc.visibility.as_ref().map(form_value),
        languages: misc.languages.as_deref().map(expand_languages),
        email_clarifications: misc.email_clarifications.as_ref().map(form_value),
        group_score_policy: misc.group_score_policy.clone(),
        ..Default::default()
    };

    if let Some(limits) = &settings.limits {
        let parse = |value: &Option<judge_meta::LimitValue>| -> judge_meta::Result<Option<u64>> {
            value.as_ref().map(parse_limit_value).transpose()
        };
        payload.time_limit = parse(&limits.time_limit)?;
        payload.memory_limit = parse(&limits.memory_limit)?.map(|bytes| bytes / 1024);
        payload.input_limit = parse(&limits.input_limit)?;
        payload.output_limit = parse(&limits.output_limit)?;
        payload.extra_wall_time = parse(&limits.extra_wall_time)?;
        payload.overall_wall_time_limit = Some(parse(&limits.overall_wall_time_limit)?.unwrap_or(0));
    }

    if let Some(validator) = &settings.validator
        && !validator.extra.contains_key("validator")
    {
        payload.validator = Some(
            validator
                .name
                .clone()
                .unwrap_or_else(|| "default".to_string()),
        );
    }

    Ok(payload)
}

/// Packages, uploads and reconciles a batch of problems.
pub struct UploadWorkflow<'a, P: ?Sized> {
    platform: &'a P,
    root: &'a NormalizedPath,
    options: UploadOptions,
}

impl<'a, P: JudgePlatform + ?Sized> UploadWorkflow<'a, P> {
    pub fn new(platform: &'a P, root: &'a NormalizedPath, options: UploadOptions) -> Self {
        Self {
            platform,
            root,
            options,
        }
    }

    /// Upload every problem. One problem's failure never stops the rest.
    pub fn run(&self, problems: &[Problem]) -> RunReport {
        let mut report = RunReport::new();
        for problem in problems {
            tracing::info!(problem = %problem.alias, path = %problem.path, "Uploading problem");
            match self.upload(problem) {
                Ok(None) => {
                    tracing::info!(problem = %problem.alias, "Upload complete");
                    report.succeeded(&problem.path);
                }
                Ok(Some(incomplete)) => report.failed(&problem.path, incomplete),
                Err(e) => {
                    tracing::error!(problem = %problem.alias, error = %e, "Upload failed");
                    let file = match &e {
                        Error::Meta(_) => Some(format!("{}/{}", problem.path, judge_meta::SETTINGS_JSON)),
                        _ => None,
                    };
                    match file {
                        Some(file) => report.failed_at(&problem.path, file, e.to_string()),
                        None => report.failed(&problem.path, e.to_string()),
                    }
                }
            }
        }
        report
    }

    /// Upload one problem.
    ///
    /// Returns `Some(message)` when the upload went through but metadata
    /// reconciliation was incomplete.
    fn upload(&self, problem: &Problem) -> Result<Option<String>> {
        let archive = build_archive(problem, &problem.directory(self.root))?;
        tracing::debug!(
            problem = %problem.alias,
            members = archive.members.len(),
            checksum = %archive.checksum(),
            "Built problem archive"
        );

        let payload = build_payload(problem, &commit_message(&self.options.commit))?;

        let exists = self.platform.problem_exists(&problem.alias)?;
        if exists {
            self.platform.update_problem(&payload, &archive.bytes)?;
            self.link_course(problem);
        } else {
            if !self.options.can_create {
                return Err(Error::CreateNotAllowed {
                    alias: problem.alias.clone(),
                });
            }
            tracing::info!(problem = %problem.alias, "Problem doesn't exist, creating it");
            self.platform.create_problem(&payload, &archive.bytes)?;
        }

        let desired = DesiredMetadata::from_misc(&problem.settings.misc());
        let reconciled = MetadataReconciler::new(self.platform, self.options.acting_user.as_deref())
            .reconcile(&problem.alias, &desired);

        if reconciled.is_complete() {
            Ok(None)
        } else {
            Ok(Some(format!(
                "reconciliation incomplete: {} call(s) failed",
                reconciled.failures.len()
            )))
        }
    }

    /// Attach an updated problem to the assignment its path names.
    ///
    /// Failures are logged as warnings; the upload itself already succeeded.
    fn link_course(&self, problem: &Problem) {
        let Some((course, assignment)) = problem.course_link() else {
            tracing::info!(problem = %problem.alias, "No course information, skipping course link");
            return;
        };

        let commit = match self.platform.problem_versions(&problem.alias) {
            Ok(versions) => versions.published.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(problem = %problem.alias, error = %e, "Could not read problem versions");
                String::new()
            }
        };
        if commit.is_empty() {
            tracing::warn!(problem = %problem.alias, "No published version, linking default version");
        }

        match self.platform.add_problem_to_assignment(
            course,
            assignment,
            &problem.alias,
            DEFAULT_POINTS,
            &commit,
        ) {
            Ok(()) | Err(PlatformError::AlreadyExists(_)) => tracing::info!(
                problem = %problem.alias, course = %course, assignment = %assignment,
                "Linked problem to assignment"
            ),
            Err(e) => tracing::warn!(
                problem = %problem.alias, course = %course, assignment = %assignment, error = %e,
                "Could not add problem to assignment"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use judge_meta::ProblemSettings;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn problem(settings: Value) -> Problem {
        let settings: ProblemSettings = serde_json::from_value(settings).unwrap();
        Problem {
            path: "p/sumas".into(),
            title: "Sumas".into(),
            alias: "sumas".into(),
            settings,
        }
    }

    #[test]
    fn payload_converts_limits_and_misc() {
        let problem = problem(json!({
            "title": "Sumas",
            "Limits": { "TimeLimit": "1.5s", "MemoryLimit": 33554432, "OutputLimit": "10240" },
            "Validator": { "Name": "token-numeric" },
            "misc": { "visibility": 2, "languages": "karel", "group_score_policy": "max-per-group" }
        }));

        let payload = build_payload(&problem, "msg").unwrap();

        assert_eq!(payload.time_limit, Some(1500));
        assert_eq!(payload.memory_limit, Some(32768));
        assert_eq!(payload.output_limit, Some(10240));
        assert_eq!(payload.input_limit, None);
        assert_eq!(payload.overall_wall_time_limit, Some(0));
        assert_eq!(payload.validator.as_deref(), Some("token-numeric"));
        assert_eq!(payload.visibility.as_deref(), Some("2"));
        assert_eq!(payload.languages.as_deref(), Some("kj,kp"));
        assert_eq!(payload.group_score_policy.as_deref(), Some("max-per-group"));
    }

    #[test]
    fn payload_without_sections_sends_only_identity() {
        let payload = build_payload(&problem(json!({ "title": "Sumas" })), "msg").unwrap();
        assert_eq!(payload.overall_wall_time_limit, None);
        assert_eq!(payload.validator, None);
        assert_eq!(payload.form_fields().len(), 3);
    }

    #[test]
    fn validator_name_defaults() {
        let payload = build_payload(&problem(json!({ "title": "S", "Validator": {} })), "m").unwrap();
        assert_eq!(payload.validator.as_deref(), Some("default"));
    }

    #[test]
    fn bad_limit_is_rejected() {
        let problem = problem(json!({ "title": "S", "Limits": { "TimeLimit": "soon" } }));
        assert!(matches!(
            build_payload(&problem, "m"),
            Err(judge_meta::Error::InvalidLimit { .. })
        ));
    }

    #[test]
    fn github_sha_wins_under_actions() {
        let env: HashMap<String, String> = [
            ("GITHUB_ACTIONS".to_string(), "true".to_string()),
            ("GITHUB_SHA".to_string(), "abc123".to_string()),
        ]
        .into();
        let root = NormalizedPath::new("/nonexistent");
        assert_eq!(deploy_commit(&env, &root).unwrap(), "abc123");
    }
}
