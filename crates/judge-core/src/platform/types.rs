use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default lifetime of an auto-created assignment
pub const ASSIGNMENT_DURATION_DAYS: i64 = 30;

/// Form fields for problem create/update.
///
/// Optional fields are sent only when set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProblemPayload {
    pub problem_alias: String,
    pub title: String,
    /// Commit message recorded by the judge
    pub message: String,
    pub visibility: Option<String>,
    pub languages: Option<String>,
    pub email_clarifications: Option<String>,
    pub group_score_policy: Option<String>,
    /// Milliseconds
    pub time_limit: Option<u64>,
    /// KiB
    pub memory_limit: Option<u64>,
    /// Bytes
    pub input_limit: Option<u64>,
    /// Bytes
    pub output_limit: Option<u64>,
    /// Milliseconds
    pub extra_wall_time: Option<u64>,
    /// Milliseconds
    pub overall_wall_time_limit: Option<u64>,
    pub validator: Option<String>,
}

impl ProblemPayload {
    /// `(name, value)` pairs in a stable order, skipping unset fields.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("problem_alias", self.problem_alias.clone()),
            ("title", self.title.clone()),
            ("message", self.message.clone()),
        ];
        let text = [
            ("visibility", &self.visibility),
            ("languages", &self.languages),
            ("email_clarifications", &self.email_clarifications),
            ("group_score_policy", &self.group_score_policy),
            ("validator", &self.validator),
        ];
        fields.extend(
            text.into_iter()
                .filter_map(|(name, value)| value.clone().map(|v| (name, v))),
        );
        let numbers = [
            ("time_limit", self.time_limit),
            ("memory_limit", self.memory_limit),
            ("input_limit", self.input_limit),
            ("output_limit", self.output_limit),
            ("extra_wall_time", self.extra_wall_time),
            ("overall_wall_time_limit", self.overall_wall_time_limit),
        ];
        fields.extend(
            numbers
                .into_iter()
                .filter_map(|(name, value)| value.map(|v| (name, v.to_string()))),
        );
        fields
    }
}

/// Published version of a problem, if any
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProblemVersions {
    #[serde(default)]
    pub published: Option<String>,
}

/// Current admins of a problem, usernames and group aliases
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemAdmins {
    pub admins: Vec<String>,
    pub group_admins: Vec<String>,
}

/// Entry of a course's assignment list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssignmentSummary {
    pub alias: String,
    #[serde(default)]
    pub name: String,
}

/// Parameters of an assignment to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssignment {
    pub alias: String,
    pub name: String,
    pub description: String,
    pub assignment_type: String,
    pub start_time: DateTime<Utc>,
    pub finish_time: DateTime<Utc>,
    pub unlimited_duration: bool,
}

impl NewAssignment {
    /// A homework assignment named after its alias, open from `now` for
    /// thirty days.
    pub fn homework(alias: &str, now: DateTime<Utc>) -> Self {
        Self {
            alias: alias.to_string(),
            name: alias.to_string(),
            description: format!("Auto-created assignment {alias}"),
            assignment_type: "homework".to_string(),
            start_time: now,
            finish_time: now + Duration::days(ASSIGNMENT_DURATION_DAYS),
            unlimited_duration: true,
        }
    }
}
