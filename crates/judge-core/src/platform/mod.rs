//! Remote judge capability surface
//!
//! Workflows talk to the judge only through [`JudgePlatform`]. The HTTP
//! client lives in `judge-client`; [`crate::fakes::FakePlatform`] is the
//! in-memory stand-in used by tests.

mod types;

pub use types::{
    AssignmentSummary, NewAssignment, ProblemAdmins, ProblemPayload, ProblemVersions,
};

/// Result type for platform calls
pub type PlatformResult<T> = std::result::Result<T, PlatformError>;

/// Failure of a single remote call
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlatformError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("API error ({status}): {message}")]
    Api { status: String, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// Operations the sync workflows need from the judge.
///
/// All calls are blocking. Implementations report "does not exist" as
/// [`PlatformError::NotFound`] and duplicates as
/// [`PlatformError::AlreadyExists`] so callers can treat them as
/// idempotent outcomes.
pub trait JudgePlatform {
    fn problem_exists(&self, alias: &str) -> PlatformResult<bool>;

    fn create_problem(&self, payload: &ProblemPayload, archive: &[u8]) -> PlatformResult<()>;

    fn update_problem(&self, payload: &ProblemPayload, archive: &[u8]) -> PlatformResult<()>;

    fn problem_versions(&self, alias: &str) -> PlatformResult<ProblemVersions>;

    fn problem_admins(&self, alias: &str) -> PlatformResult<ProblemAdmins>;

    fn add_admin(&self, alias: &str, user: &str) -> PlatformResult<()>;

    fn remove_admin(&self, alias: &str, user: &str) -> PlatformResult<()>;

    fn add_group_admin(&self, alias: &str, group: &str) -> PlatformResult<()>;

    fn remove_group_admin(&self, alias: &str, group: &str) -> PlatformResult<()>;

    fn problem_tags(&self, alias: &str) -> PlatformResult<Vec<String>>;

    fn add_tag(&self, alias: &str, name: &str, public: bool) -> PlatformResult<()>;

    fn remove_tag(&self, alias: &str, name: &str) -> PlatformResult<()>;

    /// Raw archive of the problem's current version.
    fn download_problem(&self, alias: &str) -> PlatformResult<Vec<u8>>;

    /// Course details as returned by the judge.
    fn course_details(&self, course: &str) -> PlatformResult<serde_json::Map<String, serde_json::Value>>;

    fn list_assignments(&self, course: &str) -> PlatformResult<Vec<AssignmentSummary>>;

    fn create_assignment(&self, course: &str, assignment: &NewAssignment) -> PlatformResult<()>;

    /// Problem aliases of an assignment, in the judge's order.
    fn assignment_problems(&self, course: &str, assignment: &str) -> PlatformResult<Vec<String>>;

    /// `commit` is the problem version to pin; empty means the judge's default.
    fn add_problem_to_assignment(
        &self,
        course: &str,
        assignment: &str,
        problem: &str,
        points: f64,
        commit: &str,
    ) -> PlatformResult<()>;

    fn remove_problem_from_assignment(
        &self,
        course: &str,
        assignment: &str,
        problem: &str,
    ) -> PlatformResult<()>;
}
