//! In-memory [`JudgePlatform`] for tests
//!
//! Holds remote problems and courses, records every mutating call and can
//! be told to fail specific operations.
//!
//! ```rust
//! use judge_core::fakes::{Call, FakePlatform};
//! use judge_core::platform::{JudgePlatform, PlatformError};
//!
//! let platform = FakePlatform::new();
//! platform.add_problem("sumas");
//! platform.fail_on("add_tag", "math", PlatformError::Transport("boom".into()));
//!
//! assert!(platform.add_tag("sumas", "math", false).is_err());
//! assert!(platform.calls().is_empty());
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value, json};

use crate::platform::{
    AssignmentSummary, JudgePlatform, NewAssignment, PlatformError, PlatformResult,
    ProblemAdmins, ProblemPayload, ProblemVersions,
};

/// A mutating call that reached the fake
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateProblem { alias: String },
    UpdateProblem { alias: String },
    AddAdmin { alias: String, user: String },
    RemoveAdmin { alias: String, user: String },
    AddGroupAdmin { alias: String, group: String },
    RemoveGroupAdmin { alias: String, group: String },
    AddTag { alias: String, name: String, public: bool },
    RemoveTag { alias: String, name: String },
    CreateAssignment { course: String, assignment: String },
    AddProblemToAssignment {
        course: String,
        assignment: String,
        problem: String,
        points: f64,
        commit: String,
    },
    RemoveProblemFromAssignment {
        course: String,
        assignment: String,
        problem: String,
    },
}

/// Remote state of one problem
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteProblem {
    pub admins: BTreeSet<String>,
    pub group_admins: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub published: Option<String>,
    pub last_payload: Option<ProblemPayload>,
    pub archive: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Default)]
struct RemoteCourse {
    name: String,
    /// Assignment alias to problem aliases, in creation order
    assignments: Vec<(String, Vec<String>)>,
}

#[derive(Debug, Default)]
struct State {
    problems: BTreeMap<String, RemoteProblem>,
    courses: BTreeMap<String, RemoteCourse>,
    failures: BTreeMap<(String, String), PlatformError>,
    calls: Vec<Call>,
}

#[derive(Debug, Default)]
pub struct FakePlatform {
    state: RefCell<State>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an existing remote problem.
    pub fn add_problem(&self, alias: &str) {
        self.state
            .borrow_mut()
            .problems
            .entry(alias.to_string())
            .or_default();
    }

    /// Serve `archive` when `alias` is downloaded.
    pub fn set_archive(&self, alias: &str, archive: Vec<u8>) {
        self.with_problem(alias, |p| p.archive = Some(archive));
    }

    pub fn set_admins(&self, alias: &str, admins: &[&str]) {
        self.with_problem(alias, |p| p.admins = to_set(admins));
    }

    pub fn set_group_admins(&self, alias: &str, groups: &[&str]) {
        self.with_problem(alias, |p| p.group_admins = to_set(groups));
    }

    pub fn set_tags(&self, alias: &str, tags: &[&str]) {
        self.with_problem(alias, |p| p.tags = to_set(tags));
    }

    pub fn set_published(&self, alias: &str, version: &str) {
        self.with_problem(alias, |p| p.published = Some(version.to_string()));
    }

    pub fn add_course(&self, course: &str) {
        self.state
            .borrow_mut()
            .courses
            .entry(course.to_string())
            .or_insert_with(|| RemoteCourse {
                name: course.to_string(),
                assignments: Vec::new(),
            });
    }

    /// Register an assignment holding `problems`, creating the course if
    /// needed.
    pub fn add_assignment(&self, course: &str, assignment: &str, problems: &[&str]) {
        self.add_course(course);
        let mut state = self.state.borrow_mut();
        if let Some(c) = state.courses.get_mut(course) {
            c.assignments.push((
                assignment.to_string(),
                problems.iter().map(|p| p.to_string()).collect(),
            ));
        }
    }

    /// Make `op` fail with `error` when called for `target`.
    ///
    /// `op` is the trait method name. `target` is the item the call is
    /// about: the user, group or tag for metadata calls, the problem alias
    /// for problem and assignment-membership calls, the course for course
    /// calls, and the assignment alias for `create_assignment`.
    pub fn fail_on(&self, op: &str, target: &str, error: PlatformError) {
        self.state
            .borrow_mut()
            .failures
            .insert((op.to_string(), target.to_string()), error);
    }

    /// Mutating calls that succeeded, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn problem(&self, alias: &str) -> Option<RemoteProblem> {
        self.state.borrow().problems.get(alias).cloned()
    }

    /// Problems of an assignment, `None` if it does not exist.
    pub fn assignment(&self, course: &str, assignment: &str) -> Option<Vec<String>> {
        self.state
            .borrow()
            .courses
            .get(course)?
            .assignments
            .iter()
            .find(|(alias, _)| alias == assignment)
            .map(|(_, problems)| problems.clone())
    }

    fn with_problem(&self, alias: &str, f: impl FnOnce(&mut RemoteProblem)) {
        let mut state = self.state.borrow_mut();
        f(state.problems.entry(alias.to_string()).or_default());
    }

    fn check(&self, op: &str, target: &str) -> PlatformResult<()> {
        match self
            .state
            .borrow()
            .failures
            .get(&(op.to_string(), target.to_string()))
        {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }

    fn mutate_problem<T>(
        &self,
        alias: &str,
        f: impl FnOnce(&mut RemoteProblem) -> T,
    ) -> PlatformResult<T> {
        let mut state = self.state.borrow_mut();
        let problem = state
            .problems
            .get_mut(alias)
            .ok_or_else(|| PlatformError::NotFound(format!("problem {alias}")))?;
        Ok(f(problem))
    }

    fn mutate_assignment<T>(
        &self,
        course: &str,
        assignment: &str,
        f: impl FnOnce(&mut Vec<String>) -> PlatformResult<T>,
    ) -> PlatformResult<T> {
        let mut state = self.state.borrow_mut();
        let problems = state
            .courses
            .get_mut(course)
            .ok_or_else(|| PlatformError::NotFound(format!("course {course}")))?
            .assignments
            .iter_mut()
            .find(|(alias, _)| alias == assignment)
            .map(|(_, problems)| problems)
            .ok_or_else(|| PlatformError::NotFound(format!("assignment {assignment}")))?;
        f(problems)
    }
}

fn to_set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl JudgePlatform for FakePlatform {
    fn problem_exists(&self, alias: &str) -> PlatformResult<bool> {
        self.check("problem_exists", alias)?;
        Ok(self.state.borrow().problems.contains_key(alias))
    }

    fn create_problem(&self, payload: &ProblemPayload, archive: &[u8]) -> PlatformResult<()> {
        let alias = payload.problem_alias.as_str();
        self.check("create_problem", alias)?;
        {
            let mut state = self.state.borrow_mut();
            if state.problems.contains_key(alias) {
                return Err(PlatformError::AlreadyExists(format!("problem {alias}")));
            }
            state.problems.insert(
                alias.to_string(),
                RemoteProblem {
                    last_payload: Some(payload.clone()),
                    archive: Some(archive.to_vec()),
                    ..Default::default()
                },
            );
        }
        self.record(Call::CreateProblem {
            alias: alias.to_string(),
        });
        Ok(())
    }

    fn update_problem(&self, payload: &ProblemPayload, archive: &[u8]) -> PlatformResult<()> {
        let alias = payload.problem_alias.as_str();
        self.check("update_problem", alias)?;
        self.mutate_problem(alias, |p| {
            p.last_payload = Some(payload.clone());
            p.archive = Some(archive.to_vec());
        })?;
        self.record(Call::UpdateProblem {
            alias: alias.to_string(),
        });
        Ok(())
    }

    fn problem_versions(&self, alias: &str) -> PlatformResult<ProblemVersions> {
        self.check("problem_versions", alias)?;
        self.mutate_problem(alias, |p| ProblemVersions {
            published: p.published.clone(),
        })
    }

    fn problem_admins(&self, alias: &str) -> PlatformResult<ProblemAdmins> {
        self.check("problem_admins", alias)?;
        self.mutate_problem(alias, |p| ProblemAdmins {
            admins: p.admins.iter().cloned().collect(),
            group_admins: p.group_admins.iter().cloned().collect(),
        })
    }

    fn add_admin(&self, alias: &str, user: &str) -> PlatformResult<()> {
        self.check("add_admin", user)?;
        self.mutate_problem(alias, |p| p.admins.insert(user.to_string()))?;
        self.record(Call::AddAdmin {
            alias: alias.to_string(),
            user: user.to_string(),
        });
        Ok(())
    }

    fn remove_admin(&self, alias: &str, user: &str) -> PlatformResult<()> {
        self.check("remove_admin", user)?;
        self.mutate_problem(alias, |p| p.admins.remove(user))?;
        self.record(Call::RemoveAdmin {
            alias: alias.to_string(),
            user: user.to_string(),
        });
        Ok(())
    }

    fn add_group_admin(&self, alias: &str, group: &str) -> PlatformResult<()> {
        self.check("add_group_admin", group)?;
        self.mutate_problem(alias, |p| p.group_admins.insert(group.to_string()))?;
        self.record(Call::AddGroupAdmin {
            alias: alias.to_string(),
            group: group.to_string(),
        });
        Ok(())
    }

    fn remove_group_admin(&self, alias: &str, group: &str) -> PlatformResult<()> {
        self.check("remove_group_admin", group)?;
        self.mutate_problem(alias, |p| p.group_admins.remove(group))?;
        self.record(Call::RemoveGroupAdmin {
            alias: alias.to_string(),
            group: group.to_string(),
        });
        Ok(())
    }

    fn problem_tags(&self, alias: &str) -> PlatformResult<Vec<String>> {
        self.check("problem_tags", alias)?;
        self.mutate_problem(alias, |p| p.tags.iter().cloned().collect())
    }

    fn add_tag(&self, alias: &str, name: &str, public: bool) -> PlatformResult<()> {
        self.check("add_tag", name)?;
        self.mutate_problem(alias, |p| p.tags.insert(name.to_string()))?;
        self.record(Call::AddTag {
            alias: alias.to_string(),
            name: name.to_string(),
            public,
        });
        Ok(())
    }

    fn remove_tag(&self, alias: &str, name: &str) -> PlatformResult<()> {
        self.check("remove_tag", name)?;
        self.mutate_problem(alias, |p| p.tags.remove(name))?;
        self.record(Call::RemoveTag {
            alias: alias.to_string(),
            name: name.to_string(),
        });
        Ok(())
    }

    fn download_problem(&self, alias: &str) -> PlatformResult<Vec<u8>> {
        self.check("download_problem", alias)?;
        self.state
            .borrow()
            .problems
            .get(alias)
            .and_then(|p| p.archive.clone())
            .ok_or_else(|| PlatformError::NotFound(format!("problem {alias}")))
    }

    fn course_details(&self, course: &str) -> PlatformResult<Map<String, Value>> {
        self.check("course_details", course)?;
        let state = self.state.borrow();
        let c = state
            .courses
            .get(course)
            .ok_or_else(|| PlatformError::NotFound(format!("course {course}")))?;
        let assignments: Vec<Value> = c
            .assignments
            .iter()
            .map(|(alias, _)| json!({ "alias": alias }))
            .collect();
        let details = json!({
            "alias": course,
            "name": c.name,
            "assignments": assignments,
            "clarifications": [],
        });
        match details {
            Value::Object(map) => Ok(map),
            _ => Err(PlatformError::Decode("course details".into())),
        }
    }

    fn list_assignments(&self, course: &str) -> PlatformResult<Vec<AssignmentSummary>> {
        self.check("list_assignments", course)?;
        let state = self.state.borrow();
        let c = state
            .courses
            .get(course)
            .ok_or_else(|| PlatformError::NotFound(format!("course {course}")))?;
        Ok(c.assignments
            .iter()
            .map(|(alias, _)| AssignmentSummary {
                alias: alias.clone(),
                name: alias.clone(),
            })
            .collect())
    }

    fn create_assignment(&self, course: &str, assignment: &NewAssignment) -> PlatformResult<()> {
        self.check("create_assignment", &assignment.alias)?;
        if self.assignment(course, &assignment.alias).is_some() {
            return Err(PlatformError::AlreadyExists(format!(
                "assignment {}",
                assignment.alias
            )));
        }
        if !self.state.borrow().courses.contains_key(course) {
            return Err(PlatformError::NotFound(format!("course {course}")));
        }
        self.add_assignment(course, &assignment.alias, &[]);
        self.record(Call::CreateAssignment {
            course: course.to_string(),
            assignment: assignment.alias.clone(),
        });
        Ok(())
    }

    fn assignment_problems(&self, course: &str, assignment: &str) -> PlatformResult<Vec<String>> {
        self.check("assignment_problems", assignment)?;
        self.assignment(course, assignment)
            .ok_or_else(|| PlatformError::NotFound(format!("assignment {assignment}")))
    }

    fn add_problem_to_assignment(
        &self,
        course: &str,
        assignment: &str,
        problem: &str,
        points: f64,
        commit: &str,
    ) -> PlatformResult<()> {
        self.check("add_problem_to_assignment", problem)?;
        self.mutate_assignment(course, assignment, |problems| {
            if problems.iter().any(|p| p == problem) {
                return Err(PlatformError::AlreadyExists(format!("problem {problem}")));
            }
            problems.push(problem.to_string());
            Ok(())
        })?;
        self.record(Call::AddProblemToAssignment {
            course: course.to_string(),
            assignment: assignment.to_string(),
            problem: problem.to_string(),
            points,
            commit: commit.to_string(),
        });
        Ok(())
    }

    fn remove_problem_from_assignment(
        &self,
        course: &str,
        assignment: &str,
        problem: &str,
    ) -> PlatformResult<()> {
        self.check("remove_problem_from_assignment", problem)?;
        self.mutate_assignment(course, assignment, |problems| {
            let before = problems.len();
            problems.retain(|p| p != problem);
            if problems.len() == before {
                Err(PlatformError::NotFound(format!("problem {problem}")))
            } else {
                Ok(())
            }
        })?;
        self.record(Call::RemoveProblemFromAssignment {
            course: course.to_string(),
            assignment: assignment.to_string(),
            problem: problem.to_string(),
        });
        Ok(())
    }
}
