use judge_core::platform::{
    AssignmentSummary, JudgePlatform, NewAssignment, PlatformResult, ProblemAdmins,
    ProblemPayload, ProblemVersions,
};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::client::OmegaUpClient;
use crate::response::parse;

/// Only entries with this role count as admins; owners are left alone.
const ADMIN_ROLE: &str = "admin";

#[derive(Deserialize)]
struct AdminsResponse {
    #[serde(default)]
    admins: Vec<UserAdmin>,
    #[serde(default)]
    group_admins: Vec<GroupAdmin>,
}

#[derive(Deserialize)]
struct UserAdmin {
    username: String,
    #[serde(default)]
    role: String,
}

#[derive(Deserialize)]
struct GroupAdmin {
    alias: String,
    #[serde(default)]
    role: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    tags: Vec<Tag>,
}

#[derive(Deserialize)]
struct Tag {
    name: String,
}

#[derive(Deserialize)]
struct AssignmentsResponse {
    #[serde(default)]
    assignments: Vec<AssignmentSummary>,
}

#[derive(Deserialize)]
struct AssignmentDetails {
    #[serde(default)]
    problems: Vec<AssignmentProblem>,
}

#[derive(Deserialize)]
struct AssignmentProblem {
    alias: String,
}

fn params<const N: usize>(pairs: [(&'static str, &str); N]) -> Vec<(&'static str, String)> {
    pairs
        .into_iter()
        .map(|(name, value)| (name, value.to_string()))
        .collect()
}

impl OmegaUpClient {
    fn call(&self, endpoint: &str, params: &[(&str, String)]) -> PlatformResult<Value> {
        Ok(self.query(endpoint, params)?)
    }

    fn call_as<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> PlatformResult<T> {
        let value = self.query(endpoint, params)?;
        Ok(parse(endpoint, value)?)
    }
}

impl JudgePlatform for OmegaUpClient {
    fn problem_exists(&self, alias: &str) -> PlatformResult<bool> {
        match self.query("problem/details", &params([("problem_alias", alias)])) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn create_problem(&self, payload: &ProblemPayload, archive: &[u8]) -> PlatformResult<()> {
        self.query_with_archive("problem/create", payload.form_fields(), archive)?;
        Ok(())
    }

    fn update_problem(&self, payload: &ProblemPayload, archive: &[u8]) -> PlatformResult<()> {
        self.query_with_archive("problem/update", payload.form_fields(), archive)?;
        Ok(())
    }

    fn problem_versions(&self, alias: &str) -> PlatformResult<ProblemVersions> {
        self.call_as("problem/versions", &params([("problem_alias", alias)]))
    }

    fn problem_admins(&self, alias: &str) -> PlatformResult<ProblemAdmins> {
        let response: AdminsResponse =
            self.call_as("problem/admins", &params([("problem_alias", alias)]))?;
        Ok(ProblemAdmins {
            admins: response
                .admins
                .into_iter()
                .filter(|a| a.role == ADMIN_ROLE)
                .map(|a| a.username)
                .collect(),
            group_admins: response
                .group_admins
                .into_iter()
                .filter(|g| g.role == ADMIN_ROLE)
                .map(|g| g.alias)
                .collect(),
        })
    }

    fn add_admin(&self, alias: &str, user: &str) -> PlatformResult<()> {
        self.call(
            "problem/addAdmin",
            &params([("problem_alias", alias), ("usernameOrEmail", user)]),
        )?;
        Ok(())
    }

    fn remove_admin(&self, alias: &str, user: &str) -> PlatformResult<()> {
        self.call(
            "problem/removeAdmin",
            &params([("problem_alias", alias), ("usernameOrEmail", user)]),
        )?;
        Ok(())
    }

    fn add_group_admin(&self, alias: &str, group: &str) -> PlatformResult<()> {
        self.call(
            "problem/addGroupAdmin",
            &params([("problem_alias", alias), ("group", group)]),
        )?;
        Ok(())
    }

    fn remove_group_admin(&self, alias: &str, group: &str) -> PlatformResult<()> {
        self.call(
            "problem/removeGroupAdmin",
            &params([("problem_alias", alias), ("group", group)]),
        )?;
        Ok(())
    }

    fn problem_tags(&self, alias: &str) -> PlatformResult<Vec<String>> {
        let response: TagsResponse =
            self.call_as("problem/tags", &params([("problem_alias", alias)]))?;
        Ok(response.tags.into_iter().map(|t| t.name).collect())
    }

    fn add_tag(&self, alias: &str, name: &str, public: bool) -> PlatformResult<()> {
        self.call(
            "problem/addTag",
            &params([
                ("problem_alias", alias),
                ("name", name),
                ("public", if public { "true" } else { "false" }),
            ]),
        )?;
        Ok(())
    }

    fn remove_tag(&self, alias: &str, name: &str) -> PlatformResult<()> {
        self.call(
            "problem/removeTag",
            &params([("problem_alias", alias), ("name", name)]),
        )?;
        Ok(())
    }

    fn download_problem(&self, alias: &str) -> PlatformResult<Vec<u8>> {
        Ok(self.download(&format!("problem/download/problem_alias/{alias}"))?)
    }

    fn course_details(&self, course: &str) -> PlatformResult<Map<String, Value>> {
        match self.call("course/details", &params([("alias", course)]))? {
            Value::Object(mut details) => {
                details.remove("status");
                Ok(details)
            }
            _ => Err(crate::Error::Decode {
                endpoint: "course/details".to_string(),
                message: "expected an object".to_string(),
            }
            .into()),
        }
    }

    fn list_assignments(&self, course: &str) -> PlatformResult<Vec<AssignmentSummary>> {
        let response: AssignmentsResponse =
            self.call_as("course/listAssignments", &params([("course_alias", course)]))?;
        Ok(response.assignments)
    }

    fn create_assignment(&self, course: &str, assignment: &NewAssignment) -> PlatformResult<()> {
        let mut fields = params([
            ("course_alias", course),
            ("alias", assignment.alias.as_str()),
            ("name", assignment.name.as_str()),
            ("description", assignment.description.as_str()),
            ("assignment_type", assignment.assignment_type.as_str()),
        ]);
        fields.push(("start_time", assignment.start_time.timestamp().to_string()));
        fields.push(("finish_time", assignment.finish_time.timestamp().to_string()));
        fields.push((
            "unlimited_duration",
            assignment.unlimited_duration.to_string(),
        ));
        self.call("course/createAssignment", &fields)?;
        Ok(())
    }

    fn assignment_problems(&self, course: &str, assignment: &str) -> PlatformResult<Vec<String>> {
        let details: AssignmentDetails = self.call_as(
            "course/assignmentDetails",
            &params([("course", course), ("assignment", assignment)]),
        )?;
        Ok(details.problems.into_iter().map(|p| p.alias).collect())
    }

    fn add_problem_to_assignment(
        &self,
        course: &str,
        assignment: &str,
        problem: &str,
        points: f64,
        commit: &str,
    ) -> PlatformResult<()> {
        let mut fields = params([
            ("course_alias", course),
            ("assignment_alias", assignment),
            ("problem_alias", problem),
        ]);
        fields.push(("points", points.to_string()));
        if !commit.is_empty() {
            fields.push(("commit", commit.to_string()));
        }
        self.call("course/addProblem", &fields)?;
        Ok(())
    }

    fn remove_problem_from_assignment(
        &self,
        course: &str,
        assignment: &str,
        problem: &str,
    ) -> PlatformResult<()> {
        self.call(
            "course/removeProblem",
            &params([
                ("course_alias", course),
                ("assignment_alias", assignment),
                ("problem_alias", problem),
            ]),
        )?;
        Ok(())
    }
}
