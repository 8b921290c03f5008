//! `validate`: statement and image checks

use judge_core::RunReport;
use judge_meta::validate_problem_content;

use crate::cli::SelectionArgs;
use crate::context::Workspace;
use crate::error::Result;
use crate::output::{finish, print_report};

pub fn run_validate(workspace: &Workspace, selection: &SelectionArgs, ci: bool) -> Result<()> {
    let mut report = RunReport::new();
    let selected = super::select_problems(workspace, selection, &mut report)?;

    for problem in &selected.problems {
        let issues = validate_problem_content(&problem.directory(&workspace.root), &problem.title);
        if issues.is_empty() {
            report.succeeded(problem.path.as_str());
            continue;
        }
        for issue in issues {
            tracing::error!(problem = %problem.alias, issue = %issue, "Content issue");
            let file = match issue.file() {
                Some(file) => format!("{}/{file}", problem.path),
                None => problem.path.clone(),
            };
            report.failed_at(problem.path.as_str(), file, issue.to_string());
        }
    }

    print_report(&report, ci);
    finish(&report)
}
