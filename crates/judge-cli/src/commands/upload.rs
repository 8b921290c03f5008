//! `upload`: package, upload and reconcile problems

use std::collections::HashMap;

use judge_core::sync::deploy_commit;
use judge_core::{RunReport, UploadOptions, UploadWorkflow};

use crate::cli::{RemoteArgs, SelectionArgs};
use crate::context::Workspace;
use crate::error::Result;
use crate::output::{finish, print_report};

pub fn run_upload(
    workspace: &Workspace,
    selection: &SelectionArgs,
    can_create: bool,
    ci: bool,
    remote: &RemoteArgs,
) -> Result<()> {
    let mut report = RunReport::new();
    let selected = super::select_problems(workspace, selection, &mut report)?;

    if !selected.problems.is_empty() {
        let client = workspace.connect(remote)?;
        let acting_user = match client.acting_user() {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "Could not determine acting user, admin self-protection disabled");
                None
            }
        };

        let env: HashMap<String, String> = std::env::vars().collect();
        let commit = deploy_commit(&env, &workspace.root)?;
        tracing::info!(commit = %commit, count = selected.problems.len(), "Uploading problems");

        let options = UploadOptions {
            can_create,
            commit,
            acting_user,
        };
        report.extend(UploadWorkflow::new(&client, &workspace.root, options).run(&selected.problems));
    } else {
        tracing::info!("No problems to upload");
    }

    print_report(&report, ci);
    finish(&report)
}
