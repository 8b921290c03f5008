//! `courses`: apply pending course add/remove requests

use std::path::Path;

use judge_core::CourseSyncWorkflow;
use judge_fs::NormalizedPath;

use crate::cli::RemoteArgs;
use crate::context::Workspace;
use crate::error::Result;
use crate::output::{finish, print_report};

pub fn run_courses(workspace: &Workspace, input: Option<&Path>, remote: &RemoteArgs) -> Result<()> {
    let pending = match input {
        Some(path) if path.is_absolute() => NormalizedPath::new(path),
        Some(path) => workspace
            .root
            .join(&judge_meta::normalize_relative(&path.to_string_lossy())),
        None => workspace.config.pending_path(&workspace.root),
    };

    // Fail before authenticating when there is nothing to read.
    if !pending.is_file() {
        return Err(judge_core::Error::PendingNotFound {
            path: pending.to_native(),
        }
        .into());
    }

    let client = workspace.connect(remote)?;
    let report = CourseSyncWorkflow::new(&client, &workspace.config, &workspace.root)
        .run_from(&pending)?;

    print_report(&report, false);
    finish(&report)
}
