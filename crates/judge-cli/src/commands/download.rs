//! `download`: rebuild the course mirror from the judge

use judge_core::MirrorRebuild;

use crate::cli::RemoteArgs;
use crate::context::Workspace;
use crate::error::Result;
use crate::output::{finish, print_report};

pub fn run_download(workspace: &Workspace, remote: &RemoteArgs) -> Result<()> {
    let client = workspace.connect(remote)?;
    tracing::info!(courses = ?workspace.config.courses.allowed, "Rebuilding course mirror");
    let report = MirrorRebuild::new(&client, &workspace.config, &workspace.root).run()?;

    print_report(&report, false);
    finish(&report)
}
