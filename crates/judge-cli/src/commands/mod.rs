//! Command implementations for judge-cli

pub mod courses;
pub mod download;
pub mod list;
pub mod upload;
pub mod validate;

pub use courses::run_courses;
pub use download::run_download;
pub use list::run_list;
pub use upload::run_upload;
pub use validate::run_validate;

use judge_core::{
    ChangeSetSelector, GitChangeSource, ManifestStore, RunReport, SelectMode, Selection,
};

use crate::cli::SelectionArgs;
use crate::context::Workspace;
use crate::error::Result;

fn mode(selection: &SelectionArgs) -> SelectMode {
    if selection.all {
        SelectMode::All
    } else {
        SelectMode::Changed
    }
}

fn selector() -> ChangeSetSelector<GitChangeSource> {
    let changes = GitChangeSource::from_process_env();
    tracing::debug!(range = %changes.range(), "Resolved commit range");
    ChangeSetSelector::new(changes)
}

/// The manifest backing `selection`.
///
/// Explicit paths do not need one; otherwise the manifest must exist.
fn load_manifest(workspace: &Workspace, selection: &SelectionArgs) -> Result<ManifestStore> {
    let path = workspace.config.manifest_path(&workspace.root);
    if selection.problems.is_empty() {
        Ok(ManifestStore::load_required(path)?)
    } else {
        Ok(ManifestStore::load(path)?)
    }
}

/// Problem paths in scope for `selection`.
pub(crate) fn select_paths(workspace: &Workspace, selection: &SelectionArgs) -> Result<Vec<String>> {
    let manifest = load_manifest(workspace, selection)?;
    Ok(selector().select_paths(
        mode(selection),
        &selection.problems,
        &workspace.root,
        &manifest,
    )?)
}

/// Load the problems in scope; load failures go into `report`.
pub(crate) fn select_problems(
    workspace: &Workspace,
    selection: &SelectionArgs,
    report: &mut RunReport,
) -> Result<Selection> {
    let manifest = load_manifest(workspace, selection)?;
    let selected = selector().select(
        mode(selection),
        &selection.problems,
        &workspace.root,
        &manifest,
    )?;
    for failure in &selected.failures {
        report.failed_at(
            failure.path.as_str(),
            format!("{}/{}", failure.path, judge_meta::SETTINGS_JSON),
            failure.error.to_string(),
        );
    }
    Ok(selected)
}
