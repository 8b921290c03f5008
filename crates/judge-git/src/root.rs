//! Repository root discovery

use std::path::Path;

use git2::Repository;
use judge_fs::NormalizedPath;

use crate::{Error, Result};

/// Find the root of the working tree containing `start`.
///
/// When `start` sits inside a submodule the superproject's working tree is
/// returned instead, so problem paths stay relative to the top-level
/// repository.
///
/// # Errors
///
/// Returns [`Error::NotARepository`] when no repository encloses `start`
/// and [`Error::BareRepository`] when the enclosing repository has no
/// working tree.
pub fn repository_root(start: &Path) -> Result<NormalizedPath> {
    let repo = Repository::discover(start).map_err(|_| Error::NotARepository {
        path: start.to_path_buf(),
    })?;

    let workdir = superproject_workdir(&repo)
        .or_else(|| repo.workdir().map(Path::to_path_buf))
        .ok_or_else(|| Error::BareRepository {
            path: repo.path().to_path_buf(),
        })?;

    let root = NormalizedPath::canonicalize(&workdir)?;
    tracing::debug!(root = %root, "Resolved repository root");
    Ok(root)
}

/// Submodule git dirs live under `<super>/.git/modules/<name>`.
fn superproject_workdir(repo: &Repository) -> Option<std::path::PathBuf> {
    let git_dir = NormalizedPath::new(repo.path());
    let marker = "/.git/modules/";
    let idx = git_dir.as_str().find(marker)?;
    let super_root = &git_dir.as_str()[..idx];
    let super_repo = Repository::open(super_root).ok()?;
    super_repo.workdir().map(Path::to_path_buf)
}
