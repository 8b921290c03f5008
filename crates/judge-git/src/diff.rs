//! Name-only diffs over a commit range

use git2::{Delta, Diff, DiffFindOptions, Oid, Repository, RevparseMode, Tree};
use judge_fs::NormalizedPath;

use crate::{CommitRange, Error, Result};

/// List repository-relative paths added, modified, deleted or renamed
/// within `range`.
///
/// Mirrors `git diff --name-only --diff-filter=AMDR <range>`:
/// - `A...B` compares the merge base of `A` and `B` against `B`
/// - `A..B` compares `A` against `B`
/// - a single revision compares it against the working tree and index
///
/// Renames report the destination path, deletions the removed path.
/// The result is sorted and free of duplicates.
///
/// # Errors
///
/// Any failure to open the repository, resolve a revision or compute the
/// diff is returned; no partial list is produced.
pub fn changed_files(root: &NormalizedPath, range: &CommitRange) -> Result<Vec<String>> {
    let repo = Repository::open(root.to_native())?;
    let invalid = |source: git2::Error| Error::InvalidRange {
        range: range.spec.clone(),
        source,
    };

    let spec = repo.revparse(&range.spec).map_err(invalid)?;
    let mut diff = if spec.mode().contains(RevparseMode::SINGLE) {
        let from = spec
            .from()
            .ok_or_else(|| invalid(git2::Error::from_str("range has no start revision")))?;
        let tree = from.peel_to_tree().map_err(invalid)?;
        repo.diff_tree_to_workdir_with_index(Some(&tree), None)
            .map_err(invalid)?
    } else {
        let (from, to) = match (spec.from(), spec.to()) {
            (Some(from), Some(to)) => (from.id(), to.id()),
            _ => return Err(invalid(git2::Error::from_str("range is missing an end"))),
        };
        let base = if spec.mode().contains(RevparseMode::MERGE_BASE) {
            repo.merge_base(from, to).map_err(invalid)?
        } else {
            from
        };
        let old_tree = tree_of(&repo, base).map_err(invalid)?;
        let new_tree = tree_of(&repo, to).map_err(invalid)?;
        repo.diff_tree_to_tree(Some(&old_tree), Some(&new_tree), None)
            .map_err(invalid)?
    };

    let mut find = DiffFindOptions::new();
    find.renames(true);
    diff.find_similar(Some(&mut find)).map_err(invalid)?;

    let files = collect_paths(&diff);
    tracing::debug!(range = %range, count = files.len(), "Computed changed files");
    Ok(files)
}

/// Full hex id of the commit HEAD points to.
pub fn head_commit(root: &NormalizedPath) -> Result<String> {
    let repo = Repository::open(root.to_native())?;
    let commit = repo.head()?.peel_to_commit()?;
    Ok(commit.id().to_string())
}

fn tree_of(repo: &Repository, oid: Oid) -> std::result::Result<Tree<'_>, git2::Error> {
    repo.find_commit(oid)?.tree()
}

fn collect_paths(diff: &Diff<'_>) -> Vec<String> {
    let mut files: Vec<String> = diff
        .deltas()
        .filter_map(|delta| {
            let file = match delta.status() {
                Delta::Added | Delta::Modified | Delta::Renamed => delta.new_file(),
                Delta::Deleted => delta.old_file(),
                _ => return None,
            };
            file.path().map(|p| NormalizedPath::new(p).as_str().to_string())
        })
        .collect();
    files.sort();
    files.dedup();
    files
}
