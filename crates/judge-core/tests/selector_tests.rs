use std::collections::HashMap;

use judge_core::selector::{ChangeSetSelector, ChangeSource, GitChangeSource, SelectMode};
use judge_core::{Error, ManifestStore};
use judge_fs::NormalizedPath;
use judge_git::CommitRange;
use judge_test_utils::repo::TestRepo;
use pretty_assertions::assert_eq;

/// Fixed list of changed files
struct StaticChanges(Vec<&'static str>);

impl ChangeSource for StaticChanges {
    fn changed_files(&self, _root: &NormalizedPath) -> judge_core::Result<Vec<String>> {
        Ok(self.0.iter().map(|s| s.to_string()).collect())
    }
}

/// Panics if asked for a diff
struct NoDiff;

impl ChangeSource for NoDiff {
    fn changed_files(&self, _root: &NormalizedPath) -> judge_core::Result<Vec<String>> {
        panic!("diff must not be computed");
    }
}

fn setup() -> (TestRepo, NormalizedPath, ManifestStore) {
    let repo = TestRepo::new();
    repo.add_problem("Courses/c/a/sumas", "sumas");
    repo.add_problem("Courses/c/a/sumas-2", "sumas-2");
    repo.add_problem("Courses/c/b/restas", "restas");
    repo.write_manifest(&["Courses/c/a/sumas", "Courses/c/a/sumas-2", "Courses/c/b/restas"]);
    let root = NormalizedPath::new(repo.root());
    let manifest = ManifestStore::load(root.join("problems.json")).unwrap();
    (repo, root, manifest)
}

fn paths(selector_result: &judge_core::Selection) -> Vec<&str> {
    selector_result
        .problems
        .iter()
        .map(|p| p.path.as_str())
        .collect()
}

#[test]
fn test_all_mode_returns_every_enabled_entry() {
    let (_repo, root, manifest) = setup();
    let selection = ChangeSetSelector::new(NoDiff)
        .select(SelectMode::All, &[], &root, &manifest)
        .unwrap();
    assert_eq!(
        paths(&selection),
        vec!["Courses/c/a/sumas", "Courses/c/a/sumas-2", "Courses/c/b/restas"]
    );
}

#[test]
fn test_changed_mode_ignores_sibling_sharing_a_string_prefix() {
    let (_repo, root, manifest) = setup();
    let selector = ChangeSetSelector::new(StaticChanges(vec![
        "Courses/c/a/sumas-2/cases/1.in",
        "README.md",
    ]));
    let selection = selector
        .select(SelectMode::Changed, &[], &root, &manifest)
        .unwrap();
    assert_eq!(paths(&selection), vec!["Courses/c/a/sumas-2"]);
}

#[test]
fn test_changed_mode_with_unrelated_diff_is_empty() {
    let (_repo, root, manifest) = setup();
    let selector = ChangeSetSelector::new(StaticChanges(vec!["docs/index.md"]));
    let selection = selector
        .select(SelectMode::Changed, &[], &root, &manifest)
        .unwrap();
    assert!(selection.problems.is_empty());
    assert!(selection.failures.is_empty());
}

#[test]
fn test_explicit_paths_skip_the_diff() {
    let (_repo, root, manifest) = setup();
    let selection = ChangeSetSelector::new(NoDiff)
        .select(
            SelectMode::Changed,
            &["Courses/c/b/restas/".to_string()],
            &root,
            &manifest,
        )
        .unwrap();
    assert_eq!(paths(&selection), vec!["Courses/c/b/restas"]);
}

#[test]
fn test_disabled_entries_are_skipped() {
    let repo = TestRepo::new();
    repo.add_problem("on", "on");
    repo.add_problem("off", "off");
    repo.write_json(
        "problems.json",
        &serde_json::json!({ "problems": [
            { "path": "on" },
            { "path": "off", "title": "Off", "disabled": true }
        ]}),
    );
    let root = NormalizedPath::new(repo.root());
    let manifest = ManifestStore::load(root.join("problems.json")).unwrap();

    let selection = ChangeSetSelector::new(NoDiff)
        .select(SelectMode::All, &[], &root, &manifest)
        .unwrap();
    assert_eq!(paths(&selection), vec!["on"]);
}

#[test]
fn test_unloadable_problem_is_an_item_failure() {
    let repo = TestRepo::new();
    repo.add_problem("good", "good");
    repo.write_file("bad/settings.json", "not json");
    repo.write_manifest(&["good", "bad"]);
    let root = NormalizedPath::new(repo.root());
    let manifest = ManifestStore::load(root.join("problems.json")).unwrap();

    let selection = ChangeSetSelector::new(NoDiff)
        .select(SelectMode::All, &[], &root, &manifest)
        .unwrap();
    assert_eq!(paths(&selection), vec!["good"]);
    assert_eq!(selection.failures.len(), 1);
    assert_eq!(selection.failures[0].path, "bad");
}

#[test]
fn test_git_change_source_selects_committed_problem() {
    let repo = TestRepo::new();
    repo.add_problem("p/old", "old");
    repo.write_manifest(&["p/old", "p/new"]);
    let base = repo.init_git();
    repo.add_problem("p/new", "new");
    repo.commit("Add new problem");

    let root = judge_git::repository_root(repo.root()).unwrap();
    let manifest = ManifestStore::load(root.join("problems.json")).unwrap();
    let env: HashMap<String, String> = [("GITHUB_BASE_COMMIT".to_string(), base)].into();
    let selector = ChangeSetSelector::new(GitChangeSource::new(CommitRange::resolve(&env)));

    let selected = selector
        .select_paths(SelectMode::Changed, &[], &root, &manifest)
        .unwrap();
    assert_eq!(selected, vec!["p/new".to_string()]);
}

#[test]
fn test_failing_diff_is_fatal() {
    let repo = TestRepo::new();
    repo.add_problem("p", "p");
    repo.write_manifest(&["p"]);
    repo.init_git();

    let root = judge_git::repository_root(repo.root()).unwrap();
    let manifest = ManifestStore::load(root.join("problems.json")).unwrap();
    let env: HashMap<String, String> =
        [("TRAVIS_COMMIT_RANGE".to_string(), "nope...HEAD".to_string())].into();
    let selector = ChangeSetSelector::new(GitChangeSource::new(CommitRange::resolve(&env)));

    let err = selector
        .select(SelectMode::Changed, &[], &root, &manifest)
        .unwrap_err();
    assert!(matches!(err, Error::Git(_)));
    assert!(err.is_fatal());
}
