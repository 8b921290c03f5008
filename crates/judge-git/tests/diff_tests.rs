use std::collections::HashMap;

use judge_git::{CommitRange, Error, changed_files, head_commit, repository_root};
use judge_test_utils::git::git;
use judge_test_utils::repo::TestRepo;
use pretty_assertions::assert_eq;

fn range_from_base(base: &str) -> CommitRange {
    let env: HashMap<String, String> =
        [("GITHUB_BASE_COMMIT".to_string(), base.to_string())].into();
    CommitRange::resolve(&env)
}

#[test]
fn test_repository_root_from_nested_directory() {
    let repo = TestRepo::new();
    repo.init_git();
    repo.add_problem("Courses/c/a/sumas", "sumas");

    let root = repository_root(&repo.path("Courses/c/a/sumas/cases")).unwrap();
    let expected = judge_fs::NormalizedPath::canonicalize(repo.root()).unwrap();
    assert_eq!(root, expected);
}

#[test]
fn test_repository_root_outside_git_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = repository_root(dir.path());
    assert!(matches!(result, Err(Error::NotARepository { .. })));
}

#[test]
fn test_changed_files_three_dot_range() {
    let repo = TestRepo::new();
    let base = repo.init_git();
    repo.add_problem("Courses/c/a/sumas", "sumas");
    repo.write_file("README.md", "# Changed");
    repo.commit("Add sumas");

    let root = repository_root(repo.root()).unwrap();
    let files = changed_files(&root, &range_from_base(&base)).unwrap();

    assert_eq!(
        files,
        vec![
            "Courses/c/a/sumas/cases/1.in".to_string(),
            "Courses/c/a/sumas/cases/1.out".to_string(),
            "Courses/c/a/sumas/settings.json".to_string(),
            "Courses/c/a/sumas/solutions/es.markdown".to_string(),
            "Courses/c/a/sumas/statements/es.markdown".to_string(),
            "README.md".to_string(),
        ]
    );
}

#[test]
fn test_changed_files_reports_deletions() {
    let repo = TestRepo::new();
    repo.init_git();
    repo.add_problem("p", "p");
    let base = repo.commit("Add p");
    std::fs::remove_file(repo.path("p/cases/1.out")).unwrap();
    repo.commit("Drop output");

    let root = repository_root(repo.root()).unwrap();
    let files = changed_files(&root, &range_from_base(&base)).unwrap();
    assert_eq!(files, vec!["p/cases/1.out".to_string()]);
}

#[test]
fn test_three_dot_range_ignores_base_branch_progress() {
    let repo = TestRepo::new();
    repo.init_git();
    git(repo.root(), &["checkout", "-b", "feature"]);
    repo.add_problem("feature-problem", "feature-problem");
    repo.commit("Feature work");

    git(repo.root(), &["checkout", "main"]);
    repo.write_file("main-only.txt", "x");
    let main_tip = repo.commit("Main work");
    git(repo.root(), &["checkout", "feature"]);

    let root = repository_root(repo.root()).unwrap();
    let files = changed_files(&root, &range_from_base(&main_tip)).unwrap();

    assert!(files.iter().all(|f| f.starts_with("feature-problem/")));
    assert!(!files.contains(&"main-only.txt".to_string()));
}

#[test]
fn test_unknown_revision_is_an_error() {
    let repo = TestRepo::new();
    repo.init_git();
    let root = repository_root(repo.root()).unwrap();

    let range = range_from_base("0000000000000000000000000000000000000000");
    let result = changed_files(&root, &range);
    assert!(matches!(result, Err(Error::InvalidRange { .. })));
}

#[test]
fn test_head_commit_matches_git() {
    let repo = TestRepo::new();
    let initial = repo.init_git();
    let root = repository_root(repo.root()).unwrap();
    assert_eq!(head_commit(&root).unwrap(), initial);
}
