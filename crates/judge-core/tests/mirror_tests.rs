use std::io::{Cursor, Write};

use judge_core::fakes::FakePlatform;
use judge_core::sync::{MirrorRebuild, mirror_problem, rewrite_mirror_settings, unpack_archive};
use judge_core::{ItemStatus, SyncConfig};
use judge_fs::NormalizedPath;
use judge_test_utils::repo::TestRepo;
use pretty_assertions::assert_eq;
use serde_json::json;
use zip::write::SimpleFileOptions;

fn zip_of(files: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in files {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn problem_zip() -> Vec<u8> {
    zip_of(&[
        ("settings.json", r#"{"title":"Upstream","alias":"x"}"#),
        ("cases/1.in", "1\n"),
    ])
}

fn config(courses: &[&str]) -> SyncConfig {
    let mut config = SyncConfig::default();
    config.courses.allowed = courses.iter().map(|c| c.to_string()).collect();
    config
}

#[test]
fn test_rebuild_mirrors_every_assignment_problem() {
    let repo = TestRepo::new();
    let platform = FakePlatform::new();
    platform.add_assignment("curso-publico", "semana-1", &["sumas", "restas"]);
    platform.add_assignment("curso-publico", "semana-2", &["primos"]);
    for alias in ["sumas", "restas", "primos"] {
        platform.set_archive(alias, problem_zip());
    }
    let config = config(&["curso-publico"]);
    let root = NormalizedPath::new(repo.root());

    let report = MirrorRebuild::new(&platform, &config, &root).run().unwrap();

    assert_eq!(report.count(ItemStatus::Succeeded), 3);
    assert_eq!(
        repo.manifest_paths(),
        vec![
            "Courses/curso-publico/semana-1/sumas",
            "Courses/curso-publico/semana-1/restas",
            "Courses/curso-publico/semana-2/primos",
        ]
    );
    let settings = repo.read_json("Courses/curso-publico/semana-2/primos/settings.json");
    assert_eq!(settings["alias"], "primos");
    assert_eq!(settings["title"], "primos");
}

#[test]
fn test_course_settings_omit_volatile_keys() {
    let repo = TestRepo::new();
    let platform = FakePlatform::new();
    platform.add_assignment("curso-publico", "semana-1", &[]);
    let config = config(&["curso-publico"]);
    let root = NormalizedPath::new(repo.root());

    MirrorRebuild::new(&platform, &config, &root).run().unwrap();

    let details = repo.read_json("Courses/curso-publico/course_settings.json");
    assert_eq!(details["alias"], "curso-publico");
    assert!(details.get("assignments").is_none());
    assert!(details.get("clarifications").is_none());
}

#[test]
fn test_rebuild_replaces_stale_mirror_and_keeps_disabled_flags() {
    let repo = TestRepo::new();
    repo.write_file("Courses/curso-viejo/a/p/settings.json", "{}");
    repo.write_json(
        "problems.json",
        &json!({
            "problems": [
                { "path": "Courses/curso-publico/semana-1/sumas", "disabled": true },
                { "path": "Courses/curso-viejo/a/p" }
            ]
        }),
    );
    let platform = FakePlatform::new();
    platform.add_assignment("curso-publico", "semana-1", &["sumas"]);
    platform.set_archive("sumas", problem_zip());
    let config = config(&["curso-publico"]);
    let root = NormalizedPath::new(repo.root());

    MirrorRebuild::new(&platform, &config, &root).run().unwrap();

    repo.assert_file_not_exists("Courses/curso-viejo");
    let manifest = repo.read_json("problems.json");
    assert_eq!(
        manifest["problems"],
        json!([{ "path": "Courses/curso-publico/semana-1/sumas", "disabled": true }])
    );
}

#[test]
fn test_failed_download_is_left_out_of_the_manifest() {
    let repo = TestRepo::new();
    let platform = FakePlatform::new();
    platform.add_assignment("curso-publico", "semana-1", &["sumas", "perdido"]);
    platform.set_archive("sumas", problem_zip());
    let config = config(&["curso-publico", "omi-public-course"]);
    let root = NormalizedPath::new(repo.root());

    let report = MirrorRebuild::new(&platform, &config, &root).run().unwrap();

    let failed: Vec<_> = report.failures().map(|i| i.item.as_str()).collect();
    // the second course is unknown to the judge
    assert_eq!(failed, vec!["curso-publico/semana-1/perdido", "omi-public-course"]);
    assert_eq!(
        repo.manifest_paths(),
        vec!["Courses/curso-publico/semana-1/sumas"]
    );
}

#[test]
fn test_root_mirror_only_clears_allowed_courses() {
    let repo = TestRepo::new();
    repo.write_file("README.md", "keep me\n");
    repo.write_file("curso-publico/old/p/settings.json", "{}");
    let platform = FakePlatform::new();
    platform.add_assignment("curso-publico", "semana-1", &[]);
    let mut config = config(&["curso-publico"]);
    config.courses.mirror_dir = String::new();
    let root = NormalizedPath::new(repo.root());

    MirrorRebuild::new(&platform, &config, &root).run().unwrap();

    repo.assert_file_exists("README.md");
    repo.assert_file_not_exists("curso-publico/old");
    repo.assert_file_exists("curso-publico/course_settings.json");
}

#[test]
fn test_unpack_skips_entries_escaping_destination() {
    let repo = TestRepo::new();
    let bytes = zip_of(&[("../evil.txt", "x"), ("ok/file.txt", "y")]);
    let dest = NormalizedPath::new(repo.path("dest"));

    let files = unpack_archive(&bytes, &dest, "p").unwrap();

    assert_eq!(files, 1);
    repo.assert_file_exists("dest/ok/file.txt");
    repo.assert_file_not_exists("evil.txt");
}

#[test]
fn test_rewrite_settings_tolerates_missing_file() {
    let repo = TestRepo::new();
    let dir = NormalizedPath::new(repo.root());

    assert!(!rewrite_mirror_settings(&dir, "sumas").unwrap());

    repo.write_json("settings.json", &json!({ "title": "T", "Limits": {} }));
    assert!(rewrite_mirror_settings(&dir, "sumas").unwrap());
    assert_eq!(
        repo.read_json("settings.json"),
        json!({ "title": "sumas", "alias": "sumas", "Limits": {} })
    );
}

#[test]
fn test_mirror_replaces_previous_copy_without_leftovers() {
    let repo = TestRepo::new();
    repo.write_file("Courses/c/a/sumas/cases/old.in", "old\n");
    let platform = FakePlatform::new();
    platform.set_archive("sumas", problem_zip());
    let dest = NormalizedPath::new(repo.path("Courses/c/a/sumas"));

    mirror_problem(&platform, "sumas", &dest).unwrap();

    repo.assert_file_exists("Courses/c/a/sumas/cases/1.in");
    repo.assert_file_not_exists("Courses/c/a/sumas/cases/old.in");
    let siblings: Vec<_> = std::fs::read_dir(repo.path("Courses/c/a"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(siblings, vec!["sumas"]);
}

#[cfg(unix)]
#[test]
fn test_mirror_directory_is_world_readable() {
    use std::os::unix::fs::PermissionsExt;

    let repo = TestRepo::new();
    let platform = FakePlatform::new();
    platform.set_archive("sumas", problem_zip());
    let dest = NormalizedPath::new(repo.path("Courses/c/a/sumas"));

    mirror_problem(&platform, "sumas", &dest).unwrap();

    let mode = std::fs::metadata(repo.path("Courses/c/a/sumas"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o755);
}
