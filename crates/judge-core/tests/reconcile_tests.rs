use judge_core::fakes::{Call, FakePlatform};
use judge_core::platform::PlatformError;
use judge_core::reconcile::{
    DesiredMetadata, MetadataKind, MetadataReconciler, ReconcileAction, normalize_set,
};
use pretty_assertions::assert_eq;

fn desired_tags(tags: &[&str]) -> DesiredMetadata {
    DesiredMetadata {
        tags: Some(normalize_set(tags)),
        ..Default::default()
    }
}

#[test]
fn test_tags_converge_and_restricted_tag_is_untouched() {
    let platform = FakePlatform::new();
    platform.set_tags("sumas", &["easy", "hard", "restricted-system-tag"]);

    let report = MetadataReconciler::new(&platform, None)
        .reconcile("sumas", &desired_tags(&["math", "easy"]));

    assert_eq!(
        platform.calls(),
        vec![
            Call::AddTag {
                alias: "sumas".into(),
                name: "math".into(),
                public: false
            },
            Call::RemoveTag {
                alias: "sumas".into(),
                name: "hard".into()
            },
        ]
    );
    assert_eq!(
        report.suppressed,
        vec![(MetadataKind::Tags, "restricted-system-tag".to_string())]
    );
    assert!(report.is_complete());

    let tags = platform.problem("sumas").unwrap().tags;
    assert!(tags.contains("restricted-system-tag"));
    assert!(tags.contains("math"));
    assert!(!tags.contains("hard"));
}

#[test]
fn test_admins_compare_case_insensitively_and_spare_acting_user() {
    let platform = FakePlatform::new();
    platform.set_admins("sumas", &["deployer", "bob"]);
    platform.set_group_admins("sumas", &["old-staff"]);

    let desired = DesiredMetadata {
        admins: Some(normalize_set(["Alice", "BOB"])),
        admin_groups: Some(normalize_set(["omi-staff"])),
        tags: None,
    };
    let report = MetadataReconciler::new(&platform, Some("Deployer")).reconcile("sumas", &desired);

    assert_eq!(
        platform.calls(),
        vec![
            Call::AddAdmin {
                alias: "sumas".into(),
                user: "alice".into()
            },
            Call::AddGroupAdmin {
                alias: "sumas".into(),
                group: "omi-staff".into()
            },
            Call::RemoveGroupAdmin {
                alias: "sumas".into(),
                group: "old-staff".into()
            },
        ]
    );
    assert_eq!(
        report.suppressed,
        vec![(MetadataKind::Admins, "deployer".to_string())]
    );
}

#[test]
fn test_ungoverned_sets_are_not_fetched_or_touched() {
    let platform = FakePlatform::new();
    platform.set_tags("sumas", &["anything"]);
    platform.fail_on(
        "problem_admins",
        "sumas",
        PlatformError::Transport("should not be called".into()),
    );

    let report = MetadataReconciler::new(&platform, None)
        .reconcile("sumas", &DesiredMetadata::default());

    assert!(report.is_complete());
    assert!(platform.calls().is_empty());
}

#[test]
fn test_empty_declared_set_removes_everything_removable() {
    let platform = FakePlatform::new();
    platform.set_tags("sumas", &["a", "problemRestrictedTagKarel"]);

    MetadataReconciler::new(&platform, None).reconcile("sumas", &desired_tags(&[]));

    assert_eq!(
        platform.calls(),
        vec![Call::RemoveTag {
            alias: "sumas".into(),
            name: "a".into()
        }]
    );
}

#[test]
fn test_single_failure_does_not_stop_the_set() {
    let platform = FakePlatform::new();
    platform.set_tags("sumas", &["x", "y"]);
    platform.fail_on("add_tag", "a", PlatformError::Transport("timeout".into()));

    let report = MetadataReconciler::new(&platform, None)
        .reconcile("sumas", &desired_tags(&["a", "b"]));

    assert!(!report.is_complete());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].item, "a");
    assert_eq!(report.failures[0].action, ReconcileAction::Add);
    // b was still added and both stale tags removed
    assert_eq!(report.added, vec![(MetadataKind::Tags, "b".to_string())]);
    assert_eq!(report.removed.len(), 2);
}

#[test]
fn test_fetch_failure_is_recorded() {
    let platform = FakePlatform::new();
    platform.add_problem("sumas");
    platform.fail_on("problem_tags", "sumas", PlatformError::Transport("down".into()));

    let report = MetadataReconciler::new(&platform, None).reconcile("sumas", &desired_tags(&["a"]));

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].action, ReconcileAction::Fetch);
    assert!(platform.calls().is_empty());
}
