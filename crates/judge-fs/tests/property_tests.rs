use judge_fs::{NormalizedPath, sanitize_alias};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_normalization_has_no_backslashes(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        prop_assert!(!path.as_str().contains('\\'));
    }

    #[test]
    fn test_joined_child_is_relative_to_parent(
        base in "[a-z]{1,8}(/[a-z]{1,8}){0,3}",
        child in "[a-z]{1,8}(/[a-z]{1,8}){0,3}",
    ) {
        let parent = NormalizedPath::new(&base);
        let joined = parent.join(&child);
        prop_assert_eq!(joined.relative_to(&parent), Some(child));
    }

    #[test]
    fn test_sanitized_alias_is_a_single_safe_segment(alias in "\\PC{1,40}") {
        let name = sanitize_alias(&alias);
        prop_assert!(!name.contains('/'));
        prop_assert!(!name.contains('\\'));
        prop_assert!(name != "." && name != "..");
        prop_assert!(name.chars().all(|c| c.is_ascii_alphanumeric() || "_-.".contains(c)));
    }
}
