//! Set reconciliation for admins, admin groups and tags
//!
//! [`diff_sets`] is the pure core; [`MetadataReconciler`] fetches the
//! observed state, applies the suppression policy and issues the calls.

mod metadata;

use std::collections::BTreeSet;
use std::fmt;

pub use metadata::{
    DesiredMetadata, MetadataReconciler, ReconcileAction, ReconcileFailure, ReconcileReport,
};

/// Tag prefixes the judge reserves; such tags are never removed.
///
/// Compared against lowercased tag names.
pub const RESTRICTED_TAG_PREFIXES: [&str; 2] = ["problemrestrictedtag", "restricted-"];

/// Which governed set an operation touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetadataKind {
    Admins,
    AdminGroups,
    Tags,
}

impl fmt::Display for MetadataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Admins => "admin",
            Self::AdminGroups => "admin group",
            Self::Tags => "tag",
        })
    }
}

/// Minimal edit turning `observed` into `desired`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetDiff {
    pub to_add: BTreeSet<String>,
    pub to_remove: BTreeSet<String>,
}

/// `desired - observed` and `observed - desired`.
pub fn diff_sets(desired: &BTreeSet<String>, observed: &BTreeSet<String>) -> SetDiff {
    SetDiff {
        to_add: desired.difference(observed).cloned().collect(),
        to_remove: observed.difference(desired).cloned().collect(),
    }
}

/// Lowercase, trim and deduplicate.
pub fn normalize_set<I, S>(items: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn is_restricted_tag(name: &str) -> bool {
    let name = name.to_lowercase();
    RESTRICTED_TAG_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

/// A [`SetDiff`] after the suppression policy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetPlan {
    pub to_add: Vec<String>,
    pub to_remove: Vec<String>,
    /// Items the diff wanted to change but policy protects
    pub suppressed: Vec<String>,
}

/// Apply the fixed suppression policy to the diff of one set.
///
/// The acting user is never added to or removed from the admin set, and
/// restricted tags are never removed.
pub fn plan_set(
    kind: MetadataKind,
    desired: &BTreeSet<String>,
    observed: &BTreeSet<String>,
    acting_user: Option<&str>,
) -> SetPlan {
    let diff = diff_sets(desired, observed);
    let acting_user = acting_user.map(str::to_lowercase);
    let is_self =
        |item: &str| kind == MetadataKind::Admins && acting_user.as_deref() == Some(item);

    let mut plan = SetPlan::default();
    for item in diff.to_add {
        if is_self(&item) {
            plan.suppressed.push(item);
        } else {
            plan.to_add.push(item);
        }
    }
    for item in diff.to_remove {
        if is_self(&item) || (kind == MetadataKind::Tags && is_restricted_tag(&item)) {
            plan.suppressed.push(item);
        } else {
            plan.to_remove.push(item);
        }
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        normalize_set(items)
    }

    #[test]
    fn restricted_tags_are_kept() {
        let plan = plan_set(
            MetadataKind::Tags,
            &set(&["math", "easy"]),
            &set(&["easy", "hard", "restricted-system-tag"]),
            None,
        );
        assert_eq!(plan.to_add, vec!["math"]);
        assert_eq!(plan.to_remove, vec!["hard"]);
        assert_eq!(plan.suppressed, vec!["restricted-system-tag"]);
    }

    #[test]
    fn problem_restricted_tag_prefix_is_case_insensitive() {
        assert!(is_restricted_tag("problemRestrictedTagKarel"));
        assert!(is_restricted_tag("PROBLEMRESTRICTEDTAGOnly"));
        assert!(!is_restricted_tag("math"));
    }

    #[test]
    fn acting_user_is_never_touched() {
        let plan = plan_set(
            MetadataKind::Admins,
            &set(&["alice"]),
            &set(&["Deployer", "bob"]),
            Some("deployer"),
        );
        assert_eq!(plan.to_add, vec!["alice"]);
        assert_eq!(plan.to_remove, vec!["bob"]);
        assert_eq!(plan.suppressed, vec!["deployer"]);
    }

    #[test]
    fn acting_user_only_protected_in_admin_set() {
        let plan = plan_set(
            MetadataKind::AdminGroups,
            &set(&[]),
            &set(&["deployer"]),
            Some("deployer"),
        );
        assert_eq!(plan.to_remove, vec!["deployer"]);
    }

    fn arb_set() -> impl Strategy<Value = BTreeSet<String>> {
        prop::collection::btree_set("[a-e]{1,2}", 0..8)
    }

    proptest! {
        #[test]
        fn diff_is_minimal_and_converges(desired in arb_set(), observed in arb_set()) {
            let diff = diff_sets(&desired, &observed);

            let union = desired.union(&observed).count();
            let intersection = desired.intersection(&observed).count();
            prop_assert_eq!(diff.to_add.len() + diff.to_remove.len(), union - intersection);

            let mut converged = observed.clone();
            converged.extend(diff.to_add.iter().cloned());
            converged.retain(|item| !diff.to_remove.contains(item));
            prop_assert_eq!(converged, desired);
        }

        #[test]
        fn plan_only_drops_suppressed_items(desired in arb_set(), observed in arb_set()) {
            let diff = diff_sets(&desired, &observed);
            let plan = plan_set(MetadataKind::Admins, &desired, &observed, Some("a"));

            prop_assert_eq!(
                plan.to_add.len() + plan.to_remove.len() + plan.suppressed.len(),
                diff.to_add.len() + diff.to_remove.len()
            );
            prop_assert!(plan.to_add.iter().chain(&plan.to_remove).all(|item| item != "a"));
        }
    }
}
