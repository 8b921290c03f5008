use std::collections::BTreeSet;

use judge_meta::Misc;

use super::{MetadataKind, SetPlan, normalize_set, plan_set};
use crate::platform::{JudgePlatform, PlatformError};

/// Locally declared metadata. `None` means the set is not governed and is
/// left untouched remotely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredMetadata {
    pub admins: Option<BTreeSet<String>>,
    pub admin_groups: Option<BTreeSet<String>>,
    pub tags: Option<BTreeSet<String>>,
}

impl DesiredMetadata {
    pub fn from_misc(misc: &Misc) -> Self {
        Self {
            admins: misc.admins.as_ref().map(|v| normalize_set(v)),
            admin_groups: misc.admin_groups.as_ref().map(|v| normalize_set(v)),
            tags: misc.tags.as_ref().map(|v| normalize_set(v)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.admins.is_none() && self.admin_groups.is_none() && self.tags.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileAction {
    Fetch,
    Add,
    Remove,
}

/// A remote call that failed during reconciliation
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileFailure {
    pub kind: MetadataKind,
    pub action: ReconcileAction,
    /// Empty for [`ReconcileAction::Fetch`]
    pub item: String,
    pub error: PlatformError,
}

/// Outcome of reconciling one problem
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    pub added: Vec<(MetadataKind, String)>,
    pub removed: Vec<(MetadataKind, String)>,
    pub suppressed: Vec<(MetadataKind, String)>,
    pub failures: Vec<ReconcileFailure>,
}

impl ReconcileReport {
    /// `false` when at least one call failed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Converges a problem's remote admins, admin groups and tags.
pub struct MetadataReconciler<'a, P: ?Sized> {
    platform: &'a P,
    acting_user: Option<String>,
}

impl<'a, P: JudgePlatform + ?Sized> MetadataReconciler<'a, P> {
    /// `acting_user` is protected from admin changes.
    pub fn new(platform: &'a P, acting_user: Option<&str>) -> Self {
        Self {
            platform,
            acting_user: acting_user.map(str::to_lowercase),
        }
    }

    /// Reconcile every governed set of `alias`.
    ///
    /// Adds run before removes within each set. A failing call is recorded
    /// and the remaining items are still processed.
    pub fn reconcile(&self, alias: &str, desired: &DesiredMetadata) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        if desired.admins.is_some() || desired.admin_groups.is_some() {
            match self.platform.problem_admins(alias) {
                Ok(observed) => {
                    if let Some(admins) = &desired.admins {
                        let observed = normalize_set(&observed.admins);
                        self.apply(alias, MetadataKind::Admins, admins, &observed, &mut report);
                    }
                    if let Some(groups) = &desired.admin_groups {
                        let observed = normalize_set(&observed.group_admins);
                        self.apply(alias, MetadataKind::AdminGroups, groups, &observed, &mut report);
                    }
                }
                Err(error) => {
                    tracing::error!(problem = %alias, error = %error, "Could not list problem admins");
                    for (kind, governed) in [
                        (MetadataKind::Admins, desired.admins.is_some()),
                        (MetadataKind::AdminGroups, desired.admin_groups.is_some()),
                    ] {
                        if governed {
                            report.failures.push(ReconcileFailure {
                                kind,
                                action: ReconcileAction::Fetch,
                                item: String::new(),
                                error: error.clone(),
                            });
                        }
                    }
                }
            }
        }

        if let Some(tags) = &desired.tags {
            match self.platform.problem_tags(alias) {
                Ok(observed) => {
                    let observed = normalize_set(&observed);
                    self.apply(alias, MetadataKind::Tags, tags, &observed, &mut report);
                }
                Err(error) => {
                    tracing::error!(problem = %alias, error = %error, "Could not list problem tags");
                    report.failures.push(ReconcileFailure {
                        kind: MetadataKind::Tags,
                        action: ReconcileAction::Fetch,
                        item: String::new(),
                        error,
                    });
                }
            }
        }

        report
    }

    fn apply(
        &self,
        alias: &str,
        kind: MetadataKind,
        desired: &BTreeSet<String>,
        observed: &BTreeSet<String>,
        report: &mut ReconcileReport,
    ) {
        let SetPlan {
            to_add,
            to_remove,
            suppressed,
        } = plan_set(kind, desired, observed, self.acting_user.as_deref());

        for item in suppressed {
            tracing::warn!(problem = %alias, kind = %kind, item = %item, "Skipping protected item");
            report.suppressed.push((kind, item));
        }

        for item in to_add {
            tracing::info!(problem = %alias, kind = %kind, item = %item, "Adding");
            let result = match kind {
                MetadataKind::Admins => self.platform.add_admin(alias, &item),
                MetadataKind::AdminGroups => self.platform.add_group_admin(alias, &item),
                MetadataKind::Tags => self.platform.add_tag(alias, &item, false),
            };
            self.record(alias, kind, ReconcileAction::Add, item, result, report);
        }

        for item in to_remove {
            tracing::info!(problem = %alias, kind = %kind, item = %item, "Removing");
            let result = match kind {
                MetadataKind::Admins => self.platform.remove_admin(alias, &item),
                MetadataKind::AdminGroups => self.platform.remove_group_admin(alias, &item),
                MetadataKind::Tags => self.platform.remove_tag(alias, &item),
            };
            self.record(alias, kind, ReconcileAction::Remove, item, result, report);
        }
    }

    fn record(
        &self,
        alias: &str,
        kind: MetadataKind,
        action: ReconcileAction,
        item: String,
        result: Result<(), PlatformError>,
        report: &mut ReconcileReport,
    ) {
        match (action, result) {
            (ReconcileAction::Add, Ok(()) | Err(PlatformError::AlreadyExists(_))) => {
                report.added.push((kind, item));
            }
            (ReconcileAction::Remove, Ok(()) | Err(PlatformError::NotFound(_))) => {
                report.removed.push((kind, item));
            }
            (_, Ok(())) => {}
            (action, Err(error)) => {
                tracing::error!(
                    problem = %alias, kind = %kind, item = %item, error = %error,
                    "Reconciliation call failed"
                );
                report.failures.push(ReconcileFailure {
                    kind,
                    action,
                    item,
                    error,
                });
            }
        }
    }
}
