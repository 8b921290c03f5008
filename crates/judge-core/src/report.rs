//! Per-run outcome tracking

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Succeeded,
    Skipped,
    Failed,
}

/// Outcome of one problem or course request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemOutcome {
    /// Problem path or `course/assignment/problem`
    pub item: String,
    pub status: ItemStatus,
    /// Repository-relative file the outcome points at, if any
    pub file: Option<String>,
    pub message: Option<String>,
}

/// Summary of a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub items: Vec<ItemOutcome>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn succeeded(&mut self, item: impl Into<String>) {
        self.push(item.into(), ItemStatus::Succeeded, None, None);
    }

    pub fn skipped(&mut self, item: impl Into<String>, reason: impl Into<String>) {
        self.push(item.into(), ItemStatus::Skipped, None, Some(reason.into()));
    }

    pub fn failed(&mut self, item: impl Into<String>, message: impl Into<String>) {
        self.push(item.into(), ItemStatus::Failed, None, Some(message.into()));
    }

    /// Record a failure attributed to `file`.
    pub fn failed_at(
        &mut self,
        item: impl Into<String>,
        file: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.push(
            item.into(),
            ItemStatus::Failed,
            Some(file.into()),
            Some(message.into()),
        );
    }

    fn push(
        &mut self,
        item: String,
        status: ItemStatus,
        file: Option<String>,
        message: Option<String>,
    ) {
        self.items.push(ItemOutcome {
            item,
            status,
            file,
            message,
        });
    }

    pub fn count(&self, status: ItemStatus) -> usize {
        self.items.iter().filter(|i| i.status == status).count()
    }

    pub fn has_failures(&self) -> bool {
        self.count(ItemStatus::Failed) > 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.items.iter().filter(|i| i.status == ItemStatus::Failed)
    }

    /// Append every outcome of `other`.
    pub fn extend(&mut self, other: RunReport) {
        self.items.extend(other.items);
    }
}
