//! Core orchestration layer for judge-sync
//!
//! Sits above the layer-0 crates and below the CLI:
//!
//! ```text
//!                 judge-cli
//!                     |
//!        judge-core ----- judge-client (implements JudgePlatform)
//!                     |
//!     +---------------+---------------+
//!     |               |               |
//! judge-fs        judge-git       judge-meta
//! ```
//!
//! - [`ManifestStore`]: checkpointed `problems.json`
//! - [`ChangeSetSelector`]: which problems a run touches
//! - [`archive`]: deterministic problem packaging
//! - [`reconcile`]: admin, group and tag convergence
//! - [`sync`]: upload, course request and mirror workflows

pub mod archive;
pub mod config;
pub mod error;
pub mod fakes;
pub mod manifest;
pub mod pending;
pub mod platform;
pub mod reconcile;
pub mod report;
pub mod selector;
pub mod sync;

pub use archive::{ArchiveMember, ProblemArchive, build_archive, plan_archive};
pub use config::SyncConfig;
pub use error::{Error, Result};
pub use manifest::{ManifestEntry, ManifestStore};
pub use pending::{PendingItem, PendingRequests};
pub use platform::{JudgePlatform, PlatformError, PlatformResult};
pub use reconcile::{DesiredMetadata, MetadataReconciler, ReconcileReport};
pub use report::{ItemOutcome, ItemStatus, RunReport};
pub use selector::{ChangeSetSelector, ChangeSource, GitChangeSource, SelectMode, Selection};
pub use sync::{CourseSyncWorkflow, MirrorRebuild, UploadOptions, UploadWorkflow};
