//! Workflows that push local state to the judge or pull it back
//!
//! - [`UploadWorkflow`]: package, upload and reconcile selected problems
//! - [`CourseSyncWorkflow`]: apply pending course add/remove requests
//! - [`MirrorRebuild`]: re-download every allowed course from scratch

mod course;
mod mirror;
mod upload;

pub use course::CourseSyncWorkflow;
pub use mirror::{MirrorRebuild, mirror_problem, rewrite_mirror_settings, unpack_archive};
pub use upload::{UploadOptions, UploadWorkflow, build_payload, commit_message, deploy_commit};
