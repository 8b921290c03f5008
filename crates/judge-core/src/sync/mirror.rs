use std::fs;
use std::io::{self, Cursor};
use std::path::Path;

use judge_fs::{ConfigStore, NormalizedPath, io::remove_dir_if_exists, sanitize_alias};
use judge_meta::SETTINGS_JSON;
use serde_json::Value;
use zip::ZipArchive;

use crate::config::SyncConfig;
use crate::manifest::{ManifestEntry, ManifestStore};
use crate::platform::JudgePlatform;
use crate::report::RunReport;
use crate::{Error, Result};

/// Name of the per-course details file in the mirror
pub const COURSE_SETTINGS_JSON: &str = "course_settings.json";

/// Keys of the course details that are not mirrored
const COURSE_VOLATILE_KEYS: [&str; 2] = ["assignments", "clarifications"];

/// Extract a zip archive into `dest`, returning the number of files.
///
/// Entries whose names would escape `dest` are skipped.
pub fn unpack_archive(bytes: &[u8], dest: &NormalizedPath, problem: &str) -> Result<usize> {
    let archive_err = |e: zip::result::ZipError| Error::Archive {
        problem: problem.to_string(),
        message: e.to_string(),
    };
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(archive_err)?;
    let dest = dest.to_native();
    let mut files = 0;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(archive_err)?;
        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!(problem = %problem, entry = %entry.name(), "Skipping unsafe archive entry");
            continue;
        };
        let target = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = fs::File::create(&target)?;
        io::copy(&mut entry, &mut out)?;
        files += 1;
    }

    Ok(files)
}

/// Point the mirrored `settings.json` at `alias`.
///
/// Overwrites `alias` and `title`; a missing or unparseable file is only a
/// warning. Returns whether the file was rewritten.
pub fn rewrite_mirror_settings(dir: &NormalizedPath, alias: &str) -> Result<bool> {
    let path = dir.join(SETTINGS_JSON);
    let store = ConfigStore::new();
    let mut settings: Value = match store.load_optional(&path) {
        Ok(Some(settings)) => settings,
        Ok(None) => {
            tracing::warn!(problem = %alias, "No settings.json in downloaded archive");
            return Ok(false);
        }
        Err(e @ judge_fs::Error::ConfigParse { .. }) => {
            tracing::warn!(problem = %alias, error = %e, "Could not update settings.json");
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };

    let Some(object) = settings.as_object_mut() else {
        tracing::warn!(problem = %alias, "settings.json is not an object, leaving it untouched");
        return Ok(false);
    };
    object.insert("alias".into(), Value::String(alias.to_string()));
    object.insert("title".into(), Value::String(alias.to_string()));
    store.save(&path, &settings)?;
    tracing::debug!(problem = %alias, "Updated settings.json alias");
    Ok(true)
}

/// Download `alias` and install it at `dest`.
///
/// The archive is extracted into a staging directory beside `dest` and
/// renamed into place, replacing any previous mirror. On failure `dest`
/// keeps its previous content and the staging directory is removed.
pub fn mirror_problem<P: JudgePlatform + ?Sized>(
    platform: &P,
    alias: &str,
    dest: &NormalizedPath,
) -> Result<()> {
    let bytes = platform.download_problem(alias)?;

    let parent = dest
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "mirror path has no parent"))?;
    fs::create_dir_all(parent.to_native())?;

    let staging = tempfile::Builder::new()
        .prefix(".staging-")
        .tempdir_in(parent.to_native())?;
    let staging_path = NormalizedPath::new(staging.path());

    let files = unpack_archive(&bytes, &staging_path, alias)?;
    rewrite_mirror_settings(&staging_path, alias)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Staging directories are created owner-only.
        fs::set_permissions(staging.path(), fs::Permissions::from_mode(0o755))?;
    }

    replace_dir(staging.path(), dest)?;
    tracing::info!(problem = %alias, dest = %dest.as_str(), files, "Extracted problem");
    Ok(())
}

/// Move `staging` to `dest`, replacing any previous directory there.
///
/// The previous directory is moved aside first and put back if the final
/// rename fails.
fn replace_dir(staging: &Path, dest: &NormalizedPath) -> Result<()> {
    let dest_native = dest.to_native();
    if !dest.exists() {
        fs::rename(staging, &dest_native)?;
        return Ok(());
    }

    let parent = dest
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "mirror path has no parent"))?;
    let aside = tempfile::Builder::new()
        .prefix(".previous-")
        .tempdir_in(parent.to_native())?;
    let previous = aside.path().join("mirror");
    fs::rename(&dest_native, &previous)?;

    if let Err(e) = fs::rename(staging, &dest_native) {
        tracing::error!(dest = %dest.as_str(), error = %e, "Could not install mirror, restoring previous copy");
        fs::rename(&previous, &dest_native)?;
        return Err(e.into());
    }
    Ok(())
}

/// Rebuilds the whole mirror tree and manifest from the judge.
pub struct MirrorRebuild<'a, P: ?Sized> {
    platform: &'a P,
    config: &'a SyncConfig,
    root: &'a NormalizedPath,
}

impl<'a, P: JudgePlatform + ?Sized> MirrorRebuild<'a, P> {
    pub fn new(platform: &'a P, config: &'a SyncConfig, root: &'a NormalizedPath) -> Self {
        Self {
            platform,
            config,
            root,
        }
    }

    /// Delete the mirror, download every allowed course again and replace
    /// the manifest with the problems that were mirrored.
    ///
    /// # Errors
    ///
    /// Fatal only when the existing manifest is malformed or the mirror or
    /// manifest cannot be written; course and problem failures are
    /// reported per item.
    pub fn run(&self) -> Result<RunReport> {
        let mut manifest = ManifestStore::load(self.config.manifest_path(self.root))?;
        let mirror_root = self.config.mirror_root(self.root);

        if self.config.courses.mirror_dir.trim_matches('/').is_empty() {
            for course in &self.config.courses.allowed {
                remove_dir_if_exists(&mirror_root.join(&sanitize_alias(course)))?;
            }
        } else if remove_dir_if_exists(&mirror_root)? {
            tracing::warn!(path = %mirror_root.as_str(), "Deleted existing mirror directory");
        }
        fs::create_dir_all(mirror_root.to_native())?;

        let mut report = RunReport::new();
        let mut entries = Vec::new();

        for course in &self.config.courses.allowed {
            tracing::info!(course = %course, "Mirroring course");
            if let Err(e) = self.mirror_course(course, &mirror_root, &manifest, &mut entries, &mut report) {
                tracing::error!(course = %course, error = %e, "Failed to mirror course");
                report.failed(course.as_str(), e.to_string());
            }
        }

        manifest.replace(entries);
        manifest.save()?;
        tracing::info!(count = manifest.entries().len(), "Wrote manifest");
        Ok(report)
    }

    fn mirror_course(
        &self,
        course: &str,
        mirror_root: &NormalizedPath,
        previous: &ManifestStore,
        entries: &mut Vec<ManifestEntry>,
        report: &mut RunReport,
    ) -> Result<()> {
        let mut details = self.platform.course_details(course)?;
        for key in COURSE_VOLATILE_KEYS {
            details.remove(key);
        }
        let course_dir = mirror_root.join(&sanitize_alias(course));
        ConfigStore::new().save(&course_dir.join(COURSE_SETTINGS_JSON), &details)?;

        let assignments = self.platform.list_assignments(course)?;
        if assignments.is_empty() {
            tracing::warn!(course = %course, "No assignments found");
            return Ok(());
        }

        for assignment in assignments {
            tracing::info!(course = %course, assignment = %assignment.alias, name = %assignment.name, "Processing assignment");
            let problems = match self.platform.assignment_problems(course, &assignment.alias) {
                Ok(problems) => problems,
                Err(e) => {
                    tracing::error!(course = %course, assignment = %assignment.alias, error = %e, "Failed to list assignment problems");
                    report.failed(format!("{course}/{}", assignment.alias), e.to_string());
                    continue;
                }
            };

            for problem in problems {
                let path = self.config.mirror_path(course, &assignment.alias, &problem);
                let item = format!("{course}/{}/{problem}", assignment.alias);
                match mirror_problem(self.platform, &problem, &self.root.join(&path)) {
                    Ok(()) => {
                        let mut entry = ManifestEntry::new(&path);
                        entry.disabled = previous.get(&path).is_some_and(|e| e.disabled);
                        entries.push(entry);
                        report.succeeded(item);
                    }
                    Err(e) => {
                        tracing::warn!(problem = %problem, error = %e, "Skipped problem, download failed");
                        report.failed(item, e.to_string());
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_install_restores_previous_directory() {
        let dir = tempfile::tempdir().unwrap();
        let dest = NormalizedPath::new(dir.path().join("sumas"));
        fs::create_dir_all(dest.join("cases").to_native()).unwrap();
        fs::write(dest.join("cases/1.in").to_native(), "old\n").unwrap();

        let missing_staging = dir.path().join(".staging-gone");
        assert!(replace_dir(&missing_staging, &dest).is_err());

        assert_eq!(
            fs::read_to_string(dest.join("cases/1.in").to_native()).unwrap(),
            "old\n"
        );
    }

    #[test]
    fn install_into_empty_slot_moves_staging() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join(".staging-x");
        fs::create_dir_all(&staging).unwrap();
        fs::write(staging.join("settings.json"), "{}").unwrap();
        let dest = NormalizedPath::new(dir.path().join("sumas"));

        replace_dir(&staging, &dest).unwrap();

        assert!(dest.join(SETTINGS_JSON).is_file());
        assert!(!staging.exists());
    }
}
