//! ArchiveBuilder: deterministic problem packaging
//!
//! Packaging is split in two steps. [`plan_archive`] turns a problem
//! directory into an ordered list of members; [`build_archive`] writes that
//! list into a zip with fixed timestamps and permissions, so an unchanged
//! directory always yields the same bytes.

use std::fs;
use std::io::{Cursor, Write};

use judge_fs::NormalizedPath;
use judge_fs::checksum::compute_checksum;
use judge_meta::Problem;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::{Error, Result};

pub const TESTPLAN_FILE: &str = "testplan";
pub const VALIDATOR_PREFIX: &str = "validator";
/// Always packaged
pub const REQUIRED_DIRS: [&str; 3] = ["statements", "solutions", "cases"];
/// Packaged only when present
pub const OPTIONAL_DIRS: [&str; 2] = ["examples", "interactive"];

/// A file scheduled for the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveMember {
    /// Path inside the archive, relative to the problem root
    pub name: String,
    /// File on disk
    pub source: NormalizedPath,
}

/// A built archive
#[derive(Debug, Clone)]
pub struct ProblemArchive {
    pub bytes: Vec<u8>,
    pub members: Vec<String>,
}

impl ProblemArchive {
    /// `sha256:<hex>` digest of the archive bytes.
    pub fn checksum(&self) -> String {
        compute_checksum(&self.bytes)
    }
}

/// List the files to package for `problem` rooted at `dir`.
///
/// Order: the test plan, the custom validator, then `statements`,
/// `solutions`, `cases`, `examples`, `interactive`; files inside each
/// directory sorted by path. Symlinked files are packaged with the content
/// they point at; an absent directory contributes nothing.
///
/// # Errors
///
/// - [`Error::Validator`] when the problem declares a custom validator and
///   the problem root holds zero or several `validator*` files
/// - [`Error::Archive`] when a directory entry cannot be read, including
///   dangling symlinks
pub fn plan_archive(problem: &Problem, dir: &NormalizedPath) -> Result<Vec<ArchiveMember>> {
    let mut members = Vec::new();

    let testplan = dir.join(TESTPLAN_FILE);
    if testplan.is_file() {
        members.push(ArchiveMember {
            name: TESTPLAN_FILE.to_string(),
            source: testplan,
        });
    }

    if problem.settings.has_custom_validator() {
        let validator = find_validator(problem, dir)?;
        members.push(ArchiveMember {
            source: dir.join(&validator),
            name: validator,
        });
    }

    for sub in REQUIRED_DIRS.iter().chain(&OPTIONAL_DIRS) {
        members.extend(walk(problem, dir, sub)?);
    }

    Ok(members)
}

/// Package `problem` into a zip.
pub fn build_archive(problem: &Problem, dir: &NormalizedPath) -> Result<ProblemArchive> {
    let members = plan_archive(problem, dir)?;
    let archive_err = |message: String| Error::Archive {
        problem: problem.alias.clone(),
        message,
    };

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644);

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for member in &members {
        tracing::debug!(problem = %problem.alias, member = %member.name, "Writing archive member");
        let content = fs::read(member.source.to_native())
            .map_err(|e| judge_fs::Error::io(member.source.to_native(), e))?;
        writer
            .start_file(member.name.as_str(), options)
            .map_err(|e| archive_err(e.to_string()))?;
        writer.write_all(&content)?;
    }
    let bytes = writer
        .finish()
        .map_err(|e| archive_err(e.to_string()))?
        .into_inner();

    Ok(ProblemArchive {
        bytes,
        members: members.into_iter().map(|m| m.name).collect(),
    })
}

fn find_validator(problem: &Problem, dir: &NormalizedPath) -> Result<String> {
    let entries = fs::read_dir(dir.to_native())
        .map_err(|e| judge_fs::Error::io(dir.to_native(), e))?;

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| entry_error(problem, e.to_string()))?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if !name.starts_with(VALIDATOR_PREFIX) {
            continue;
        }
        // `metadata` follows symlinks
        let metadata = fs::metadata(entry.path())
            .map_err(|e| entry_error(problem, format!("{name}: {e}")))?;
        if metadata.is_file() {
            found.push(name);
        }
    }
    found.sort();

    match found.as_slice() {
        [single] => Ok(single.clone()),
        _ => Err(Error::Validator {
            problem: problem.alias.clone(),
            found,
        }),
    }
}

fn walk(problem: &Problem, root: &NormalizedPath, sub: &str) -> Result<Vec<ArchiveMember>> {
    let base = root.join(sub);
    if !base.is_dir() {
        return Ok(Vec::new());
    }

    let mut members = Vec::new();
    for entry in WalkDir::new(base.to_native())
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| entry_error(problem, e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let source = NormalizedPath::new(entry.path());
        if let Some(name) = source.relative_to(root) {
            members.push(ArchiveMember { name, source });
        }
    }
    Ok(members)
}

fn entry_error(problem: &Problem, message: String) -> Error {
    Error::Archive {
        problem: problem.alias.clone(),
        message,
    }
}
