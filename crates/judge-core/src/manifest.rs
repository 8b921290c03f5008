//! ManifestStore: the durable `problems.json` index
//!
//! The manifest lists every problem the repository declares:
//!
//! ```json
//! { "problems": [ { "path": "Courses/curso-publico/semana-1/sumas" } ] }
//! ```
//!
//! Mutations only touch the in-memory copy. Callers checkpoint with
//! [`ManifestStore::save`]; until then the file keeps its last-saved state.

use judge_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// One manifest entry. Unknown keys survive a load/save cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ManifestEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: None,
            disabled: false,
            extra: Map::new(),
        }
    }

    /// Title for log messages: the declared title, else the path.
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.path)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ManifestDocument {
    #[serde(default)]
    problems: Vec<ManifestEntry>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Checkpointed view of the manifest file
#[derive(Debug, Clone)]
pub struct ManifestStore {
    path: NormalizedPath,
    entries: Vec<ManifestEntry>,
    extra: Map<String, Value>,
}

impl ManifestStore {
    /// Load the manifest at `path`.
    ///
    /// A missing file yields an empty manifest.
    ///
    /// # Errors
    ///
    /// [`Error::ManifestMalformed`] if the file exists but cannot be parsed.
    pub fn load(path: NormalizedPath) -> Result<Self> {
        let document: Option<ManifestDocument> = match ConfigStore::new().load_optional(&path) {
            Ok(document) => document,
            Err(judge_fs::Error::ConfigParse { message, .. }) => {
                return Err(Error::ManifestMalformed {
                    path: path.to_native(),
                    message,
                });
            }
            Err(e) => return Err(e.into()),
        };

        let document = document.unwrap_or_else(|| {
            tracing::debug!(path = %path.as_str(), "No manifest yet, starting empty");
            ManifestDocument::default()
        });

        Ok(Self {
            path,
            entries: document.problems,
            extra: document.extra,
        })
    }

    /// Load the manifest at `path`, which must exist.
    ///
    /// Used where the manifest is the only source of problems to process.
    ///
    /// # Errors
    ///
    /// [`Error::ManifestNotFound`] if the file is absent, otherwise as
    /// [`ManifestStore::load`].
    pub fn load_required(path: NormalizedPath) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ManifestNotFound {
                path: path.to_native(),
            });
        }
        Self::load(path)
    }

    /// An empty store that will be written to `path` on save.
    pub fn empty(path: NormalizedPath) -> Self {
        Self {
            path,
            entries: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Entries not flagged `disabled`, in manifest order.
    pub fn enabled(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.iter().filter(|e| !e.disabled)
    }

    pub fn get(&self, path: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Append `entry` unless its path is already listed.
    ///
    /// Returns `true` if the entry was appended.
    pub fn add(&mut self, entry: ManifestEntry) -> bool {
        if self.contains(&entry.path) {
            return false;
        }
        tracing::debug!(path = %entry.path, "Manifest entry added");
        self.entries.push(entry);
        true
    }

    /// Remove every entry with `path`.
    ///
    /// Returns `true` if anything was removed.
    pub fn remove(&mut self, path: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.path != path);
        let removed = self.entries.len() != before;
        if removed {
            tracing::debug!(path = %path, "Manifest entry removed");
        }
        removed
    }

    /// Replace every entry at once.
    pub fn replace(&mut self, entries: Vec<ManifestEntry>) {
        self.entries = entries;
    }

    /// Persist the current entries atomically.
    pub fn save(&self) -> Result<()> {
        let document = ManifestDocument {
            problems: self.entries.clone(),
            extra: self.extra.clone(),
        };
        ConfigStore::new().save(&self.path, &document)?;
        tracing::debug!(path = %self.path.as_str(), count = self.entries.len(), "Manifest saved");
        Ok(())
    }
}
