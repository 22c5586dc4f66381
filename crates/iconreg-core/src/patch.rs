//! Region-confined text mutations of the generated artifacts
//!
//! A [`TextPatchEngine`] opens the artifacts it needs, resolves each anchor
//! once, and applies inserts, deletes and renames to in-memory documents.
//! Nothing touches the disk until [`PatchPlan::apply`]; opening fails as a
//! whole if any artifact or anchor is missing, so a plan never writes a
//! subset of files because of a layout problem.

use crate::artifact::{self, ArtifactKind};
use crate::extract::RegistrationExtractor;
use crate::scanner::ResourceEntity;
use crate::settings::Settings;
use crate::{Error, Result};
use iconreg_blocks::{AnchorRegion, MatchStrategy, TextDocument};
use iconreg_fs::{NormalizedPath, PluginLayout, io};
use similar::TextDiff;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Outcome for one target in one artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryStatus {
    Inserted,
    /// An identical line was already in the region
    AlreadyPresent,
    Deleted(MatchStrategy),
    Renamed(MatchStrategy),
    /// The entry was left untouched; the rest of the batch continued
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryReport {
    pub artifact: ArtifactKind,
    pub target: String,
    pub status: EntryStatus,
}

impl EntryReport {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, EntryStatus::Failed(_))
    }
}

impl fmt::Display for EntryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            EntryStatus::Inserted => write!(f, "{}: inserted {}", self.artifact, self.target),
            EntryStatus::AlreadyPresent => {
                write!(f, "{}: {} already present", self.artifact, self.target)
            }
            EntryStatus::Deleted(strategy) => {
                write!(f, "{}: deleted {} ({strategy} match)", self.artifact, self.target)
            }
            EntryStatus::Renamed(strategy) => {
                write!(f, "{}: renamed {} ({strategy} match)", self.artifact, self.target)
            }
            EntryStatus::Failed(reason) => {
                write!(f, "{}: {} failed: {reason}", self.artifact, self.target)
            }
        }
    }
}

/// Before/after text of one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: NormalizedPath,
    pub before: String,
    pub after: String,
}

impl FileChange {
    pub fn is_changed(&self) -> bool {
        self.before != self.after
    }

    /// Unified diff of the change, empty when nothing changed.
    pub fn unified_diff(&self) -> String {
        if !self.is_changed() {
            return String::new();
        }
        let name = self.path.as_str();
        TextDiff::from_lines(&self.before, &self.after)
            .unified_diff()
            .context_radius(3)
            .header(&format!("a/{name}"), &format!("b/{name}"))
            .to_string()
    }
}

/// Diffs of a plan that has not been written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchPreview {
    pub diffs: Vec<(NormalizedPath, String)>,
}

impl PatchPreview {
    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }
}

impl fmt::Display for PatchPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (_, diff) in &self.diffs {
            write!(f, "{diff}")?;
        }
        Ok(())
    }
}

/// Pending file contents plus the per-entry report that produced them
#[derive(Debug, Clone, Default)]
pub struct PatchPlan {
    pub changes: Vec<FileChange>,
    pub entries: Vec<EntryReport>,
}

impl PatchPlan {
    pub fn changed_files(&self) -> Vec<&NormalizedPath> {
        self.changes
            .iter()
            .filter(|c| c.is_changed())
            .map(|c| &c.path)
            .collect()
    }

    pub fn is_noop(&self) -> bool {
        self.changes.iter().all(|c| !c.is_changed())
    }

    pub fn failures(&self) -> impl Iterator<Item = &EntryReport> {
        self.entries.iter().filter(|e| e.is_failure())
    }

    pub fn preview(&self) -> PatchPreview {
        PatchPreview {
            diffs: self
                .changes
                .iter()
                .filter(|c| c.is_changed())
                .map(|c| (c.path.clone(), c.unified_diff()))
                .collect(),
        }
    }

    /// Write every changed file whole. Returns the written paths.
    ///
    /// Files are written in order. A failure after the first write is
    /// [`Error::PartialApply`] naming the files already rewritten.
    pub fn apply(&self) -> Result<Vec<NormalizedPath>> {
        let mut written: Vec<NormalizedPath> = Vec::new();
        for change in self.changes.iter().filter(|c| c.is_changed()) {
            if let Err(e) = io::write_text(&change.path, &change.after) {
                if written.is_empty() {
                    return Err(e.into());
                }
                tracing::error!(path = %change.path, written = written.len(), "patch stopped part way");
                return Err(Error::PartialApply {
                    written: written.iter().map(|p| p.as_str().to_string()).collect(),
                    source: Box::new(e.into()),
                });
            }
            tracing::info!(path = %change.path, "patched artifact");
            written.push(change.path.clone());
        }
        Ok(written)
    }
}

struct WorkingFile {
    path: NormalizedPath,
    before: String,
    doc: TextDocument,
    region: AnchorRegion,
    /// Qualified names registered anywhere in the file at open time
    registered: BTreeSet<String>,
}

/// Applies inserts, deletes and renames inside anchor regions.
pub struct TextPatchEngine<'a> {
    settings: &'a Settings,
    files: BTreeMap<ArtifactKind, WorkingFile>,
}

impl<'a> TextPatchEngine<'a> {
    /// Read `kinds` and resolve their anchors.
    ///
    /// # Errors
    ///
    /// [`Error::ArtifactMissing`] or an anchor error for the first artifact
    /// that cannot be opened; no file is held open on failure.
    pub fn open(layout: &PluginLayout, settings: &'a Settings, kinds: &[ArtifactKind]) -> Result<Self> {
        let extractor = RegistrationExtractor::new();
        let mut files = BTreeMap::new();

        for &kind in kinds {
            let path = kind.path(layout);
            if !path.is_file() {
                return Err(Error::ArtifactMissing {
                    path: path.to_native(),
                });
            }
            let before = io::read_text(&path)?;
            let doc = TextDocument::parse(&before);
            let region = doc.locate(&kind.anchor(settings))?;
            let registered = extractor
                .extract(kind, &before)
                .into_iter()
                .map(|e| e.qualified_name)
                .collect();
            tracing::debug!(artifact = %kind, start = region.start, end = region.end, "resolved anchor");
            files.insert(
                kind,
                WorkingFile {
                    path,
                    before,
                    doc,
                    region,
                    registered,
                },
            );
        }

        Ok(Self { settings, files })
    }

    /// Append a registration line per missing resource to every open artifact.
    pub fn insert(&mut self, missing: &[ResourceEntity]) -> Vec<EntryReport> {
        let mut reports = Vec::new();

        for (&kind, file) in self.files.iter_mut() {
            for resource in missing {
                let line = kind.insert_line(self.settings, resource);
                let outcome = file.doc.insert_before_end(&mut file.region, [line]);
                let status = if outcome.is_noop() {
                    EntryStatus::AlreadyPresent
                } else {
                    EntryStatus::Inserted
                };
                reports.push(EntryReport {
                    artifact: kind,
                    target: self.settings.qualified_name(&resource.name),
                    status,
                });
            }
        }

        reports
    }

    /// Remove the line of each orphaned qualified name from every open
    /// artifact that registers it.
    pub fn delete(&mut self, orphaned: &[String]) -> Vec<EntryReport> {
        let mut reports = Vec::new();

        for (&kind, file) in self.files.iter_mut() {
            for qualified in orphaned {
                if !file.registered.contains(qualified) {
                    tracing::debug!(artifact = %kind, name = %qualified, "not registered here, nothing to delete");
                    continue;
                }
                let status = match Self::delete_one(kind, file, qualified) {
                    Ok(strategy) => EntryStatus::Deleted(strategy),
                    Err(e) => {
                        tracing::warn!(artifact = %kind, name = %qualified, error = %e, "delete skipped");
                        EntryStatus::Failed(e.to_string())
                    }
                };
                reports.push(EntryReport {
                    artifact: kind,
                    target: qualified.clone(),
                    status,
                });
            }
        }

        reports
    }

    fn delete_one(kind: ArtifactKind, file: &mut WorkingFile, qualified: &str) -> Result<MatchStrategy> {
        let matcher = kind.delete_matcher(qualified)?;
        let found = matcher.locate(&file.doc, &file.region)?;
        file.doc.remove_line(&mut file.region, found.index);
        Ok(found.strategy)
    }

    /// Change the friendly name of `qualified` from `old` to `new` in the
    /// icon registry. Exactly one line is rewritten, or none.
    pub fn rename(&mut self, qualified: &str, old: &str, new: &str) -> Result<EntryReport> {
        validate_friendly_name(new)?;
        let kind = ArtifactKind::IconRegistry;
        let file = self.files.get_mut(&kind).ok_or_else(|| Error::InvalidValue {
            field: "artifact".into(),
            message: "icon registry not opened for rename".into(),
        })?;

        let matcher = artifact::rename_matcher(qualified, old)?;
        let found = matcher.locate(&file.doc, &file.region)?;
        let line = file.doc.line(found.index).unwrap_or_default();
        let rewritten = artifact::rewrite_friendly_name(line, qualified, old, new).ok_or_else(|| {
            iconreg_blocks::Error::AnchorLineNotFound {
                target: matcher.target().to_string(),
            }
        })?;
        file.doc.replace_line(found.index, rewritten);

        Ok(EntryReport {
            artifact: kind,
            target: qualified.to_string(),
            status: EntryStatus::Renamed(found.strategy),
        })
    }

    /// Freeze the current documents into a plan.
    pub fn finish(self, entries: Vec<EntryReport>) -> PatchPlan {
        let changes = self
            .files
            .into_values()
            .map(|file| FileChange {
                path: file.path,
                after: file.doc.render(),
                before: file.before,
            })
            .collect();
        PatchPlan { changes, entries }
    }
}

fn validate_friendly_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidValue {
            field: "friendly name".into(),
            message: "must not be empty".into(),
        });
    }
    if name.contains(['"', '\n', '\r', '\\']) {
        return Err(Error::InvalidValue {
            field: "friendly name".into(),
            message: "quotes, backslashes and line breaks are not allowed".into(),
        });
    }
    Ok(())
}
