//! Registration extraction from generated artifacts
//!
//! Reading builds the full registered-name set from the whole file; only
//! the anchor region is considered when listing *editable* entries.

use crate::Result;
use crate::artifact::{ArtifactKind, MAPPING_RE, REGISTRY_RE, is_comment};
use iconreg_blocks::{AnchorSpec, TextDocument};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// One registration found in an artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredEntry {
    pub qualified_name: String,
    /// Display label; only registry entries carry one
    pub friendly_name: Option<String>,
    pub source: ArtifactKind,
}

/// All registrations read from both artifacts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registrations {
    pub entries: Vec<RegisteredEntry>,
}

impl Registrations {
    /// Union of qualified names across both artifacts.
    pub fn names(&self) -> BTreeSet<String> {
        self.entries
            .iter()
            .map(|e| e.qualified_name.clone())
            .collect()
    }

    /// Qualified name to friendly name, from registry entries.
    pub fn friendly_names(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .filter_map(|e| {
                e.friendly_name
                    .as_ref()
                    .map(|f| (e.qualified_name.clone(), f.clone()))
            })
            .collect()
    }

    pub fn friendly_name(&self, qualified: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.qualified_name == qualified && e.friendly_name.is_some())
            .and_then(|e| e.friendly_name.as_deref())
    }

    pub fn contains(&self, qualified: &str) -> bool {
        self.entries.iter().any(|e| e.qualified_name == qualified)
    }

    pub fn in_artifact(&self, kind: ArtifactKind) -> impl Iterator<Item = &RegisteredEntry> {
        self.entries.iter().filter(move |e| e.source == kind)
    }

    pub fn len(&self) -> usize {
        self.names().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses registration lines out of artifact text.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrationExtractor;

impl RegistrationExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Entries of one artifact found in `lines`, first occurrence wins.
    fn extract_lines<'a, I>(&self, kind: ArtifactKind, lines: I) -> Vec<RegisteredEntry>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for line in lines {
            if is_comment(line) {
                continue;
            }
            let entry = match kind {
                ArtifactKind::StyleMapping => MAPPING_RE.captures(line).map(|caps| RegisteredEntry {
                    qualified_name: caps[1].to_string(),
                    friendly_name: None,
                    source: kind,
                }),
                ArtifactKind::IconRegistry => {
                    REGISTRY_RE.captures(line).map(|caps| RegisteredEntry {
                        qualified_name: caps[1].to_string(),
                        friendly_name: Some(caps[2].to_string()),
                        source: kind,
                    })
                }
            };
            let Some(entry) = entry else { continue };
            if !seen.insert(entry.qualified_name.clone()) {
                tracing::warn!(artifact = %kind, name = %entry.qualified_name, "duplicate registration ignored");
                continue;
            }
            entries.push(entry);
        }

        entries
    }

    /// Every registration in `text`, anchors ignored.
    pub fn extract(&self, kind: ArtifactKind, text: &str) -> Vec<RegisteredEntry> {
        self.extract_lines(kind, text.lines())
    }

    /// Only the registrations inside `anchor`.
    pub fn extract_editable(
        &self,
        kind: ArtifactKind,
        text: &str,
        anchor: &AnchorSpec,
    ) -> Result<Vec<RegisteredEntry>> {
        let doc = TextDocument::parse(text);
        let region = doc.locate(anchor)?;
        Ok(self.extract_lines(
            kind,
            doc.region_lines(&region).iter().map(String::as_str),
        ))
    }

    /// Combine both artifacts. A `None` text contributes nothing.
    pub fn extract_all(&self, style: Option<&str>, registry: Option<&str>) -> Registrations {
        let mut entries = Vec::new();
        if let Some(text) = style {
            entries.extend(self.extract(ArtifactKind::StyleMapping, text));
        }
        if let Some(text) = registry {
            entries.extend(self.extract(ArtifactKind::IconRegistry, text));
        }
        Registrations { entries }
    }
}
