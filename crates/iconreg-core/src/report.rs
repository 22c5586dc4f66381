//! Plain-text registration status report

use crate::scanner::ResourceEntity;
use crate::session::SessionState;
use crate::settings::Settings;
use chrono::{DateTime, Utc};
use iconreg_fs::PluginLayout;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Registration state of one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryState {
    Registered,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub name: String,
    pub qualified_name: String,
    pub friendly_name: Option<String>,
    pub state: EntryState,
}

/// Snapshot of the session for humans (`render`) or tools (serde)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub generated: DateTime<Utc>,
    pub plugin_root: String,
    pub project_root: Option<String>,
    pub resources: Vec<ResourceEntity>,
    pub registered: usize,
    pub entries: Vec<ReportEntry>,
    pub orphaned: Vec<String>,
    pub warnings: Vec<String>,
}

impl Report {
    pub fn build(layout: &PluginLayout, settings: &Settings, state: &SessionState) -> Self {
        let reconciliation = state.reconcile(settings);
        let friendly = state.registrations.friendly_names();

        let mut resources = state.resources.clone();
        resources.sort_by(|a, b| a.name.cmp(&b.name).then(a.origin.cmp(&b.origin)));

        let entries = resources
            .iter()
            .map(|resource| {
                let qualified_name = settings.qualified_name(&resource.name);
                let state = if reconciliation.missing.iter().any(|m| m.name == resource.name) {
                    EntryState::Missing
                } else {
                    EntryState::Registered
                };
                ReportEntry {
                    name: resource.name.clone(),
                    friendly_name: friendly.get(&qualified_name).cloned(),
                    qualified_name,
                    state,
                }
            })
            .collect();

        Self {
            generated: Utc::now(),
            plugin_root: layout.root().to_string(),
            project_root: layout.project_root().map(|p| p.to_string()),
            resources,
            registered: state.registrations.len(),
            entries,
            orphaned: reconciliation.orphaned,
            warnings: state.warnings.clone(),
        }
    }

    pub fn missing_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.state == EntryState::Missing)
            .count()
    }

    /// `Report_<timestamp>.txt`
    pub fn file_name(&self) -> String {
        format!("Report_{}.txt", self.generated.format("%Y%m%d_%H%M%S"))
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // writing to a String cannot fail
        let _ = self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "Icon Registration Report")?;
        writeln!(out, "{}", "=".repeat(50))?;
        writeln!(out, "Generated: {}", self.generated.format("%Y-%m-%d %H:%M:%S UTC"))?;
        writeln!(out, "Plugin: {}", self.plugin_root)?;
        writeln!(
            out,
            "Project: {}",
            self.project_root.as_deref().unwrap_or("(none)")
        )?;
        writeln!(out)?;

        writeln!(out, "Resources:")?;
        writeln!(out, "  Total: {}", self.resources.len())?;
        for resource in &self.resources {
            writeln!(
                out,
                "    - {} ({}): {}",
                resource.name, resource.origin, resource.path
            )?;
        }
        writeln!(out)?;

        writeln!(out, "Registration:")?;
        writeln!(out, "  Registered: {}", self.registered)?;
        writeln!(out, "  Missing: {}", self.missing_count())?;
        writeln!(out, "  Orphaned: {}", self.orphaned.len())?;
        writeln!(out)?;

        writeln!(out, "Details:")?;
        for entry in &self.entries {
            let tag = match entry.state {
                EntryState::Registered => "OK",
                EntryState::Missing => "MISSING",
            };
            match &entry.friendly_name {
                Some(friendly) => writeln!(
                    out,
                    "  [{tag}] {} (friendly: {friendly})",
                    entry.qualified_name
                )?,
                None => writeln!(out, "  [{tag}] {}", entry.qualified_name)?,
            }
        }
        for name in &self.orphaned {
            writeln!(out, "  [ORPHANED] {name}")?;
        }

        if !self.warnings.is_empty() {
            writeln!(out)?;
            writeln!(out, "Warnings:")?;
            for warning in &self.warnings {
                writeln!(out, "  - {warning}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::ArtifactKind;
    use crate::extract::{RegisteredEntry, Registrations};
    use crate::scanner::Origin;
    use iconreg_fs::NormalizedPath;
    use std::time::SystemTime;

    fn state() -> SessionState {
        SessionState {
            resources: vec![
                ResourceEntity {
                    name: "b".into(),
                    path: NormalizedPath::new("/p/Resources/b.svg"),
                    origin: Origin::Plugin,
                },
                ResourceEntity {
                    name: "a".into(),
                    path: NormalizedPath::new("/p/Resources/a.svg"),
                    origin: Origin::Plugin,
                },
            ],
            registrations: Registrations {
                entries: vec![
                    RegisteredEntry {
                        qualified_name: "UtilityExtend.a".into(),
                        friendly_name: Some("Alpha".into()),
                        source: ArtifactKind::IconRegistry,
                    },
                    RegisteredEntry {
                        qualified_name: "UtilityExtend.old".into(),
                        friendly_name: None,
                        source: ArtifactKind::StyleMapping,
                    },
                ],
            },
            buttons: Vec::new(),
            warnings: vec!["Directory not found: /q".into()],
            scanned_at: SystemTime::now(),
        }
    }

    #[test]
    fn test_report_counts_and_details() {
        let layout = PluginLayout::new(NormalizedPath::new("/p"), "UtilityExtend");
        let report = Report::build(&layout, &Settings::default(), &state());
        let text = report.render();

        assert_eq!(report.registered, 2);
        assert_eq!(report.missing_count(), 1);
        assert!(text.contains("  Total: 2"));
        assert!(text.contains("  [OK] UtilityExtend.a (friendly: Alpha)"));
        assert!(text.contains("  [MISSING] UtilityExtend.b"));
        assert!(text.contains("  [ORPHANED] UtilityExtend.old"));
        assert!(text.contains("Project: (none)"));
        assert!(text.contains("Warnings:"));
        assert!(report.file_name().starts_with("Report_"));
    }
}
