//! Session state: one consistent view of resources and registrations
//!
//! A [`SessionState`] is captured fresh on every rescan and never updated in
//! place. [`Session::refresh`] swaps in a new state only when the capture
//! succeeded, so readers never observe a half-built view.

use crate::artifact::ArtifactKind;
use crate::buttons::{ButtonConfig, ConfigModel, ConfigScope};
use crate::extract::{RegistrationExtractor, Registrations};
use crate::reconcile::{Reconciliation, ReconciliationEngine};
use crate::scanner::{Origin, ResourceEntity, ResourceScanner};
use crate::settings::Settings;
use crate::{Error, Result};
use iconreg_fs::{NormalizedPath, PluginLayout, io};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

/// Mutual exclusion over session state and the target files.
///
/// Held by every mutation and by every monitor poll.
#[derive(Debug, Clone, Default)]
pub struct SessionLock(Arc<Mutex<()>>);

impl SessionLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock. A poisoned lock is recovered: it guards no data.
    pub fn acquire(&self) -> MutexGuard<'_, ()> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Resource directories to scan, in origin order.
pub fn resource_sources(layout: &PluginLayout, settings: &Settings) -> Vec<(NormalizedPath, Origin)> {
    let mut sources = vec![(layout.resolve(&settings.resources_dir), Origin::Plugin)];
    if let Some(dir) = &settings.project_resources_dir
        && let Some(path) = layout.resolve_in_project(dir)
    {
        sources.push((path, Origin::Project));
    }
    sources
}

/// Everything one reconciliation cycle needs
#[derive(Debug, Clone)]
pub struct SessionState {
    pub resources: Vec<ResourceEntity>,
    pub registrations: Registrations,
    pub buttons: Vec<ButtonConfig>,
    /// Degradations met while capturing (missing directories, artifacts)
    pub warnings: Vec<String>,
    pub scanned_at: SystemTime,
}

impl SessionState {
    /// Scan resources and read artifacts.
    ///
    /// Missing directories and artifacts degrade to empty sets with a
    /// warning. Other I/O failures abort the capture.
    pub fn capture(layout: &PluginLayout, settings: &Settings) -> Result<Self> {
        let scanned_at = SystemTime::now();
        let scanner = ResourceScanner::new(&settings.icon_extension);
        let (resources, mut warnings) = scanner.scan_all(&resource_sources(layout, settings));

        let style = read_artifact(&ArtifactKind::StyleMapping.path(layout), &mut warnings)?;
        let registry = read_artifact(&ArtifactKind::IconRegistry.path(layout), &mut warnings)?;
        let registrations =
            RegistrationExtractor::new().extract_all(style.as_deref(), registry.as_deref());

        let mut buttons = Vec::new();
        for scope in ConfigScope::ALL {
            let Some(path) = scope.path(layout) else {
                continue;
            };
            if !path.is_file() {
                continue;
            }
            let model = ConfigModel::new(scope, &settings.plugin_name, path.to_native());
            match model.parse(&io::read_text(&path)?) {
                Ok(found) => buttons.extend(found),
                Err(e) => {
                    tracing::warn!(error = %e, "button config skipped");
                    warnings.push(e.to_string());
                }
            }
        }

        tracing::debug!(
            resources = resources.len(),
            registered = registrations.len(),
            buttons = buttons.len(),
            "captured session state"
        );

        Ok(Self {
            resources,
            registrations,
            buttons,
            warnings,
            scanned_at,
        })
    }

    pub fn reconcile(&self, settings: &Settings) -> Reconciliation {
        ReconciliationEngine::new(&settings.plugin_name)
            .reconcile(&self.resources, &self.registrations.names())
    }

    pub fn buttons_in(&self, scope: ConfigScope) -> impl Iterator<Item = &ButtonConfig> {
        self.buttons.iter().filter(move |b| b.scope == scope)
    }
}

fn read_artifact(path: &NormalizedPath, warnings: &mut Vec<String>) -> Result<Option<String>> {
    if !path.is_file() {
        let e = Error::ArtifactMissing {
            path: path.to_native(),
        };
        tracing::warn!(error = %e, "artifact skipped");
        warnings.push(e.to_string());
        return Ok(None);
    }
    Ok(Some(io::read_text(path)?))
}

/// Holder of the current state across rescans
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
}

impl Session {
    pub fn start(layout: &PluginLayout, settings: &Settings) -> Result<Self> {
        Ok(Self {
            state: SessionState::capture(layout, settings)?,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Rescan; the previous state is kept if the capture fails.
    pub fn refresh(&mut self, layout: &PluginLayout, settings: &Settings) -> Result<&SessionState> {
        let fresh = SessionState::capture(layout, settings)?;
        self.state = fresh;
        Ok(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_capture_degrades_on_empty_plugin() {
        let temp = TempDir::new().unwrap();
        let layout = PluginLayout::new(NormalizedPath::new(temp.path()), "NS");

        let state = SessionState::capture(&layout, &Settings::default()).unwrap();

        assert!(state.resources.is_empty());
        assert!(state.registrations.is_empty());
        // resources dir + two artifacts
        assert_eq!(state.warnings.len(), 3);
    }

    #[test]
    fn test_refresh_replaces_state() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("Resources")).unwrap();
        let layout = PluginLayout::new(NormalizedPath::new(temp.path()), "NS");
        let settings = Settings::default();
        let mut session = Session::start(&layout, &settings).unwrap();
        assert!(session.state().resources.is_empty());

        fs::write(temp.path().join("Resources/a.svg"), "<svg/>").unwrap();
        let state = session.refresh(&layout, &settings).unwrap();

        assert_eq!(state.resources.len(), 1);
        assert_eq!(session.state().resources[0].name, "a");
    }

    #[test]
    fn test_lock_recovers_from_poison() {
        let lock = SessionLock::new();
        let clone = lock.clone();
        let _ = std::thread::spawn(move || {
            let _guard = clone.acquire();
            panic!("poison");
        })
        .join();

        drop(lock.acquire());
    }
}
