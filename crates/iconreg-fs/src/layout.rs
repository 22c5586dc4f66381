//! Plugin and project layout resolution
//!
//! A plugin tree looks like:
//!
//! ```text
//! <plugin>/Resources/*.svg
//! <plugin>/Source/<Name>/Private/<Name>Style.cpp
//! <plugin>/Source/<Name>/Private/<Name>IconRegistry.cpp
//! <plugin>/Config/Default<Name>Persistent.ini
//! <project>/Config/Default<Name>.ini
//! ```

use crate::{Error, NormalizedPath, PluginPath, Result};
use std::path::Path;

/// Resolved locations of every file the registrar reads or rewrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginLayout {
    root: NormalizedPath,
    plugin_name: String,
    project_root: Option<NormalizedPath>,
}

impl PluginLayout {
    pub fn new(root: NormalizedPath, plugin_name: impl Into<String>) -> Self {
        Self {
            root,
            plugin_name: plugin_name.into(),
            project_root: None,
        }
    }

    pub fn with_project(mut self, project_root: Option<NormalizedPath>) -> Self {
        self.project_root = project_root;
        self
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn plugin_name(&self) -> &str {
        &self.plugin_name
    }

    pub fn project_root(&self) -> Option<&NormalizedPath> {
        self.project_root.as_ref()
    }

    fn private_dir(&self) -> NormalizedPath {
        self.root
            .join(PluginPath::Source)
            .join(&self.plugin_name)
            .join(PluginPath::Private)
    }

    /// The generated style-mapping source file.
    pub fn style_file(&self) -> NormalizedPath {
        self.private_dir()
            .join(format!("{}Style.cpp", self.plugin_name))
    }

    /// The generated icon-registry source file.
    pub fn registry_file(&self) -> NormalizedPath {
        self.private_dir()
            .join(format!("{}IconRegistry.cpp", self.plugin_name))
    }

    /// Persistent (plugin-scoped) button configuration.
    pub fn persistent_config(&self) -> NormalizedPath {
        self.root
            .join(PluginPath::Config)
            .join(format!("Default{}Persistent.ini", self.plugin_name))
    }

    /// Project-scoped button configuration, when a project root is known.
    pub fn project_config(&self) -> Option<NormalizedPath> {
        self.project_root.as_ref().map(|project| {
            project
                .join(PluginPath::Config)
                .join(format!("Default{}.ini", self.plugin_name))
        })
    }

    /// Every artifact a mutating operation may touch, in snapshot order.
    pub fn artifact_files(&self) -> Vec<NormalizedPath> {
        let mut files = vec![
            self.style_file(),
            self.registry_file(),
            self.persistent_config(),
        ];
        files.extend(self.project_config());
        files
    }

    pub fn settings_file(&self) -> NormalizedPath {
        self.root.join(PluginPath::SettingsFile)
    }

    pub fn tool_state_dir(&self) -> NormalizedPath {
        self.root.join(PluginPath::ToolState)
    }

    /// Resolve a directory setting: absolute values are used as-is,
    /// relative ones are taken from the plugin root.
    pub fn resolve(&self, dir: &str) -> NormalizedPath {
        if Path::new(dir).is_absolute() {
            NormalizedPath::new(dir)
        } else {
            self.root.join(dir)
        }
    }

    /// Resolve a directory setting against the project root.
    pub fn resolve_in_project(&self, dir: &str) -> Option<NormalizedPath> {
        if Path::new(dir).is_absolute() {
            return Some(NormalizedPath::new(dir));
        }
        self.project_root.as_ref().map(|project| project.join(dir))
    }

    /// Walk upward from `start` to the first directory that contains both
    /// `Source/<plugin_name>` and `resources_dir`.
    pub fn detect_root(
        start: &Path,
        plugin_name: &str,
        resources_dir: &str,
    ) -> Result<NormalizedPath> {
        for candidate in start.ancestors() {
            let has_source = candidate
                .join(PluginPath::Source)
                .join(plugin_name)
                .is_dir();
            if has_source && candidate.join(resources_dir).is_dir() {
                tracing::debug!(root = %candidate.display(), "detected plugin root");
                return Ok(NormalizedPath::new(candidate));
            }
        }
        Err(Error::LayoutDetectionFailed {
            start: start.to_path_buf(),
        })
    }

    /// Walk upward from the plugin root to the first directory holding a
    /// `*.uproject` file.
    pub fn detect_project(plugin_root: &NormalizedPath) -> Option<NormalizedPath> {
        let native = plugin_root.to_native();
        for candidate in native.ancestors() {
            let Ok(entries) = std::fs::read_dir(candidate) else {
                continue;
            };
            let has_project_file = entries.filter_map(|e| e.ok()).any(|entry| {
                entry
                    .path()
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("uproject"))
            });
            if has_project_file {
                tracing::debug!(project = %candidate.display(), "detected project root");
                return Some(NormalizedPath::new(candidate));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_artifact_paths() {
        let layout = PluginLayout::new(NormalizedPath::new("/p"), "UtilityExtend")
            .with_project(Some(NormalizedPath::new("/game")));

        assert_eq!(
            layout.style_file().as_str(),
            "/p/Source/UtilityExtend/Private/UtilityExtendStyle.cpp"
        );
        assert_eq!(
            layout.registry_file().as_str(),
            "/p/Source/UtilityExtend/Private/UtilityExtendIconRegistry.cpp"
        );
        assert_eq!(
            layout.persistent_config().as_str(),
            "/p/Config/DefaultUtilityExtendPersistent.ini"
        );
        assert_eq!(
            layout.project_config().unwrap().as_str(),
            "/game/Config/DefaultUtilityExtend.ini"
        );
        assert_eq!(layout.artifact_files().len(), 4);
    }

    #[test]
    fn test_without_project_only_three_artifacts() {
        let layout = PluginLayout::new(NormalizedPath::new("/p"), "UtilityExtend");
        assert!(layout.project_config().is_none());
        assert_eq!(layout.artifact_files().len(), 3);
    }

    #[test]
    fn test_detect_root_walks_upward() {
        let temp = TempDir::new().unwrap();
        let plugin = temp.path().join("Plugins/UtilityExtend");
        fs::create_dir_all(plugin.join("Source/UtilityExtend/Private")).unwrap();
        fs::create_dir_all(plugin.join("Resources")).unwrap();
        let nested = plugin.join("Third/Tool");
        fs::create_dir_all(&nested).unwrap();

        let root = PluginLayout::detect_root(&nested, "UtilityExtend", "Resources").unwrap();
        assert_eq!(root, NormalizedPath::new(&plugin));
    }

    #[test]
    fn test_detect_project_finds_uproject() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("NEXBox.uproject"), "{}").unwrap();
        let plugin = temp.path().join("Plugins/UtilityExtend");
        fs::create_dir_all(&plugin).unwrap();

        let project = PluginLayout::detect_project(&NormalizedPath::new(&plugin));
        assert_eq!(project, Some(NormalizedPath::new(temp.path())));
    }
}
