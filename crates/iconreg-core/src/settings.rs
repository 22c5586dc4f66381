//! Tool settings loaded from `iconreg.toml`
//!
//! Every field is optional; an absent file or an empty table yields the
//! defaults below, which describe the stock `UtilityExtend` plugin.

use crate::Result;
use iconreg_blocks::AnchorSpec;
use iconreg_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};

/// End-of-region sentinel shared by both generated artifacts.
pub const DEFAULT_END_SENTINEL: &str =
    "// ============================================================================";

fn default_plugin_name() -> String {
    "UtilityExtend".to_string()
}

fn default_resources_dir() -> String {
    "Resources".to_string()
}

fn default_icon_extension() -> String {
    "svg".to_string()
}

fn default_backup_dir() -> String {
    ".iconreg/backups".to_string()
}

fn default_report_dir() -> String {
    ".iconreg/reports".to_string()
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_brush_size() -> String {
    "20.0f, 20.0f".to_string()
}

/// Start/end sentinel text for one anchor region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentinels {
    pub start: String,
    #[serde(default = "default_end")]
    pub end: String,
}

fn default_end() -> String {
    DEFAULT_END_SENTINEL.to_string()
}

impl Sentinels {
    pub fn to_spec(&self) -> AnchorSpec {
        AnchorSpec::new(self.start.clone(), self.end.clone())
    }
}

/// Anchor regions of the two generated artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorSettings {
    #[serde(default = "default_style_anchor")]
    pub style: Sentinels,
    #[serde(default = "default_registry_anchor")]
    pub registry: Sentinels,
}

fn default_style_anchor() -> Sentinels {
    Sentinels {
        start: "// User custom icons".to_string(),
        end: default_end(),
    }
}

fn default_registry_anchor() -> Sentinels {
    Sentinels {
        start: "// User custom icon infos".to_string(),
        end: default_end(),
    }
}

impl Default for AnchorSettings {
    fn default() -> Self {
        Self {
            style: default_style_anchor(),
            registry: default_registry_anchor(),
        }
    }
}

/// Description text written into new registry lines, per origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptions {
    #[serde(default = "default_plugin_description")]
    pub plugin: String,
    #[serde(default = "default_project_description")]
    pub project: String,
}

fn default_plugin_description() -> String {
    "Plugin icon".to_string()
}

fn default_project_description() -> String {
    "Project icon".to_string()
}

impl Default for Descriptions {
    fn default() -> Self {
        Self {
            plugin: default_plugin_description(),
            project: default_project_description(),
        }
    }
}

/// Registrar settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Plugin module name; also the qualified-name namespace
    #[serde(default = "default_plugin_name")]
    pub plugin_name: String,

    /// Explicit project root; detected from `*.uproject` when unset
    #[serde(default)]
    pub project_path: Option<String>,

    /// Plugin-builtin resource directory, relative to the plugin root
    #[serde(default = "default_resources_dir")]
    pub resources_dir: String,

    /// Project resource directory, relative to the project root
    #[serde(default)]
    pub project_resources_dir: Option<String>,

    #[serde(default = "default_icon_extension")]
    pub icon_extension: String,

    #[serde(default = "default_backup_dir")]
    pub backup_dir: String,

    #[serde(default = "default_report_dir")]
    pub report_dir: String,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// `FVector2D` arguments of new style lines
    #[serde(default = "default_brush_size")]
    pub brush_size: String,

    /// Program and arguments run by `iconreg build`
    #[serde(default)]
    pub build_command: Vec<String>,

    #[serde(default)]
    pub anchors: AnchorSettings,

    #[serde(default)]
    pub descriptions: Descriptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            plugin_name: default_plugin_name(),
            project_path: None,
            resources_dir: default_resources_dir(),
            project_resources_dir: None,
            icon_extension: default_icon_extension(),
            backup_dir: default_backup_dir(),
            report_dir: default_report_dir(),
            poll_interval_ms: default_poll_interval_ms(),
            brush_size: default_brush_size(),
            build_command: Vec::new(),
            anchors: AnchorSettings::default(),
            descriptions: Descriptions::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path` (`.toml` or `.json`), or defaults if it is absent.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        Ok(ConfigStore::new().load_or_default(path)?)
    }

    pub fn save(&self, path: &NormalizedPath) -> Result<()> {
        Ok(ConfigStore::new().save(path, self)?)
    }

    /// Namespace prefix of every managed qualified name, including the dot.
    pub fn namespace_prefix(&self) -> String {
        format!("{}.", self.plugin_name)
    }

    pub fn qualified_name(&self, name: &str) -> String {
        format!("{}.{}", self.plugin_name, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.anchors.style.start, "// User custom icons");
        assert_eq!(settings.anchors.registry.end, DEFAULT_END_SENTINEL);
    }

    #[test]
    fn test_partial_override() {
        let settings: Settings = toml::from_str(
            r#"
plugin_name = "NEXTools"
project_resources_dir = "Content/Icons"

[anchors.style]
start = "// BEGIN ICONS"
"#,
        )
        .unwrap();

        assert_eq!(settings.plugin_name, "NEXTools");
        assert_eq!(settings.qualified_name("Save"), "NEXTools.Save");
        assert_eq!(settings.anchors.style.start, "// BEGIN ICONS");
        assert_eq!(settings.anchors.style.end, DEFAULT_END_SENTINEL);
        assert_eq!(settings.anchors.registry.start, "// User custom icon infos");
        assert_eq!(settings.resources_dir, "Resources");
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = NormalizedPath::new(temp.path().join("iconreg.toml"));
        assert_eq!(Settings::load(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = NormalizedPath::new(temp.path().join("iconreg.json"));
        let settings = Settings {
            build_command: vec!["make".into(), "editor".into()],
            ..Settings::default()
        };

        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }
}
