//! [`TestPlugin`] builder for icon registrar test scenarios.
//!
//! The temporary directory is laid out as a project holding one plugin:
//!
//! ```text
//! <root>/Game.uproject
//! <root>/Config/DefaultUtilityExtend.ini                 (project config)
//! <root>/Plugins/UtilityExtend/Resources/*.svg
//! <root>/Plugins/UtilityExtend/Source/UtilityExtend/Private/*.cpp
//! <root>/Plugins/UtilityExtend/Config/DefaultUtilityExtendPersistent.ini
//! ```
//!
//! Every path argument of the helpers is relative to `<root>`.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const PLUGIN_NAME: &str = "UtilityExtend";
pub const PLUGIN_DIR: &str = "Plugins/UtilityExtend";
pub const STYLE_FILE: &str = "Plugins/UtilityExtend/Source/UtilityExtend/Private/UtilityExtendStyle.cpp";
pub const REGISTRY_FILE: &str =
    "Plugins/UtilityExtend/Source/UtilityExtend/Private/UtilityExtendIconRegistry.cpp";
pub const PERSISTENT_CONFIG: &str = "Plugins/UtilityExtend/Config/DefaultUtilityExtendPersistent.ini";
pub const PROJECT_CONFIG: &str = "Config/DefaultUtilityExtend.ini";
pub const END_SENTINEL: &str =
    "// ============================================================================";

/// Style-mapping line for `name` as the registrar writes it by default.
pub fn style_line(name: &str) -> String {
    format!(
        r#"    Style->Set("{PLUGIN_NAME}.{name}", new IMAGE_BRUSH_SVG(TEXT("{name}"), FVector2D(20.0f, 20.0f)));"#
    )
}

/// Icon-registry line for `name` with the given friendly name.
pub fn registry_line(name: &str, friendly: &str) -> String {
    format!(
        r#"    IconInfos.Add(FToolbarIconInfo(TEXT("{PLUGIN_NAME}.{name}"), TEXT("{friendly}"), TEXT("Plugin icon")));"#
    )
}

/// A temporary project with one plugin, plus setup and assertion helpers.
///
/// # Example
///
/// ```rust,no_run
/// use iconreg_test_utils::TestPlugin;
///
/// let plugin = TestPlugin::new();
/// plugin.add_resources(&["a", "b"]);
/// plugin.write_artifacts(&["a"]);
/// plugin.assert_file_contains(iconreg_test_utils::plugin::STYLE_FILE, "UtilityExtend.a");
/// ```
pub struct TestPlugin {
    temp_dir: TempDir,
}

impl Default for TestPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPlugin {
    /// Create the directory skeleton and the `.uproject` marker.
    /// No artifacts or resources are written.
    pub fn new() -> Self {
        let plugin = Self {
            temp_dir: TempDir::new().unwrap(),
        };
        for dir in [
            "Config",
            "Plugins/UtilityExtend/Resources",
            "Plugins/UtilityExtend/Source/UtilityExtend/Private",
            "Plugins/UtilityExtend/Config",
        ] {
            fs::create_dir_all(plugin.root().join(dir)).unwrap();
        }
        fs::write(plugin.root().join("Game.uproject"), "{}\n").unwrap();
        plugin
    }

    /// The project root (the temporary directory).
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn plugin_root(&self) -> PathBuf {
        self.root().join(PLUGIN_DIR)
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("TestPlugin::write: {}: {e}", path.display()));
    }

    pub fn read(&self, relative: &str) -> String {
        let path = self.path(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("TestPlugin::read: {}: {e}", path.display()))
    }

    pub fn remove(&self, relative: &str) {
        fs::remove_file(self.path(relative)).unwrap();
    }

    /// Create `<name>.svg` in the plugin resources directory for each name.
    pub fn add_resources(&self, names: &[&str]) {
        for name in names {
            self.write(
                &format!("{PLUGIN_DIR}/Resources/{name}.svg"),
                "<svg xmlns=\"http://www.w3.org/2000/svg\"/>\n",
            );
        }
    }

    pub fn remove_resource(&self, name: &str) {
        self.remove(&format!("{PLUGIN_DIR}/Resources/{name}.svg"));
    }

    /// Write both artifacts with `names` registered inside the anchors.
    /// Friendly names equal resource names.
    pub fn write_artifacts(&self, names: &[&str]) {
        let style: Vec<String> = names.iter().map(|n| style_line(n)).collect();
        let registry: Vec<String> = names.iter().map(|n| registry_line(n, n)).collect();
        self.write_style(&style);
        self.write_registry(&registry);
    }

    /// Style file with `body` between the anchors and one builtin
    /// registration above them.
    pub fn write_style(&self, body: &[String]) {
        let mut text = String::from(
            "#include \"UtilityExtendStyle.h\"\n\
             \n\
             void FUtilityExtendStyle::RegisterIcons(TSharedRef<FSlateStyleSet> Style)\n\
             {\n    \
             Style->Set(\"ToolbarIcon.Default\", new IMAGE_BRUSH_SVG(TEXT(\"Default\"), FVector2D(40.0f, 40.0f)));\n\
             \n    \
             // User custom icons\n",
        );
        for line in body {
            text.push_str(line);
            text.push('\n');
        }
        text.push_str(&format!("    {END_SENTINEL}\n}}\n"));
        self.write(STYLE_FILE, &text);
    }

    /// Registry file with `body` between the anchors and one builtin
    /// registration above them.
    pub fn write_registry(&self, body: &[String]) {
        let mut text = String::from(
            "#include \"UtilityExtendIconRegistry.h\"\n\
             \n\
             void FUtilityExtendIconRegistry::PopulateIcons(TArray<FToolbarIconInfo>& IconInfos)\n\
             {\n    \
             IconInfos.Add(FToolbarIconInfo(TEXT(\"ToolbarIcon.Default\"), TEXT(\"Default\"), TEXT(\"Builtin icon\")));\n\
             \n    \
             // User custom icon infos\n",
        );
        for line in body {
            text.push_str(line);
            text.push('\n');
        }
        text.push_str(&format!("    {END_SENTINEL}\n}}\n"));
        self.write(REGISTRY_FILE, &text);
    }

    /// Register `name` above the anchors of both artifacts, where it is
    /// read but never edited. Call after the artifacts are written.
    pub fn register_outside_anchors(&self, name: &str) {
        let style = self.read(STYLE_FILE).replacen(
            "    // User custom icons\n",
            &format!("{}\n    // User custom icons\n", style_line(name)),
            1,
        );
        self.write(STYLE_FILE, &style);
        let registry = self.read(REGISTRY_FILE).replacen(
            "    // User custom icon infos\n",
            &format!("{}\n    // User custom icon infos\n", registry_line(name, name)),
            1,
        );
        self.write(REGISTRY_FILE, &registry);
    }

    /// Persistent config holding `entries` as `+PersistentButtonConfigs=` lines.
    pub fn write_persistent_config(&self, entries: &[&str]) {
        let mut text = String::from(
            "[/Script/UtilityExtend.UtilityExtendPersistentSettings]\nbEnabled=True\n",
        );
        for entry in entries {
            text.push_str(&format!("+PersistentButtonConfigs={entry}\n"));
        }
        self.write(PERSISTENT_CONFIG, &text);
    }

    /// Project config holding `entries` as `+ToolbarButtonConfigs=` lines.
    pub fn write_project_config(&self, entries: &[&str]) {
        let mut text = String::from("[/Script/UtilityExtend.UtilityExtendSettings]\n");
        for entry in entries {
            text.push_str(&format!("+ToolbarButtonConfigs={entry}\n"));
        }
        self.write(PROJECT_CONFIG, &text);
    }

    /// Assert that `path` (relative to root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let file_content = self.read(path);
        assert!(
            file_content.contains(content),
            "File {path} does not contain expected content.\nExpected: {content}\nActual: {file_content}"
        );
    }

    /// Assert that the file at `path` does not contain `content`.
    pub fn assert_file_not_contains(&self, path: &str, content: &str) {
        let file_content = self.read(path);
        assert!(
            !file_content.contains(content),
            "File {path} unexpectedly contains: {content}\nActual: {file_content}"
        );
    }
}
