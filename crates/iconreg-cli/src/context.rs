//! Plugin context resolution
//!
//! Commands work from anywhere inside a plugin tree: the plugin root is
//! `--plugin` if given, else the nearest ancestor holding `iconreg.toml`,
//! else the nearest ancestor holding both `Source/<plugin>` and the
//! resources directory.

use std::path::{Path, PathBuf};

use iconreg_core::{Registrar, Settings};
use iconreg_fs::{NormalizedPath, PluginLayout, PluginPath};

use crate::cli::GlobalArgs;
use crate::error::Result;

/// Where the settings and the plugin root were found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginContext {
    pub root: NormalizedPath,
    pub settings_path: Option<NormalizedPath>,
}

/// Nearest ancestor of `start` (inclusive) holding a settings file.
fn find_settings_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(PluginPath::SettingsFile).is_file())
        .map(Path::to_path_buf)
}

/// Resolve the plugin root and settings location from the global flags.
pub fn resolve(global: &GlobalArgs, cwd: &Path) -> Result<(PluginContext, Settings)> {
    let explicit_settings = global.config.as_deref().map(NormalizedPath::new);

    if let Some(plugin) = &global.plugin {
        let root = NormalizedPath::new(plugin);
        let settings_path =
            explicit_settings.unwrap_or_else(|| root.join(PluginPath::SettingsFile));
        let settings = Settings::load(&settings_path)?;
        return Ok((
            PluginContext {
                root,
                settings_path: Some(settings_path),
            },
            settings,
        ));
    }

    if explicit_settings.is_none()
        && let Some(dir) = find_settings_root(cwd)
    {
        let root = NormalizedPath::new(&dir);
        let settings_path = root.join(PluginPath::SettingsFile);
        let settings = Settings::load(&settings_path)?;
        tracing::debug!(root = %root, "plugin root from settings file");
        return Ok((
            PluginContext {
                root,
                settings_path: Some(settings_path),
            },
            settings,
        ));
    }

    let settings = match &explicit_settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let root = PluginLayout::detect_root(cwd, &settings.plugin_name, &settings.resources_dir)?;
    Ok((
        PluginContext {
            root,
            settings_path: explicit_settings,
        },
        settings,
    ))
}

/// Resolve the context and open a registrar over it.
pub fn open_registrar(global: &GlobalArgs) -> Result<Registrar> {
    let cwd = std::env::current_dir()?;
    let (context, settings) = resolve(global, &cwd)?;
    tracing::debug!(
        root = %context.root,
        settings = ?context.settings_path.as_ref().map(|p| p.as_str()),
        "resolved plugin context"
    );
    let project = global.project.as_deref().map(NormalizedPath::new);
    Ok(Registrar::open(context.root, settings, project)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_plugin_wins() {
        let temp = TempDir::new().unwrap();
        let global = GlobalArgs {
            plugin: Some(temp.path().to_path_buf()),
            ..GlobalArgs::default()
        };

        let (context, settings) = resolve(&global, Path::new("/")).unwrap();

        assert_eq!(context.root, NormalizedPath::new(temp.path()));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_settings_file_found_upward() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("iconreg.toml"), "plugin_name = \"Other\"\n").unwrap();
        let nested = temp.path().join("Source/Other/Private");
        fs::create_dir_all(&nested).unwrap();

        let (context, settings) = resolve(&GlobalArgs::default(), &nested).unwrap();

        assert_eq!(context.root, NormalizedPath::new(temp.path()));
        assert_eq!(settings.plugin_name, "Other");
    }

    #[test]
    fn test_layout_detection_without_settings() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("Source/UtilityExtend/Private")).unwrap();
        fs::create_dir_all(temp.path().join("Resources")).unwrap();

        let (context, _) = resolve(
            &GlobalArgs::default(),
            &temp.path().join("Source/UtilityExtend/Private"),
        )
        .unwrap();

        assert_eq!(context.root, NormalizedPath::new(temp.path()));
        assert_eq!(context.settings_path, None);
    }
}
