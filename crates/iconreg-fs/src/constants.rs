//! Well-known relative paths inside a plugin tree.

use std::path::Path;

/// Standard plugin filesystem locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginPath {
    /// The `Source` directory holding module sources
    Source,
    /// The `Private` directory inside a module
    Private,
    /// The `Config` directory holding ini files
    Config,
    /// The `.iconreg` directory holding tool state (backups, reports)
    ToolState,
    /// The default tool settings file at the plugin root
    SettingsFile,
}

impl PluginPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Source => "Source",
            Self::Private => "Private",
            Self::Config => "Config",
            Self::ToolState => ".iconreg",
            Self::SettingsFile => "iconreg.toml",
        }
    }
}

impl AsRef<Path> for PluginPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl std::fmt::Display for PluginPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
