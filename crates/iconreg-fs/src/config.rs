//! Format-agnostic configuration loading and saving

use crate::{Error, NormalizedPath, Result, io};
use serde::{Serialize, de::DeserializeOwned};

/// Format-agnostic configuration store.
///
/// The format is chosen from the file extension: `.toml` or `.json`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from a file.
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let content = io::read_text(path)?;
        let extension = path.extension().unwrap_or("").to_lowercase();

        match extension.as_str() {
            "toml" => toml::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_native(),
                format: "TOML".into(),
                message: e.to_string(),
            }),
            "json" => serde_json::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_native(),
                format: "JSON".into(),
                message: e.to_string(),
            }),
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }

    /// Load configuration, falling back to `T::default()` when the file is absent.
    pub fn load_or_default<T: DeserializeOwned + Default>(
        &self,
        path: &NormalizedPath,
    ) -> Result<T> {
        if !path.is_file() {
            tracing::debug!(path = %path, "config file absent, using defaults");
            return Ok(T::default());
        }
        self.load(path)
    }

    /// Save configuration to a file using an atomic write.
    pub fn save<T: Serialize>(&self, path: &NormalizedPath, value: &T) -> Result<()> {
        let extension = path.extension().unwrap_or("").to_lowercase();

        let content = match extension.as_str() {
            "toml" => toml::to_string_pretty(value).map_err(|e| Error::ConfigSerialize {
                path: path.to_native(),
                format: "TOML".into(),
                message: e.to_string(),
            })?,
            "json" => serde_json::to_string_pretty(value).map_err(|e| Error::ConfigSerialize {
                path: path.to_native(),
                format: "JSON".into(),
                message: e.to_string(),
            })?,
            _ => return Err(Error::UnsupportedFormat { extension }),
        };

        io::write_atomic(path, content.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Sample {
        #[serde(default)]
        name: String,
        #[serde(default)]
        count: u32,
    }

    #[test]
    fn test_toml_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = NormalizedPath::new(temp.path().join("settings.toml"));
        let store = ConfigStore::new();
        let value = Sample {
            name: "UtilityExtend".into(),
            count: 3,
        };

        store.save(&path, &value).unwrap();

        assert_eq!(store.load::<Sample>(&path).unwrap(), value);
    }

    #[test]
    fn test_json_is_supported() {
        let temp = TempDir::new().unwrap();
        let path = NormalizedPath::new(temp.path().join("config.json"));
        std::fs::write(path.to_native(), r#"{"name": "NEXBox"}"#).unwrap();

        let loaded: Sample = ConfigStore::new().load(&path).unwrap();
        assert_eq!(loaded.name, "NEXBox");
        assert_eq!(loaded.count, 0);
    }

    #[test]
    fn test_missing_file_yields_default() {
        let temp = TempDir::new().unwrap();
        let path = NormalizedPath::new(temp.path().join("absent.toml"));

        let loaded: Sample = ConfigStore::new().load_or_default(&path).unwrap();
        assert_eq!(loaded, Sample::default());
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let temp = TempDir::new().unwrap();
        let path = NormalizedPath::new(temp.path().join("settings.ini"));
        std::fs::write(path.to_native(), "x").unwrap();

        let result: Result<Sample> = ConfigStore::new().load(&path);
        assert!(matches!(result, Err(Error::UnsupportedFormat { .. })));
    }
}
