//! Resource directory scanning
//!
//! Origin is decided by which directory a file was found in, never by its
//! content.

use crate::{Error, Result};
use iconreg_fs::NormalizedPath;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;

/// Where a resource was declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Shipped inside the plugin's own resource directory
    Plugin,
    /// Declared by the hosting project
    Project,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plugin => write!(f, "plugin"),
            Self::Project => write!(f, "project"),
        }
    }
}

/// One icon file found on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntity {
    /// File stem; the canonical resource name
    pub name: String,
    pub path: NormalizedPath,
    pub origin: Origin,
}

/// Check that `name` can sit inside a C++ string literal of the artifact
/// templates without escaping.
pub fn validate_name(name: &str) -> Result<()> {
    match name.chars().find(|&c| matches!(c, '"' | '\\') || c.is_control()) {
        Some(c) => Err(Error::InvalidValue {
            field: "resource name".into(),
            message: format!("`{}` contains {c:?}", name.escape_debug()),
        }),
        None if name.is_empty() => Err(Error::InvalidValue {
            field: "resource name".into(),
            message: "empty name".into(),
        }),
        None => Ok(()),
    }
}

/// Enumerates resource files with a given extension.
#[derive(Debug, Clone)]
pub struct ResourceScanner {
    extension: String,
}

impl ResourceScanner {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into().trim_start_matches('.').to_string(),
        }
    }

    /// Scan one flat directory. Results are sorted by name.
    ///
    /// An empty directory yields an empty list; a missing one is
    /// [`Error::DirectoryMissing`].
    pub fn scan(&self, dir: &NormalizedPath, origin: Origin) -> Result<Vec<ResourceEntity>> {
        let native = dir.to_native();
        if !native.is_dir() {
            return Err(Error::DirectoryMissing { path: native });
        }

        let mut found: BTreeMap<String, ResourceEntity> = BTreeMap::new();
        for entry in fs::read_dir(&native)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let matches_ext = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(&self.extension));
            if !matches_ext {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                tracing::warn!(path = %path.display(), "skipping resource with non UTF-8 name");
                continue;
            };
            if let Err(e) = validate_name(name) {
                tracing::warn!(path = %path.display(), error = %e, "skipping resource");
                continue;
            }
            if found.contains_key(name) {
                tracing::warn!(name, path = %path.display(), "duplicate resource name, keeping the first");
                continue;
            }
            found.insert(
                name.to_string(),
                ResourceEntity {
                    name: name.to_string(),
                    path: NormalizedPath::new(&path),
                    origin,
                },
            );
        }

        tracing::debug!(dir = %dir, %origin, count = found.len(), "scanned resources");
        Ok(found.into_values().collect())
    }

    /// Scan several directories, degrading unreadable ones to an empty set.
    ///
    /// Returns the entities and one warning message per skipped directory.
    pub fn scan_all(&self, sources: &[(NormalizedPath, Origin)]) -> (Vec<ResourceEntity>, Vec<String>) {
        let mut entities = Vec::new();
        let mut warnings = Vec::new();

        for (dir, origin) in sources {
            match self.scan(dir, *origin) {
                Ok(found) => entities.extend(found),
                Err(e) => {
                    tracing::warn!(dir = %dir, error = %e, "resource scan skipped");
                    warnings.push(e.to_string());
                }
            }
        }

        (entities, warnings)
    }
}
