//! Normalized path handling for cross-platform compatibility
//!
//! Artifact paths end up in backup manifests and reports, so they are kept
//! with forward slashes regardless of the host platform and only converted
//! back at I/O boundaries.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let raw = path.as_ref().to_string_lossy().replace('\\', "/");
        let mut inner = String::with_capacity(raw.len());
        let mut previous_slash = false;
        for ch in raw.chars() {
            if ch == '/' {
                if previous_slash {
                    continue;
                }
                previous_slash = true;
            } else {
                previous_slash = false;
            }
            inner.push(ch);
        }
        if inner.len() > 1 && inner.ends_with('/') {
            inner.pop();
        }
        Self { inner }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a relative segment.
    pub fn join(&self, segment: impl AsRef<Path>) -> Self {
        let segment = segment.as_ref().to_string_lossy().replace('\\', "/");
        let segment = segment.trim_start_matches('/');
        if self.inner.is_empty() {
            return Self::new(segment);
        }
        Self::new(format!("{}/{}", self.inner, segment))
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        match self.inner.rfind('/') {
            Some(0) if self.inner.len() > 1 => Some(Self::new("/")),
            Some(0) => None,
            Some(idx) => Some(Self::new(&self.inner[..idx])),
            None => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        self.inner.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// File name without its final extension.
    pub fn file_stem(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(0) | None => Some(name),
            Some(idx) => Some(&name[..idx]),
        }
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&name[idx + 1..]),
        }
    }

    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backslashes_become_forward_slashes() {
        let path = NormalizedPath::new(r"C:\Plugins\UtilityExtend\Resources");
        assert_eq!(path.as_str(), "C:/Plugins/UtilityExtend/Resources");
    }

    #[test]
    fn test_join_and_parent() {
        let root = NormalizedPath::new("/plugins/UtilityExtend/");
        let file = root.join("Resources/ToolBox.svg");
        assert_eq!(file.as_str(), "/plugins/UtilityExtend/Resources/ToolBox.svg");
        assert_eq!(
            file.parent().unwrap().as_str(),
            "/plugins/UtilityExtend/Resources"
        );
    }

    #[test]
    fn test_stem_and_extension() {
        let file = NormalizedPath::new("Resources/NEXIcon.svg");
        assert_eq!(file.file_stem(), Some("NEXIcon"));
        assert_eq!(file.extension(), Some("svg"));

        let dotfile = NormalizedPath::new("dir/.hidden");
        assert_eq!(dotfile.extension(), None);
        assert_eq!(dotfile.file_stem(), Some(".hidden"));
    }

    #[test]
    fn test_root_has_no_parent() {
        assert_eq!(NormalizedPath::new("/").parent(), None);
        assert_eq!(NormalizedPath::new("/a").parent(), Some(NormalizedPath::new("/")));
    }
}
