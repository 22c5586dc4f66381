//! Backup manifest and restore report types

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use iconreg_fs::NormalizedPath;
use serde::{Deserialize, Serialize};

/// One file captured by a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupFile {
    /// Where the file lives and is restored to
    pub original: NormalizedPath,
    /// File name of the copy inside the backup directory
    pub backup: String,
    /// `sha256:<hex>` of the copy at snapshot time
    pub checksum: String,
}

/// Record of one snapshot; immutable once written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupManifest {
    pub backup_id: String,
    pub created: DateTime<Utc>,
    pub description: String,
    #[serde(default)]
    pub files: Vec<BackupFile>,
}

/// Per-file restore result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoredFile {
    pub path: NormalizedPath,
    /// `None` on success, the failure reason otherwise
    pub error: Option<String>,
}

/// Outcome of restoring a snapshot
///
/// A partial restore is never success: check [`RestoreReport::is_complete`]
/// or convert with [`RestoreReport::into_result`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreReport {
    pub backup_id: String,
    pub files: Vec<RestoredFile>,
}

impl RestoreReport {
    pub fn restored(&self) -> impl Iterator<Item = &NormalizedPath> {
        self.files
            .iter()
            .filter(|f| f.error.is_none())
            .map(|f| &f.path)
    }

    pub fn failed(&self) -> impl Iterator<Item = &RestoredFile> {
        self.files.iter().filter(|f| f.error.is_some())
    }

    pub fn is_complete(&self) -> bool {
        self.files.iter().all(|f| f.error.is_none())
    }

    /// `Err(RestoreFailure)` if any file failed.
    pub fn into_result(self) -> Result<Self> {
        let failed = self.failed().count();
        if failed == 0 {
            return Ok(self);
        }
        Err(Error::RestoreFailure {
            backup_id: self.backup_id,
            failed,
            total: self.files.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_toml_roundtrip() {
        let manifest = BackupManifest {
            backup_id: "20260101_120000-0a1b2c3d".into(),
            created: Utc::now(),
            description: "before add".into(),
            files: vec![BackupFile {
                original: NormalizedPath::new("/p/Source/NS/Private/NSStyle.cpp"),
                backup: "0_NSStyle.cpp".into(),
                checksum: "sha256:00".into(),
            }],
        };

        let text = toml::to_string_pretty(&manifest).unwrap();
        let parsed: BackupManifest = toml::from_str(&text).unwrap();
        assert_eq!(parsed, manifest);
    }

    #[test]
    fn test_partial_restore_is_failure() {
        let report = RestoreReport {
            backup_id: "id".into(),
            files: vec![
                RestoredFile {
                    path: NormalizedPath::new("/a"),
                    error: None,
                },
                RestoredFile {
                    path: NormalizedPath::new("/b"),
                    error: Some("checksum mismatch".into()),
                },
            ],
        };

        assert!(!report.is_complete());
        assert_eq!(report.restored().count(), 1);
        let err = report.into_result().unwrap_err();
        assert!(matches!(err, Error::RestoreFailure { failed: 1, total: 2, .. }));
    }
}
