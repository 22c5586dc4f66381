//! Snapshot creation, listing, restore and deletion

use super::manifest::{BackupFile, BackupManifest, RestoreReport, RestoredFile};
use crate::{Error, Result};
use chrono::Utc;
use iconreg_fs::{NormalizedPath, checksum, io};
use std::fs;

const MANIFEST_FILE: &str = "manifest.toml";

/// Manages artifact snapshots under one directory
#[derive(Debug, Clone)]
pub struct BackupManager {
    backups_dir: NormalizedPath,
}

impl BackupManager {
    pub fn new(backups_dir: NormalizedPath) -> Self {
        Self { backups_dir }
    }

    pub fn backups_dir(&self) -> &NormalizedPath {
        &self.backups_dir
    }

    fn backup_dir(&self, backup_id: &str) -> NormalizedPath {
        self.backups_dir.join(backup_id)
    }

    /// Ids are generated by [`Self::snapshot`]; anything else could escape
    /// the backups directory.
    fn validate_id(backup_id: &str) -> Result<()> {
        let valid = !backup_id.is_empty()
            && backup_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(())
        } else {
            Err(Error::BackupNotFound {
                id: backup_id.to_string(),
            })
        }
    }

    fn new_backup_id() -> String {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        format!("{}-{}", Utc::now().format("%Y%m%d_%H%M%S"), &suffix[..8])
    }

    /// Copy every existing file in `files` into a new backup.
    ///
    /// Missing files are skipped. Each call creates a distinct backup id and
    /// never touches earlier backups. On any failure the partial backup is
    /// removed and [`Error::BackupWriteFailure`] is returned.
    pub fn snapshot(&self, description: &str, files: &[NormalizedPath]) -> Result<BackupManifest> {
        let backup_id = Self::new_backup_id();
        let dir = self.backup_dir(&backup_id);

        let result = fs::create_dir_all(self.backups_dir.to_native())
            .and_then(|()| fs::create_dir(dir.to_native()))
            .map_err(|e| Error::BackupWriteFailure {
                message: format!("cannot create {dir}: {e}"),
            })
            .and_then(|()| self.write_snapshot(&backup_id, description, files));

        match result {
            Ok(manifest) => {
                tracing::info!(backup_id = %manifest.backup_id, files = manifest.files.len(), "created backup");
                Ok(manifest)
            }
            Err(e) => {
                if dir.exists() {
                    let _ = fs::remove_dir_all(dir.to_native());
                }
                match e {
                    Error::BackupWriteFailure { .. } => Err(e),
                    other => Err(Error::BackupWriteFailure {
                        message: other.to_string(),
                    }),
                }
            }
        }
    }

    fn write_snapshot(
        &self,
        backup_id: &str,
        description: &str,
        files: &[NormalizedPath],
    ) -> Result<BackupManifest> {
        let dir = self.backup_dir(backup_id);
        let mut entries = Vec::new();

        for (index, original) in files.iter().filter(|f| f.is_file()).enumerate() {
            let name = format!("{index}_{}", original.file_name().unwrap_or("file"));
            let content = fs::read(original.to_native())?;
            io::write_atomic(&dir.join(&name), &content)?;
            entries.push(BackupFile {
                original: original.clone(),
                backup: name,
                checksum: checksum::compute_bytes_checksum(&content),
            });
        }

        let manifest = BackupManifest {
            backup_id: backup_id.to_string(),
            created: Utc::now(),
            description: description.to_string(),
            files: entries,
        };
        io::write_text(&dir.join(MANIFEST_FILE), &toml::to_string_pretty(&manifest)?)?;
        Ok(manifest)
    }

    /// Load one backup's manifest.
    pub fn get(&self, backup_id: &str) -> Result<BackupManifest> {
        Self::validate_id(backup_id)?;
        let path = self.backup_dir(backup_id).join(MANIFEST_FILE);
        if !path.is_file() {
            return Err(Error::BackupNotFound {
                id: backup_id.to_string(),
            });
        }
        Ok(toml::from_str(&io::read_text(&path)?)?)
    }

    /// All readable backups, newest first.
    pub fn list(&self) -> Result<Vec<BackupManifest>> {
        if !self.backups_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut manifests = Vec::new();
        for entry in fs::read_dir(self.backups_dir.to_native())? {
            let path = entry?.path();
            let Some(id) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !path.is_dir() {
                continue;
            }
            match self.get(id) {
                Ok(manifest) => manifests.push(manifest),
                Err(e) => tracing::warn!(backup = id, error = %e, "skipping unreadable backup"),
            }
        }

        manifests.sort_by(|a, b| {
            b.created
                .cmp(&a.created)
                .then_with(|| b.backup_id.cmp(&a.backup_id))
        });
        Ok(manifests)
    }

    /// Copy every file of `manifest` back over its original path.
    ///
    /// Each copy is verified against its recorded checksum first. Failures
    /// are collected per file; the remaining files are still restored.
    pub fn restore(&self, manifest: &BackupManifest) -> RestoreReport {
        let dir = self.backup_dir(&manifest.backup_id);
        let files = manifest
            .files
            .iter()
            .map(|entry| {
                let error = Self::restore_one(&dir, entry).err();
                if let Some(reason) = &error {
                    tracing::warn!(path = %entry.original, reason, "restore failed");
                } else {
                    tracing::debug!(path = %entry.original, "restored");
                }
                RestoredFile {
                    path: entry.original.clone(),
                    error,
                }
            })
            .collect();

        RestoreReport {
            backup_id: manifest.backup_id.clone(),
            files,
        }
    }

    fn restore_one(dir: &NormalizedPath, entry: &BackupFile) -> std::result::Result<(), String> {
        let source = dir.join(&entry.backup);
        let content =
            fs::read(source.to_native()).map_err(|e| format!("cannot read {source}: {e}"))?;
        let actual = checksum::compute_bytes_checksum(&content);
        if actual != entry.checksum {
            return Err(format!(
                "checksum mismatch for {source}: expected {}, found {actual}",
                entry.checksum
            ));
        }
        io::write_atomic(&entry.original, &content).map_err(|e| e.to_string())
    }

    /// Remove a backup and its manifest. Deleting twice is a no-op.
    ///
    /// Returns whether anything was removed.
    pub fn delete(&self, backup_id: &str) -> Result<bool> {
        Self::validate_id(backup_id)?;
        let dir = self.backup_dir(backup_id);
        if !dir.exists() {
            return Ok(false);
        }
        fs::remove_dir_all(dir.to_native())?;
        tracing::info!(backup_id, "deleted backup");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, BackupManager, Vec<NormalizedPath>) {
        let temp = TempDir::new().unwrap();
        let manager = BackupManager::new(NormalizedPath::new(temp.path().join("backups")));
        let a = NormalizedPath::new(temp.path().join("src/Style.cpp"));
        let b = NormalizedPath::new(temp.path().join("cfg/Default.ini"));
        io::write_text(&a, "style\r\n").unwrap();
        io::write_text(&b, "[S]\n").unwrap();
        (temp, manager, vec![a, b])
    }

    #[test]
    fn test_snapshot_writes_manifest_and_copies() {
        let (temp, manager, mut files) = setup();
        files.push(NormalizedPath::new(temp.path().join("absent.ini")));

        let manifest = manager.snapshot("before add", &files).unwrap();

        assert_eq!(manifest.files.len(), 2);
        assert_eq!(manifest.files[0].backup, "0_Style.cpp");
        assert_eq!(manifest.files[1].backup, "1_Default.ini");
        assert!(manifest.files[0].checksum.starts_with("sha256:"));
        assert_eq!(manager.get(&manifest.backup_id).unwrap(), manifest);
    }

    #[test]
    fn test_snapshot_ids_are_distinct() {
        let (_temp, manager, files) = setup();
        let first = manager.snapshot("one", &files).unwrap();
        let second = manager.snapshot("two", &files).unwrap();

        assert_ne!(first.backup_id, second.backup_id);
        assert_eq!(manager.list().unwrap().len(), 2);
    }

    #[test]
    fn test_restore_roundtrip() {
        let (_temp, manager, files) = setup();
        let manifest = manager.snapshot("checkpoint", &files).unwrap();
        io::write_text(&files[0], "changed").unwrap();
        fs::remove_file(files[1].to_native()).unwrap();

        let report = manager.restore(&manifest);

        assert!(report.is_complete());
        assert_eq!(io::read_text(&files[0]).unwrap(), "style\r\n");
        assert_eq!(io::read_text(&files[1]).unwrap(), "[S]\n");
    }

    #[test]
    fn test_restore_reports_tampered_copy() {
        let (_temp, manager, files) = setup();
        let manifest = manager.snapshot("checkpoint", &files).unwrap();
        let copy = manager
            .backups_dir()
            .join(&manifest.backup_id)
            .join(&manifest.files[0].backup);
        fs::write(copy.to_native(), "tampered").unwrap();
        io::write_text(&files[1], "changed").unwrap();

        let report = manager.restore(&manifest);

        assert_eq!(report.failed().count(), 1);
        assert_eq!(io::read_text(&files[1]).unwrap(), "[S]\n");
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (_temp, manager, files) = setup();
        let manifest = manager.snapshot("x", &files).unwrap();

        assert!(manager.delete(&manifest.backup_id).unwrap());
        assert!(!manager.delete(&manifest.backup_id).unwrap());
        assert!(matches!(
            manager.get(&manifest.backup_id),
            Err(Error::BackupNotFound { .. })
        ));
    }

    #[test]
    fn test_rejects_path_like_ids() {
        let (_temp, manager, _files) = setup();
        assert!(matches!(
            manager.get("../etc"),
            Err(Error::BackupNotFound { .. })
        ));
    }

    #[test]
    fn test_list_without_directory() {
        let temp = TempDir::new().unwrap();
        let manager = BackupManager::new(NormalizedPath::new(temp.path().join("none")));
        assert!(manager.list().unwrap().is_empty());
    }
}
