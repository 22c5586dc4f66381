//! Checkpoints of the artifact files
//!
//! Every mutating operation snapshots the files it may touch first.
//! Snapshots are stored at `<backup_dir>/<backup_id>/` with:
//! - manifest.toml: timestamp, description and the ordered file list
//! - one copy per file, named `<index>_<file name>`

mod manager;
mod manifest;

pub use manager::BackupManager;
pub use manifest::{BackupFile, BackupManifest, RestoreReport, RestoredFile};
