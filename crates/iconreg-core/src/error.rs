//! Error types for iconreg-core

use std::path::PathBuf;

/// Result type for iconreg-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in iconreg-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A directory that should be scanned does not exist
    #[error("Directory not found: {path}")]
    DirectoryMissing { path: PathBuf },

    /// A generated source or config file is absent
    #[error("Artifact not found: {path}")]
    ArtifactMissing { path: PathBuf },

    /// A button config line could not be parsed
    #[error("{path}:{line}: {message}")]
    ConfigParseError {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A snapshot could not be written; the mutation was not attempted
    #[error("Backup failed, nothing was modified: {message}")]
    BackupWriteFailure { message: String },

    /// At least one file could not be restored from a backup
    #[error("Restore of {backup_id} incomplete: {failed} of {total} files failed")]
    RestoreFailure {
        backup_id: String,
        failed: usize,
        total: usize,
    },

    /// A plan stopped part way; the listed files were already rewritten
    #[error("Patch stopped after writing {}: {source}", .written.join(", "))]
    PartialApply {
        written: Vec<String>,
        #[source]
        source: Box<Error>,
    },

    #[error("Backup not found: {id}")]
    BackupNotFound { id: String },

    #[error("No {scope} button at index {index}")]
    ButtonNotFound { scope: String, index: usize },

    /// An edit request carried a value the config grammar cannot hold
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// A resource with the same file name is already present
    #[error("Resource already exists: {path}")]
    ResourceExists { path: PathBuf },

    /// A long-running job is still outstanding
    #[error("{job} is already running")]
    Busy { job: String },

    /// Anchor and line-location errors from the text engine
    #[error(transparent)]
    Blocks(#[from] iconreg_blocks::Error),

    /// Filesystem error from iconreg-fs
    #[error(transparent)]
    Fs(#[from] iconreg_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}

impl Error {
    /// Errors that affect a single patch entry rather than a whole file.
    pub fn is_per_entry(&self) -> bool {
        matches!(
            self,
            Self::Blocks(
                iconreg_blocks::Error::AnchorLineNotFound { .. }
                    | iconreg_blocks::Error::AmbiguousMatch { .. }
            )
        )
    }
}
