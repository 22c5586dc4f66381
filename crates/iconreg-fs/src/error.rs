//! Error types for iconreg-fs

use std::path::PathBuf;

/// Result type for iconreg-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in iconreg-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Failed to serialize {format} config for {path}: {message}")]
    ConfigSerialize {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Could not locate a plugin root above {start}")]
    LayoutDetectionFailed { start: PathBuf },

    /// The target is read-only, typically not checked out of version control
    #[error("File is read-only: {path}")]
    ReadOnly { path: PathBuf },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
