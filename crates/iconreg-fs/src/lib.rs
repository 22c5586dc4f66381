//! Filesystem abstraction for the icon registrar
//!
//! Provides normalized paths, locked atomic writes, checksums, the
//! format-agnostic settings store and plugin/project layout resolution.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod layout;
pub mod path;

pub use config::ConfigStore;
pub use constants::PluginPath;
pub use error::{Error, Result};
pub use layout::PluginLayout;
pub use path::NormalizedPath;
