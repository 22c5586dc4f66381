//! Toolbar button configuration
//!
//! Buttons live as `+Key=(...)` lines in one section of an INI-style file.
//! The managed key is always rewritten as a whole from the in-memory list;
//! every other line of the file is carried through untouched.

pub mod grammar;
mod model;

pub use grammar::{FieldValue, GrammarError};
pub use model::{ButtonConfig, ButtonEdit, ButtonType, ConfigModel, ConfigScope};
