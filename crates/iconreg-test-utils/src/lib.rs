//! Shared test utilities for the icon registrar workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`plugin`]: [`plugin::TestPlugin`] builder for a plugin tree inside a
//!   temporary project, plus line helpers matching the generated artifacts

pub mod plugin;

pub use plugin::{TestPlugin, registry_line, style_line};
