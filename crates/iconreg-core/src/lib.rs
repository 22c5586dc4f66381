//! Reconciliation and patch engine for the icon registrar
//!
//! This crate keeps a plugin's icon resources and its two generated source
//! artifacts in agreement:
//!
//! - **Scanning**: icon files per origin (`ResourceScanner`)
//! - **Extraction**: registered qualified and friendly names (`RegistrationExtractor`)
//! - **Reconciliation**: missing and orphaned sets (`ReconciliationEngine`)
//! - **Patching**: region-confined insert/delete/rename with previews (`TextPatchEngine`)
//! - **Backups**: checksummed snapshots and restore (`BackupManager`)
//! - **Button configs**: parse, edit and regenerate toolbar entries (`ConfigModel`)
//!
//! # Architecture
//!
//! ```text
//!                  iconreg-cli
//!                       |
//!                 iconreg-core (Registrar)
//!                       |
//!          +------------+------------+
//!          |                         |
//!     iconreg-fs              iconreg-blocks
//! ```
//!
//! # Example
//!
//! ```ignore
//! use iconreg_core::{MutationOptions, Registrar, Settings};
//! use iconreg_fs::NormalizedPath;
//!
//! fn example() -> iconreg_core::Result<()> {
//!     let mut registrar = Registrar::open(NormalizedPath::new("."), Settings::default(), None)?;
//!     let outcome = registrar.sync(MutationOptions::dry_run())?;
//!     print!("{}", outcome.preview);
//!     Ok(())
//! }
//! ```

pub mod artifact;
pub mod backup;
pub mod buttons;
pub mod error;
pub mod extract;
pub mod job;
pub mod monitor;
pub mod patch;
pub mod reconcile;
pub mod registrar;
pub mod report;
pub mod scanner;
pub mod session;
pub mod settings;

pub use artifact::ArtifactKind;
pub use backup::{BackupFile, BackupManager, BackupManifest, RestoreReport, RestoredFile};
pub use buttons::{ButtonConfig, ButtonEdit, ButtonType, ConfigModel, ConfigScope};
pub use error::{Error, Result};
pub use extract::{RegisteredEntry, RegistrationExtractor, Registrations};
pub use job::JobSlot;
pub use monitor::{ChangeEvent, ChangeMonitor, WatchSet};
pub use patch::{EntryReport, EntryStatus, PatchPlan, PatchPreview, TextPatchEngine};
pub use reconcile::{Reconciliation, ReconciliationEngine};
pub use registrar::{BuildOutput, MutationOptions, MutationOutcome, Registrar, Snippet};
pub use report::{EntryState, Report, ReportEntry};
pub use scanner::{Origin, ResourceEntity, ResourceScanner};
pub use session::{Session, SessionLock, SessionState};
pub use settings::Settings;
