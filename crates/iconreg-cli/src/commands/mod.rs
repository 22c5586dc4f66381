//! Command implementations for iconreg-cli

pub mod backup;
pub mod build;
pub mod buttons;
pub mod registrations;
pub mod report;
pub mod resources;
pub mod status;
pub mod watch;

pub use backup::{run_backup_create, run_backup_delete, run_backup_list, run_backup_restore, run_backup_show};
pub use build::run_build;
pub use buttons::{run_buttons_edit, run_buttons_list};
pub use registrations::{run_prune, run_register, run_rename, run_sync};
pub use report::run_report;
pub use resources::{run_import, run_snippet};
pub use status::{run_check, run_status};
pub use watch::run_watch;

use colored::Colorize;
use iconreg_core::{EntryStatus, MutationOutcome};

use crate::error::{CliError, Result};

/// Print the per-entry results, diff preview and checkpoint of a mutation.
///
/// Entries that could not be applied are listed and turn the command into
/// an error, even when everything else in the batch went through.
pub(crate) fn print_outcome(outcome: &MutationOutcome) -> Result<()> {
    for warning in &outcome.warnings {
        println!("   {} {}", "!".yellow(), warning);
    }

    for entry in &outcome.entries {
        let marker = match entry.status {
            EntryStatus::Inserted => "+".green(),
            EntryStatus::Deleted(_) => "-".red(),
            EntryStatus::Renamed(_) => "~".cyan(),
            EntryStatus::AlreadyPresent => "=".dimmed(),
            EntryStatus::Failed(_) => "!".red().bold(),
        };
        println!("   {} {}", marker, entry);
    }

    if outcome.is_noop() {
        println!("{} Nothing to change.", "OK".green().bold());
        return Ok(());
    }

    if outcome.dry_run {
        if !outcome.preview.is_empty() {
            println!();
            print!("{}", outcome.preview);
            println!();
        }
        println!("{} Dry run, nothing was written.", "=>".blue().bold());
    } else {
        if let Some(backup) = &outcome.backup {
            println!("{} Backup {}", "=>".blue().bold(), backup.backup_id.cyan());
        }
        for path in &outcome.written {
            println!("{} Updated {}", "OK".green().bold(), path);
        }
    }

    match outcome.failures().count() {
        0 => Ok(()),
        1 => Err(CliError::user("1 entry could not be applied")),
        n => Err(CliError::user(format!("{n} entries could not be applied"))),
    }
}
