//! Register, prune, sync and rename command implementations

use colored::Colorize;

use iconreg_core::{MutationOptions, Registrar};

use super::print_outcome;
use crate::error::Result;

fn options(dry_run: bool) -> MutationOptions {
    MutationOptions { dry_run }
}

/// Run the register command
pub fn run_register(registrar: &mut Registrar, dry_run: bool) -> Result<()> {
    println!("{} Registering missing resources...", "=>".blue().bold());
    let outcome = registrar.add_missing(options(dry_run))?;
    print_outcome(&outcome)
}

/// Run the prune command
pub fn run_prune(registrar: &mut Registrar, dry_run: bool) -> Result<()> {
    println!("{} Removing orphaned registrations...", "=>".blue().bold());
    let outcome = registrar.remove_orphaned(options(dry_run))?;
    print_outcome(&outcome)
}

/// Run the sync command
pub fn run_sync(registrar: &mut Registrar, dry_run: bool) -> Result<()> {
    println!("{} Synchronizing icon registrations...", "=>".blue().bold());
    let outcome = registrar.sync(options(dry_run))?;
    print_outcome(&outcome)
}

/// Run the rename command
pub fn run_rename(
    registrar: &mut Registrar,
    icon: &str,
    new: &str,
    old: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    println!(
        "{} Renaming {} to {}...",
        "=>".blue().bold(),
        icon.cyan(),
        new.cyan()
    );
    let outcome = registrar.rename_friendly_name(icon, new, old, options(dry_run))?;
    print_outcome(&outcome)
}
