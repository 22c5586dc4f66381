//! Backup command implementations

use colored::Colorize;

use iconreg_core::Registrar;

use crate::error::{CliError, Result};

/// Run the backup list command
pub fn run_backup_list(registrar: &Registrar) -> Result<()> {
    let backups = registrar.list_backups()?;
    if backups.is_empty() {
        println!("{}", "No backups".dimmed());
        return Ok(());
    }
    for backup in backups {
        println!(
            "{}  {}  {} ({} files)",
            backup.backup_id.cyan(),
            backup.created.format("%Y-%m-%d %H:%M:%S"),
            backup.description,
            backup.files.len()
        );
    }
    Ok(())
}

/// Run the backup create command
pub fn run_backup_create(registrar: &Registrar, description: &str) -> Result<()> {
    let manifest = registrar.snapshot(description)?;
    println!(
        "{} Created backup {} ({} files)",
        "OK".green().bold(),
        manifest.backup_id.cyan(),
        manifest.files.len()
    );
    Ok(())
}

/// Run the backup show command
pub fn run_backup_show(registrar: &Registrar, id: &str) -> Result<()> {
    let manifest = registrar.get_backup(id)?;
    println!("{}:      {}", "Backup".dimmed(), manifest.backup_id.cyan());
    println!("{}:     {}", "Created".dimmed(), manifest.created.to_rfc3339());
    println!("{}: {}", "Description".dimmed(), manifest.description);
    println!();
    for file in &manifest.files {
        println!("  {} {} ({})", "+".green(), file.original, file.checksum.dimmed());
    }
    Ok(())
}

/// Run the backup restore command
///
/// A partial restore is reported file by file and exits with an error.
pub fn run_backup_restore(registrar: &mut Registrar, id: &str) -> Result<()> {
    println!("{} Restoring backup {}...", "=>".blue().bold(), id.cyan());
    let report = registrar.restore_backup(id)?;

    for path in report.restored() {
        println!("   {} {}", "+".green(), path);
    }
    for failed in report.failed() {
        println!(
            "   {} {}: {}",
            "!".red(),
            failed.path,
            failed.error.as_deref().unwrap_or_default()
        );
    }

    report.into_result()?;
    println!("{} Restore complete.", "OK".green().bold());
    Ok(())
}

/// Run the backup delete command
pub fn run_backup_delete(registrar: &Registrar, id: &str) -> Result<()> {
    if registrar.delete_backup(id)? {
        println!("{} Deleted backup {}", "OK".green().bold(), id.cyan());
        Ok(())
    } else {
        Err(CliError::user(format!("Backup not found: {id}")))
    }
}
