//! Status and check command implementations

use colored::Colorize;

use iconreg_core::{EntryState, Registrar};

use crate::error::Result;

/// Run the status command
pub fn run_status(registrar: &Registrar, json: bool) -> Result<()> {
    let report = registrar.render_report();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Icon Registration Status".bold());
    println!();
    println!("{}:    {}", "Plugin".dimmed(), report.plugin_root);
    println!(
        "{}:   {}",
        "Project".dimmed(),
        report.project_root.as_deref().unwrap_or("(none)")
    );
    println!(
        "{}: {}",
        "Namespace".dimmed(),
        registrar.settings().plugin_name.cyan()
    );
    println!();

    println!("{}:", "Resources".bold());
    println!("  {} found, {} registered", report.resources.len(), report.registered);
    for entry in &report.entries {
        let state = match entry.state {
            EntryState::Registered => "registered".green(),
            EntryState::Missing => "missing".yellow(),
        };
        match &entry.friendly_name {
            Some(friendly) => println!("  {} {} ({}, {})", "+".green(), entry.name.cyan(), state, friendly),
            None => println!("  {} {} ({})", "+".green(), entry.name.cyan(), state),
        }
    }

    if !report.orphaned.is_empty() {
        println!();
        println!("{}:", "Orphaned".bold());
        for name in &report.orphaned {
            println!("  {} {}", "-".red(), name);
        }
    }

    if !report.warnings.is_empty() {
        println!();
        println!("{}:", "Warnings".bold());
        for warning in &report.warnings {
            println!("  {} {}", "!".yellow(), warning);
        }
    }

    Ok(())
}

/// Run the check command
pub fn run_check(registrar: &Registrar) -> Result<()> {
    println!("{} Checking icon registrations...", "=>".blue().bold());

    let reconciliation = registrar.reconcile();
    if reconciliation.is_clean() {
        println!("{} All resources are registered.", "OK".green().bold());
        return Ok(());
    }

    if !reconciliation.missing.is_empty() {
        println!("{} Unregistered resources:", "MISSING".yellow().bold());
        for resource in &reconciliation.missing {
            println!(
                "   {} {} ({})",
                "-".yellow(),
                resource.name.cyan(),
                resource.origin.to_string().dimmed()
            );
        }
    }
    if !reconciliation.orphaned.is_empty() {
        println!("{} Registrations without a resource:", "ORPHANED".red().bold());
        for name in &reconciliation.orphaned {
            println!("   {} {}", "!".red(), name.cyan());
        }
    }
    println!();
    println!("Run {} to repair.", "iconreg sync".cyan());
    Ok(())
}
