//! Import and snippet command implementations

use std::path::Path;

use colored::Colorize;

use iconreg_core::Registrar;

use crate::error::Result;

/// Run the import command
pub fn run_import(registrar: &mut Registrar, file: &Path, force: bool) -> Result<()> {
    let resource = registrar.import_resource(file, force)?;
    println!(
        "{} Imported {} to {}",
        "OK".green().bold(),
        resource.name.cyan(),
        resource.path
    );

    if registrar
        .reconcile()
        .missing
        .iter()
        .any(|m| m.name == resource.name)
    {
        println!("Run {} to register it.", "iconreg register".cyan());
    }
    Ok(())
}

/// Run the snippet command
pub fn run_snippet(registrar: &Registrar, name: &str) -> Result<()> {
    let snippet = registrar.snippet(name)?;
    let layout = registrar.layout();

    println!("{} {}", "//".dimmed(), layout.style_file().as_str().dimmed());
    println!("{}", snippet.style_line);
    println!();
    println!("{} {}", "//".dimmed(), layout.registry_file().as_str().dimmed());
    println!("{}", snippet.registry_line);
    Ok(())
}
