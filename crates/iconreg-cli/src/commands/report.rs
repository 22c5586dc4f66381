//! Report command implementation

use colored::Colorize;

use iconreg_core::Registrar;

use crate::error::Result;

/// Run the report command
pub fn run_report(registrar: &Registrar, save: bool) -> Result<()> {
    print!("{}", registrar.render_report().render());

    if save {
        let path = registrar.write_report()?;
        println!();
        println!("{} Report saved to {}", "OK".green().bold(), path);
    }
    Ok(())
}
