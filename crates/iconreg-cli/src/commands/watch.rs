//! Watch command implementation

use std::time::Duration;

use colored::Colorize;

use iconreg_core::{ChangeMonitor, Registrar};

use crate::error::Result;

/// Run the watch command
///
/// Rescans after every detected change and prints the resulting drift.
/// Runs until interrupted, or until the first change with `once`.
pub fn run_watch(registrar: &mut Registrar, once: bool) -> Result<()> {
    let interval = Duration::from_millis(registrar.settings().poll_interval_ms.max(50));
    let monitor = ChangeMonitor::spawn(
        registrar.watch_set(),
        interval,
        registrar.lock().clone(),
        registrar.state().scanned_at,
    )?;

    println!(
        "{} Watching {} (every {} ms, Ctrl-C to stop)",
        "=>".blue().bold(),
        registrar.layout().root(),
        interval.as_millis()
    );

    for event in monitor.events() {
        for path in &event.added {
            println!("   {} {}", "+".green(), path.display());
        }
        for path in &event.removed {
            println!("   {} {}", "-".red(), path.display());
        }
        for path in &event.modified {
            println!("   {} {}", "~".cyan(), path.display());
        }

        let state = registrar.scan()?;
        for warning in &state.warnings {
            println!("   {} {}", "!".yellow(), warning);
        }
        let reconciliation = registrar.reconcile();
        if reconciliation.is_clean() {
            println!("{} Registrations in sync.", "OK".green().bold());
        } else {
            println!(
                "{} {} missing, {} orphaned. Run {} to repair.",
                "DRIFT".yellow().bold(),
                reconciliation.missing.len(),
                reconciliation.orphaned.len(),
                "iconreg sync".cyan()
            );
        }

        if once {
            break;
        }
    }

    monitor.stop();
    Ok(())
}
