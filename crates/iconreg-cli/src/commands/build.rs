//! Build command implementation

use std::time::Duration;

use colored::Colorize;

use iconreg_core::Registrar;

use crate::error::{CliError, Result};

const PROGRESS_INTERVAL: Duration = Duration::from_secs(10);

/// Run the build command
///
/// The build runs as a background job; this command waits for its result
/// on a current-thread runtime and prints progress while it runs.
pub fn run_build(registrar: &Registrar) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    // fails before any output when no command is configured
    let mut done = registrar.start_build()?;
    let command = registrar.settings().build_command.join(" ");
    println!("{} Building: {}", "=>".blue().bold(), command.cyan());
    let received = runtime.block_on(async {
        let mut progress = tokio::time::interval(PROGRESS_INTERVAL);
        progress.tick().await;

        loop {
            tokio::select! {
                result = &mut done => break result,
                _ = progress.tick() => {
                    println!("   {} still building...", "..".dimmed());
                }
            }
        }
    });
    let output = received.map_err(|_| CliError::user("build job ended without a result"))??;

    if !output.stdout.is_empty() {
        print!("{}", output.stdout);
    }
    if !output.stderr.is_empty() {
        eprint!("{}", output.stderr);
    }

    if output.success {
        println!("{} Build succeeded.", "OK".green().bold());
        Ok(())
    } else {
        Err(CliError::user(match output.code {
            Some(code) => format!("build failed with exit code {code}"),
            None => "build terminated by signal".to_string(),
        }))
    }
}
