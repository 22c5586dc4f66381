//! Icon registrar CLI
//!
//! Keeps a plugin's icon resources, its generated style and registry
//! sources, and its toolbar button configs in agreement.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{BackupAction, ButtonsAction, Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // a subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);
    tracing::debug!("Verbose mode enabled");

    match cli.command {
        Some(cmd) => execute_command(&cli.global, cmd),
        None => {
            println!("{} Icon registrar CLI", "iconreg".green().bold());
            println!();
            println!("Run {} for available commands.", "iconreg --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(global: &cli::GlobalArgs, cmd: Commands) -> Result<()> {
    let mut registrar = context::open_registrar(global)?;

    match cmd {
        Commands::Status { json } => commands::run_status(&registrar, json),
        Commands::Check => commands::run_check(&registrar),
        Commands::Register { dry_run } => commands::run_register(&mut registrar, dry_run),
        Commands::Prune { dry_run } => commands::run_prune(&mut registrar, dry_run),
        Commands::Sync { dry_run } => commands::run_sync(&mut registrar, dry_run),
        Commands::Rename {
            icon,
            new,
            old,
            dry_run,
        } => commands::run_rename(&mut registrar, &icon, &new, old.as_deref(), dry_run),
        Commands::Buttons { action } => match action {
            ButtonsAction::List { scope } => {
                commands::run_buttons_list(&registrar, scope.as_deref())
            }
            ButtonsAction::Edit {
                scope,
                index,
                name,
                button_type,
                icon,
                dropdown_items,
                dry_run,
            } => commands::run_buttons_edit(
                &mut registrar,
                &scope,
                index,
                name,
                button_type.as_deref(),
                icon,
                dropdown_items,
                dry_run,
            ),
        },
        Commands::Backup { action } => match action {
            BackupAction::List => commands::run_backup_list(&registrar),
            BackupAction::Create { description } => {
                commands::run_backup_create(&registrar, &description)
            }
            BackupAction::Show { id } => commands::run_backup_show(&registrar, &id),
            BackupAction::Restore { id } => commands::run_backup_restore(&mut registrar, &id),
            BackupAction::Delete { id } => commands::run_backup_delete(&registrar, &id),
        },
        Commands::Report { save } => commands::run_report(&registrar, save),
        Commands::Import { file, force } => commands::run_import(&mut registrar, &file, force),
        Commands::Snippet { name } => commands::run_snippet(&registrar, &name),
        Commands::Watch { once } => commands::run_watch(&mut registrar, once),
        Commands::Build => commands::run_build(&registrar),
    }
}
