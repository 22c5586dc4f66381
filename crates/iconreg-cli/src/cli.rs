//! CLI argument parsing using clap derive

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Icon registrar - keep plugin icon resources and their registrations in sync
#[derive(Parser, Debug)]
#[command(name = "iconreg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Plugin root (detected from the current directory when omitted)
    #[arg(long, global = true, env = "ICONREG_PLUGIN")]
    pub plugin: Option<PathBuf>,

    /// Project root (detected from `*.uproject` when omitted)
    #[arg(long, global = true, env = "ICONREG_PROJECT")]
    pub project: Option<PathBuf>,

    /// Settings file (defaults to `iconreg.toml` at the plugin root)
    #[arg(long, global = true, env = "ICONREG_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show resources, registrations and drift
    Status {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List missing and orphaned registrations
    Check,

    /// Register every resource that has no registration
    Register {
        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,
    },

    /// Remove registrations whose resource file is gone
    Prune {
        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,
    },

    /// Prune and register in one step
    Sync {
        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,
    },

    /// Change the friendly name of a registered icon
    ///
    /// Examples:
    ///   iconreg rename NEXIcon "Nexus"
    ///   iconreg rename UtilityExtend.NEXIcon "Nexus" --old "NEXIcon"
    Rename {
        /// Resource name or qualified name
        icon: String,

        /// New friendly name
        new: String,

        /// Current friendly name (read from the registry when omitted)
        #[arg(long)]
        old: Option<String>,

        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,
    },

    /// Inspect or edit toolbar button configs
    Buttons {
        #[command(subcommand)]
        action: ButtonsAction,
    },

    /// Manage artifact backups
    Backup {
        #[command(subcommand)]
        action: BackupAction,
    },

    /// Print the registration report
    Report {
        /// Also write it under the report directory
        #[arg(long)]
        save: bool,
    },

    /// Copy an icon file into the plugin resources
    Import {
        /// Icon file to copy
        file: PathBuf,

        /// Overwrite an existing resource with the same name
        #[arg(long)]
        force: bool,
    },

    /// Print the registration lines for a resource name
    Snippet {
        /// Resource name (file stem)
        name: String,
    },

    /// Watch resources and artifacts and report drift as it appears
    Watch {
        /// Exit after the first detected change
        #[arg(long)]
        once: bool,
    },

    /// Run the configured build command
    Build,
}

/// Button config actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ButtonsAction {
    /// List configured buttons
    List {
        /// Only this scope (persistent or project)
        #[arg(long)]
        scope: Option<String>,
    },

    /// Edit the button at an index within a scope
    Edit {
        /// Scope (persistent or project)
        scope: String,

        /// Index within the scope, as shown by `buttons list`
        index: usize,

        /// New button name
        #[arg(long)]
        name: Option<String>,

        /// New button type (single or dropdown)
        #[arg(long = "type")]
        button_type: Option<String>,

        /// New icon friendly name
        #[arg(long)]
        icon: Option<String>,

        /// New dropdown items, as a parenthesized list
        #[arg(long)]
        dropdown_items: Option<String>,

        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,
    },
}

/// Backup actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum BackupAction {
    /// List backups, newest first
    List,

    /// Snapshot every artifact now
    Create {
        /// What the snapshot is for
        description: String,
    },

    /// Show the files of one backup
    Show {
        /// Backup id
        id: String,
    },

    /// Restore a backup (the current files are snapshotted first)
    Restore {
        /// Backup id
        id: String,
    },

    /// Delete a backup
    Delete {
        /// Backup id
        id: String,
    },
}
