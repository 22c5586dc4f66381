//! Button config command implementations

use colored::Colorize;

use iconreg_core::{ButtonEdit, ButtonType, ConfigScope, MutationOptions, Registrar};

use super::print_outcome;
use crate::error::{CliError, Result};

fn parse_scope(scope: &str) -> Result<ConfigScope> {
    scope
        .parse()
        .map_err(|e: iconreg_core::Error| CliError::user(e.to_string()))
}

/// Run the buttons list command
pub fn run_buttons_list(registrar: &Registrar, scope: Option<&str>) -> Result<()> {
    let scopes = match scope {
        Some(scope) => vec![parse_scope(scope)?],
        None => ConfigScope::ALL.to_vec(),
    };

    for scope in scopes {
        println!("{} {}:", "Buttons".bold(), scope.to_string().cyan());
        let buttons: Vec<_> = registrar.state().buttons_in(scope).collect();
        if buttons.is_empty() {
            println!("  {}", "None".dimmed());
        }
        for (index, button) in buttons.iter().enumerate() {
            println!(
                "  [{}] {} ({}) icon={} class={}",
                index,
                button.name.cyan(),
                button.button_type,
                button.icon,
                button.bound_class.dimmed()
            );
            if let Some(items) = &button.dropdown_items {
                println!("      items={}", items.dimmed());
            }
        }
        println!();
    }
    Ok(())
}

/// Run the buttons edit command
#[allow(clippy::too_many_arguments)]
pub fn run_buttons_edit(
    registrar: &mut Registrar,
    scope: &str,
    index: usize,
    name: Option<String>,
    button_type: Option<&str>,
    icon: Option<String>,
    dropdown_items: Option<String>,
    dry_run: bool,
) -> Result<()> {
    let scope = parse_scope(scope)?;
    let button_type = button_type
        .map(|t| t.parse::<ButtonType>())
        .transpose()
        .map_err(|e| CliError::user(e.to_string()))?;
    let edit = ButtonEdit {
        name,
        button_type,
        icon,
        dropdown_items,
    };
    if edit.is_empty() {
        return Err(CliError::user(
            "nothing to edit: pass --name, --type, --icon or --dropdown-items",
        ));
    }

    println!(
        "{} Editing {} button {}...",
        "=>".blue().bold(),
        scope,
        index
    );
    let outcome = registrar.edit_button(scope, index, &edit, MutationOptions { dry_run })?;
    print_outcome(&outcome)
}
