//! End-to-end tests that invoke the compiled `iconreg` binary against a
//! temporary plugin tree.

use assert_cmd::Command;
use iconreg_test_utils::plugin::{PERSISTENT_CONFIG, REGISTRY_FILE, STYLE_FILE};
use iconreg_test_utils::{TestPlugin, registry_line, style_line};
use predicates::prelude::*;

/// Command for the binary, pointed at `plugin`, with colors disabled.
fn iconreg(plugin: &TestPlugin) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_iconreg"));
    cmd.current_dir(plugin.root())
        .env("NO_COLOR", "1")
        .env_remove("ICONREG_PLUGIN")
        .env_remove("ICONREG_PROJECT")
        .env_remove("ICONREG_CONFIG")
        .arg("--plugin")
        .arg(plugin.plugin_root());
    cmd
}

fn plugin_with(resources: &[&str], registered: &[&str]) -> TestPlugin {
    let plugin = TestPlugin::new();
    plugin.add_resources(resources);
    plugin.write_artifacts(registered);
    plugin
}

// ============================================================================
// Help
// ============================================================================

#[test]
fn test_help_lists_commands() {
    Command::new(env!("CARGO_BIN_EXE_iconreg"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("rename"))
        .stdout(predicate::str::contains("backup"));
}

// ============================================================================
// Read-only commands
// ============================================================================

#[test]
fn test_check_reports_drift() {
    let plugin = plugin_with(&["a", "b"], &["a", "gone"]);

    iconreg(&plugin)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("MISSING"))
        .stdout(predicate::str::contains("b"))
        .stdout(predicate::str::contains("UtilityExtend.gone"));
}

#[test]
fn test_status_json() {
    let plugin = plugin_with(&["a", "b"], &["a"]);

    let output = iconreg(&plugin)
        .args(["status", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["resources"].as_array().unwrap().len(), 2);
    assert_eq!(report["entries"][1]["name"], "b");
    assert_eq!(report["entries"][1]["state"], "missing");
}

#[test]
fn test_snippet_prints_both_lines() {
    let plugin = TestPlugin::new();

    iconreg(&plugin)
        .args(["snippet", "NEXIcon"])
        .assert()
        .success()
        .stdout(predicate::str::contains(style_line("NEXIcon")))
        .stdout(predicate::str::contains(registry_line("NEXIcon", "NEXIcon")));
}

#[test]
fn test_report_save_writes_file() {
    let plugin = plugin_with(&["a"], &["a"]);

    iconreg(&plugin)
        .args(["report", "--save"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Icon Registration Report"))
        .stdout(predicate::str::contains("Report saved to"));

    let reports = plugin.plugin_root().join(".iconreg/reports");
    assert_eq!(std::fs::read_dir(reports).unwrap().count(), 1);
}

// ============================================================================
// Mutations
// ============================================================================

#[test]
fn test_sync_dry_run_leaves_files() {
    let plugin = plugin_with(&["a", "b"], &["a"]);
    let before = plugin.read(STYLE_FILE);

    iconreg(&plugin)
        .args(["sync", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("UtilityExtend.b"));

    assert_eq!(plugin.read(STYLE_FILE), before);
}

#[test]
fn test_sync_then_check_is_clean() {
    let plugin = plugin_with(&["a", "b"], &["a", "gone"]);

    iconreg(&plugin)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup"));

    plugin.assert_file_contains(STYLE_FILE, &style_line("b"));
    plugin.assert_file_not_contains(REGISTRY_FILE, "UtilityExtend.gone");

    iconreg(&plugin)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("All resources are registered"));
}

#[test]
fn test_rename() {
    let plugin = plugin_with(&["a"], &["a"]);

    iconreg(&plugin)
        .args(["rename", "a", "Alpha"])
        .assert()
        .success();

    plugin.assert_file_contains(REGISTRY_FILE, &registry_line("a", "Alpha"));
}

#[test]
fn test_missing_artifact_exits_with_error() {
    let plugin = plugin_with(&["a", "b"], &["a"]);
    plugin.remove(REGISTRY_FILE);

    iconreg(&plugin)
        .arg("register")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("Artifact not found"));
}

#[test]
fn test_prune_reports_entries_it_could_not_apply() {
    let plugin = plugin_with(&[], &[]);
    plugin.register_outside_anchors("Legacy");

    iconreg(&plugin)
        .arg("prune")
        .assert()
        .failure()
        .stdout(predicate::str::contains("UtilityExtend.Legacy failed"))
        .stdout(predicate::str::contains("Nothing to change").not())
        .stderr(predicate::str::contains("2 entries could not be applied"));

    plugin.assert_file_contains(STYLE_FILE, &style_line("Legacy"));
}

#[test]
fn test_prune_applies_the_rest_of_a_failing_batch() {
    let plugin = plugin_with(&["a"], &["a", "stale"]);
    plugin.register_outside_anchors("Legacy");

    iconreg(&plugin)
        .arg("prune")
        .assert()
        .failure()
        .stdout(predicate::str::contains("deleted UtilityExtend.stale"))
        .stdout(predicate::str::contains("Backup"))
        .stderr(predicate::str::contains("could not be applied"));

    plugin.assert_file_not_contains(STYLE_FILE, "UtilityExtend.stale");
    plugin.assert_file_contains(REGISTRY_FILE, &registry_line("Legacy", "Legacy"));
}

#[test]
fn test_snippet_rejects_quoted_name() {
    let plugin = TestPlugin::new();

    iconreg(&plugin)
        .args(["snippet", "say\"hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value for resource name"));
}

#[test]
fn test_build_without_command_fails_before_output() {
    let plugin = TestPlugin::new();

    iconreg(&plugin)
        .arg("build")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no build command configured"));
}

#[test]
fn test_buttons_list_and_edit() {
    let plugin = plugin_with(&["a"], &["a"]);
    plugin.write_persistent_config(&[
        r#"(ButtonName="Open",ButtonType=SingleButton,BoundClass="/Game/BP_Open.BP_Open_C",ButtonIconName="a")"#,
    ]);

    iconreg(&plugin)
        .args(["buttons", "list", "--scope", "persistent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[0] Open"));

    iconreg(&plugin)
        .args(["buttons", "edit", "persistent", "0", "--type", "dropdown", "--dropdown-items", "(Name=\"X\")"])
        .assert()
        .success();

    plugin.assert_file_contains(
        PERSISTENT_CONFIG,
        r#"ButtonType=DropdownButton,BoundClass="/Game/BP_Open.BP_Open_C",ButtonIconName="a",DropdownItems=(Name="X")"#,
    );
}

#[test]
fn test_buttons_edit_requires_a_change() {
    let plugin = TestPlugin::new();
    plugin.write_persistent_config(&[]);

    iconreg(&plugin)
        .args(["buttons", "edit", "persistent", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to edit"));
}

// ============================================================================
// Backups
// ============================================================================

#[test]
fn test_backup_create_list_restore() {
    let plugin = plugin_with(&["a"], &["a"]);
    let before = plugin.read(STYLE_FILE);

    iconreg(&plugin)
        .args(["backup", "create", "checkpoint"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created backup"));

    let backups = plugin.plugin_root().join(".iconreg/backups");
    let id = std::fs::read_dir(&backups)
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .file_name()
        .to_string_lossy()
        .into_owned();

    iconreg(&plugin)
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("checkpoint"));

    plugin.write(STYLE_FILE, "broken\n");

    iconreg(&plugin)
        .args(["backup", "restore", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restore complete"));
    assert_eq!(plugin.read(STYLE_FILE), before);

    iconreg(&plugin)
        .args(["backup", "delete", &id])
        .assert()
        .success();
    iconreg(&plugin)
        .args(["backup", "show", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Backup not found"));
}

// ============================================================================
// Resources
// ============================================================================

#[test]
fn test_import_then_register() {
    let plugin = plugin_with(&[], &[]);
    plugin.write("incoming/fresh.svg", "<svg/>");

    iconreg(&plugin)
        .arg("import")
        .arg(plugin.path("incoming/fresh.svg"))
        .assert()
        .success()
        .stdout(predicate::str::contains("iconreg register"));

    iconreg(&plugin)
        .arg("import")
        .arg(plugin.path("incoming/fresh.svg"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Resource already exists"));

    iconreg(&plugin).arg("register").assert().success();
    plugin.assert_file_contains(STYLE_FILE, &style_line("fresh"));
}
