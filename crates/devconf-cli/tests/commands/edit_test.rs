//! Tests for the `edit` command.

use assert_cmd::Command;
use predicates::prelude::*;

use crate::UNREACHABLE;

#[test]
fn test_edit_help_lists_case_formats() {
    let mut cmd = Command::cargo_bin("devconf").unwrap();
    cmd.args(["edit", "--help"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("camel, snake, pascal, kebab"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--force"));
}

#[test]
fn test_edit_rejects_unknown_case_format() {
    let mut cmd = Command::cargo_bin("devconf").unwrap();
    cmd.args(["edit", "0xa1", "--type", "zigbee", "--case", "upper"]);

    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("upper"));
}

#[test]
fn test_edit_rejects_malformed_assignment() {
    let mut cmd = Command::cargo_bin("devconf").unwrap();
    cmd.args(["edit", "0xa1", "--type", "zigbee", "--option", "temp"]);

    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("expected ATTRIBUTE=VALUE"));
}

#[test]
fn test_edit_dry_run_applies_edits_locally() {
    let mut cmd = Command::cargo_bin("devconf").unwrap();
    cmd.args([
        "--api-base",
        UNREACHABLE,
        "edit",
        "0xa1",
        "--type",
        "zigbee",
        "--option",
        "temp=field",
        "--proc",
        "temp=round2",
        "--name",
        "Kitchen",
        "--dry-run",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Kitchen (zigbee 0xa1)"))
        .stdout(predicate::str::contains("round2"));
}

#[test]
fn test_edit_blank_device_name_fails() {
    let mut cmd = Command::cargo_bin("devconf").unwrap();
    cmd.args([
        "--api-base",
        UNREACHABLE,
        "edit",
        "0xa1",
        "--type",
        "zigbee",
        "--name",
        "  ",
        "--dry-run",
    ]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));
}

/// Without the stored configuration the draft is uncustomized; saving it
/// would overwrite the operator's settings.
#[test]
fn test_edit_refuses_save_when_stored_config_unknown() {
    let mut cmd = Command::cargo_bin("devconf").unwrap();
    cmd.args(["--api-base", UNREACHABLE, "edit", "0xa1", "--type", "zigbee"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("could not be loaded"))
        .stderr(predicate::str::contains("--force"))
        .stderr(predicate::str::contains("Save configuration failed").not());
}

#[test]
fn test_edit_force_attempts_save() {
    let mut cmd = Command::cargo_bin("devconf").unwrap();
    cmd.args([
        "--api-base",
        UNREACHABLE,
        "--timeout",
        "2",
        "edit",
        "0xa1",
        "--type",
        "zigbee",
        "--force",
    ]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Save configuration failed"));
}
