//! Basic CLI tests for the devconf command-line interface.

use assert_cmd::Command;
use predicates::prelude::*;

mod commands;

/// Backend address nothing listens on.
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("devconf").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Reconcile device attributes"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("recommend"))
        .stdout(predicate::str::contains("edit"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("gateway"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("devconf").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("devconf"));
}

#[test]
fn test_global_flags_accepted() {
    let mut cmd = Command::cargo_bin("devconf").unwrap();
    cmd.args([
        "--verbose",
        "--json",
        "--timeout",
        "5",
        "--api-base",
        UNREACHABLE,
        "--help",
    ]);

    cmd.assert().success();
}

#[test]
fn test_no_subcommand_shows_error() {
    let mut cmd = Command::cargo_bin("devconf").unwrap();

    cmd.assert().failure().code(2);
}

#[test]
fn test_unknown_device_type_rejected() {
    let mut cmd = Command::cargo_bin("devconf").unwrap();
    cmd.args(["show", "0xa1", "--type", "wifi"]);

    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("wifi"));
}
