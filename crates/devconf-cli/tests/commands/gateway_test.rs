//! Tests for the `gateway` command.

use assert_cmd::Command;
use predicates::prelude::*;

use crate::UNREACHABLE;

#[test]
fn test_gateway_help_lists_actions() {
    let mut cmd = Command::cargo_bin("devconf").unwrap();
    cmd.args(["gateway", "--help"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("delete"));
}

#[test]
fn test_gateway_add_requires_name() {
    let mut cmd = Command::cargo_bin("devconf").unwrap();
    cmd.args(["gateway", "add", "a84041ffff1e2b3c"]);

    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--name"));
}

/// Validation happens before any request, so an unreachable backend is
/// never contacted.
#[test]
fn test_gateway_add_rejects_short_id() {
    let mut cmd = Command::cargo_bin("devconf").unwrap();
    cmd.args(["--api-base", UNREACHABLE, "gateway", "add", "a84041", "--name", "Roof"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("16-character hex"))
        .stderr(predicate::str::contains("Add gateway failed").not());
}

#[test]
fn test_gateway_add_unreachable_backend_fails() {
    let mut cmd = Command::cargo_bin("devconf").unwrap();
    cmd.args([
        "--api-base",
        UNREACHABLE,
        "gateway",
        "add",
        "0xA84041FFFF1E2B3C",
        "--name",
        "Roof",
    ]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Add gateway failed"));
}

#[test]
fn test_gateway_list_unreachable_backend_fails() {
    let mut cmd = Command::cargo_bin("devconf").unwrap();
    cmd.args(["--api-base", UNREACHABLE, "gateway", "list"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("List gateways failed"));
}
