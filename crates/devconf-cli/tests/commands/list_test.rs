//! Tests for the `list` command.

use assert_cmd::Command;
use predicates::prelude::*;

use crate::UNREACHABLE;

#[test]
fn test_list_help_mentions_type_filter() {
    let mut cmd = Command::cargo_bin("devconf").unwrap();
    cmd.args(["list", "--help"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--type"));
}

#[test]
fn test_list_unreachable_backend_fails() {
    let mut cmd = Command::cargo_bin("devconf").unwrap();
    cmd.args(["--api-base", UNREACHABLE, "list"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("List devices failed"));
}
