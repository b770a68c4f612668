//! Tests for the `show` and `recommend` commands.

use assert_cmd::Command;
use predicates::prelude::*;

use crate::UNREACHABLE;

/// Every fetch fails, yet the draft still opens empty.
#[test]
fn test_show_tolerates_unreachable_backend() {
    let mut cmd = Command::cargo_bin("devconf").unwrap();
    cmd.args(["--api-base", UNREACHABLE, "show", "0xa1", "--type", "zigbee"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0xa1 (zigbee 0xa1)"))
        .stdout(predicate::str::contains("No attributes available for device."));
}

#[test]
fn test_show_json_draft() {
    let mut cmd = Command::cargo_bin("devconf").unwrap();
    cmd.args(["--api-base", UNREACHABLE, "--json", "show", "node-7", "-t", "lora"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"device_id\": \"node-7\""))
        .stdout(predicate::str::contains("\"type\": \"lora\""));
}

#[test]
fn test_recommend_missing_attribute_fails() {
    let mut cmd = Command::cargo_bin("devconf").unwrap();
    cmd.args([
        "--api-base",
        UNREACHABLE,
        "recommend",
        "0xa1",
        "--type",
        "zigbee",
        "--attribute",
        "temp",
    ]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Attribute not found: temp"));
}
