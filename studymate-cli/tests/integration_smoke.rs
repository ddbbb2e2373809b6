//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("studymate").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("migrate"));
}

#[test]
fn test_serve_help() {
    let mut cmd = Command::cargo_bin("studymate").unwrap();
    cmd.arg("serve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--in-memory"))
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("DB_USER"));
}

#[test]
fn test_migrate_help() {
    let mut cmd = Command::cargo_bin("studymate").unwrap();
    cmd.arg("migrate").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--database-url"));
}

#[test]
fn test_invalid_port_rejected() {
    let mut cmd = Command::cargo_bin("studymate").unwrap();
    cmd.arg("serve").arg("--in-memory").arg("--port").arg("not-a-port");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
