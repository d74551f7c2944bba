//! CLI Integration Tests
//!
//! Verify the wiring between the CLI and didfolio-core end-to-end against a
//! temporary data directory.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Create a CLI command with a temporary data directory
fn cli_cmd(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("didfolio").expect("Failed to find didfolio binary");
    cmd.arg("--data-dir").arg(data_dir.path());
    cmd
}

/// Extract the identity reference for the local wallet from whoami output
fn local_identity_ref(data_dir: &TempDir) -> String {
    let output = cli_cmd(data_dir).arg("whoami").output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let account = stdout
        .lines()
        .find_map(|line| line.strip_prefix("Account: "))
        .expect("whoami output has an Account line");
    format!("{}@eip155:1", account.trim())
}

#[test]
fn test_whoami_shows_account_and_did() {
    let data_dir = TempDir::new().unwrap();

    cli_cmd(&data_dir)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Account: 0x"))
        .stdout(predicate::str::contains("DID: did:folio:z"))
        .stdout(predicate::str::contains("Data directory:"));
}

#[test]
fn test_whoami_identity_is_stable() {
    let data_dir = TempDir::new().unwrap();

    let first = cli_cmd(&data_dir).arg("whoami").output().unwrap();
    let second = cli_cmd(&data_dir).arg("whoami").output().unwrap();
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_read_with_no_profile() {
    let data_dir = TempDir::new().unwrap();

    cli_cmd(&data_dir)
        .arg("read")
        .assert()
        .success()
        .stdout(predicate::str::contains("No profile, please create one..."));
}

#[test]
fn test_set_then_read_roundtrip() {
    let data_dir = TempDir::new().unwrap();

    cli_cmd(&data_dir)
        .args(["set", "--name", "Ada", "--avatar", "https://x/y.png"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile updated!"));

    cli_cmd(&data_dir)
        .arg("read")
        .assert()
        .success()
        .stdout(predicate::str::contains("Name: Ada"))
        .stdout(predicate::str::contains("Avatar: https://x/y.png"));
}

#[test]
fn test_partial_set_preserves_other_field() {
    let data_dir = TempDir::new().unwrap();

    cli_cmd(&data_dir)
        .args(["set", "--name", "Ada"])
        .assert()
        .success();

    cli_cmd(&data_dir)
        .args(["set", "--avatar", "https://x/y.png"])
        .assert()
        .success();

    cli_cmd(&data_dir)
        .arg("read")
        .assert()
        .success()
        .stdout(predicate::str::contains("Name: Ada"))
        .stdout(predicate::str::contains("Avatar: https://x/y.png"));
}

#[test]
fn test_read_by_identity_reference() {
    let data_dir = TempDir::new().unwrap();

    cli_cmd(&data_dir)
        .args(["set", "--name", "Ada"])
        .assert()
        .success();

    let identity_ref = local_identity_ref(&data_dir);
    cli_cmd(&data_dir)
        .args(["read", "--identity", &identity_ref])
        .assert()
        .success()
        .stdout(predicate::str::contains("Name: Ada"));
}

#[test]
fn test_read_by_unknown_identity() {
    let data_dir = TempDir::new().unwrap();

    cli_cmd(&data_dir)
        .args(["read", "--identity", "0xnobody@eip155:1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No profile stored for"));
}

#[test]
fn test_set_without_fields_fails() {
    let data_dir = TempDir::new().unwrap();

    cli_cmd(&data_dir)
        .arg("set")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to set"));
}
