//! Integration tests for the `tellive` CLI binary.
//!
//! These validate argument parsing, help output, and error handling — all
//! without requiring a live Telldus account.
#![allow(clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `tellive` binary with env isolation.
///
/// Clears all `TELLDUS_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn tellive_cmd() -> Command {
    let mut cmd = Command::cargo_bin("tellive").unwrap();
    cmd.env("HOME", "/tmp/tellive-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/tellive-cli-test-nonexistent")
        .env_remove("TELLDUS_PROFILE")
        .env_remove("TELLDUS_TIMEOUT")
        .env_remove("TELLDUS_PRIVATE_KEY")
        .env_remove("TELLDUS_TOKEN_SECRET");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = tellive_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    tellive_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Telldus Live")
            .and(predicate::str::contains("devices"))
            .and(predicate::str::contains("sensors"))
            .and(predicate::str::contains("dump")),
    );
}

#[test]
fn test_version_flag() {
    tellive_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tellive"));
}

// ── Config commands ─────────────────────────────────────────────────

#[test]
fn test_config_path_prints_a_path() {
    tellive_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── Error handling ──────────────────────────────────────────────────

#[test]
fn test_devices_without_config_fails_with_auth_code() {
    let output = tellive_cmd().arg("devices").output().unwrap();
    assert_eq!(output.status.code(), Some(3), "Expected exit code 3 (auth)");
    let text = combined_output(&output);
    assert!(
        text.contains("not found") || text.contains("config init"),
        "Expected a profile/config hint in output:\n{text}"
    );
}

#[test]
fn test_dim_requires_level() {
    let output = tellive_cmd().args(["dim", "1"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage exit code");
    let text = combined_output(&output);
    assert!(text.contains("--level") || text.contains("required"));
}

#[test]
fn test_unknown_subcommand_is_usage_error() {
    let output = tellive_cmd().arg("frobnicate").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}
