//! CLI Integration Tests
//!
//! These tests run the `greenhouse` binary. None of them needs a gateway:
//! the ones that contact one point it at a closed local port.
//!
//! ```
//! cargo test --package greenhouse-cli --test cli_integration
//! ```

use std::path::Path;
use std::process::{Command, Output};

/// Port 9 (discard) is closed on test machines, so connections fail fast.
const DEAD_GATEWAY: &str = "http://127.0.0.1:9";

/// Run greenhouse with its configuration isolated under `config_home`.
fn run_greenhouse(config_home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_greenhouse"))
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env("NO_COLOR", "1")
        .env_remove("GREENHOUSE_GATEWAY")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run greenhouse binary")
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_command() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_greenhouse(dir.path(), &["--help"]);

    assert!(output.status.success(), "Help should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["dashboard", "read", "watch", "set", "config", "completions"] {
        assert!(stdout.contains(command), "Help should list {command}");
    }
}

#[test]
fn test_version_command() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_greenhouse(dir.path(), &["--version"]);

    assert!(output.status.success(), "Version should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_set_help_lists_ranges() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_greenhouse(dir.path(), &["set", "--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0-50"));
}

#[test]
fn test_completions_bash() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_greenhouse(dir.path(), &["completions", "bash"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("greenhouse"));
}

#[test]
fn test_no_color_env_accepts_conventional_values() {
    let dir = tempfile::tempdir().unwrap();
    for value in ["1", "yes", "true", ""] {
        let output = Command::new(env!("CARGO_BIN_EXE_greenhouse"))
            .args(["read", "--gateway", DEAD_GATEWAY])
            .env("XDG_CONFIG_HOME", dir.path())
            .env("NO_COLOR", value)
            .env_remove("GREENHOUSE_GATEWAY")
            .env_remove("RUST_LOG")
            .output()
            .unwrap();

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(!stderr.contains("invalid value"), "NO_COLOR={value:?}: {stderr}");
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Gateway unreachable"), "NO_COLOR={value:?}: {stdout}");
        if !value.is_empty() {
            assert!(!stdout.contains('\u{1b}'), "NO_COLOR={value:?} should disable color");
        }
    }
}

// =============================================================================
// Actuator Commands
// =============================================================================

#[test]
fn test_set_rejects_out_of_range_value() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_greenhouse(
        dir.path(),
        &["set", "temperature", "75", "--gateway", DEAD_GATEWAY],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("out of range"), "stderr: {stderr}");
    assert!(stderr.contains("actuator_temperature"), "stderr: {stderr}");
}

#[test]
fn test_set_rejects_unknown_actuator() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_greenhouse(dir.path(), &["set", "sprinkler", "10"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown actuator"), "stderr: {stderr}");
}

#[test]
fn test_set_reports_failure_when_gateway_is_down() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_greenhouse(
        dir.path(),
        &["set", "humidity", "60", "--gateway", DEAD_GATEWAY],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Failed to send command to actuator_humidity"),
        "stderr: {stderr}"
    );
}

// =============================================================================
// Read Command
// =============================================================================

#[test]
fn test_read_marks_every_sensor_offline_when_gateway_is_down() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_greenhouse(dir.path(), &["read", "--gateway", DEAD_GATEWAY]);

    assert!(!output.status.success(), "read should fail without a gateway");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Gateway unreachable"), "stdout: {stdout}");
    assert_eq!(stdout.matches("OFFLINE").count(), 3, "stdout: {stdout}");
}

#[test]
fn test_read_json_when_gateway_is_down() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_greenhouse(
        dir.path(),
        &["read", "--format", "json", "--gateway", DEAD_GATEWAY],
    );

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["gateway"], DEAD_GATEWAY);
    assert!(json["fetch_error"].is_string());

    let sensors = json["sensors"].as_array().unwrap();
    assert_eq!(sensors.len(), 3);
    for sensor in sensors {
        assert_eq!(sensor["error"], true);
        assert!(sensor["history"].as_array().unwrap().is_empty());
    }
}

// =============================================================================
// Config Command
// =============================================================================

#[test]
fn test_config_path() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_greenhouse(dir.path(), &["config", "path"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("greenhouse"));
    assert!(stdout.trim_end().ends_with("config.toml"));
}

#[test]
fn test_config_set_then_get() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_greenhouse(dir.path(), &["config", "set", "refresh-interval-ms", "5000"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let output = run_greenhouse(dir.path(), &["config", "get", "refresh-interval-ms"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "5000");
}

#[test]
fn test_config_rejects_invalid_value() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_greenhouse(dir.path(), &["config", "set", "actuator-light", "150"]);

    assert!(!output.status.success());
}
