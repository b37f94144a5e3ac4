//! CLI smoke tests for the expenses-server binary
//!
//! These run the real binary: help output, configuration validation,
//! `--print-config`, `check` and `seed`.

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::timeout;

/// Helper to run the expenses-server binary with given arguments
fn run_expenses_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_expenses-server"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute expenses-server")
}

/// Writes a config into `dir` that keeps logs and data inside it.
fn write_config(dir: &Path, storage: &str) -> String {
    let config_path = dir.join("config.yaml");
    let content = format!(
        r#"
server:
  host: "127.0.0.1"
  port: 0

storage:
{storage}

logging:
  default:
    console_level: "warn"
    file: "logs/expenses.log"
    file_level: "info"
"#
    );
    std::fs::write(&config_path, content).expect("Failed to write config");
    config_path.to_string_lossy().to_string()
}

#[test]
fn test_cli_help_command() {
    let output = run_expenses_server(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("expenses-server"), "Should contain binary name");
    assert!(
        stdout.contains("Usage:") || stdout.contains("USAGE:"),
        "Should contain usage information"
    );
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("seed"), "Should contain 'seed' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--data-file"), "Should mention data file option");
}

#[test]
fn test_cli_version_command() {
    let output = run_expenses_server(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("expenses-server"), "Should contain binary name");
    assert!(
        stdout.chars().any(|c| c.is_ascii_digit()),
        "Should contain version numbers"
    );
}

#[test]
fn test_cli_invalid_command() {
    let output = run_expenses_server(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error") || stderr.contains("unrecognized"),
        "Should contain error message"
    );
}

#[test]
fn test_cli_config_validation_missing_file() {
    let output = run_expenses_server(&["--config", "/nonexistent/config.yaml", "check"]);

    assert!(!output.status.success(), "Should fail with missing config file");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Config file not found"),
        "Should report the missing file, got: {stderr}"
    );
}

#[test]
fn test_cli_config_validation_invalid_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("invalid.yaml");
    std::fs::write(&config_path, "invalid: yaml: content: [unclosed")
        .expect("Failed to write invalid config");

    let output = run_expenses_server(&["--config", config_path.to_str().unwrap(), "check"]);

    assert!(!output.status.success(), "Should fail with invalid YAML");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("yaml") || stderr.contains("parse"),
        "Should mention YAML parsing error, got: {stderr}"
    );
}

#[test]
fn test_cli_unknown_config_key_is_rejected() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), "  data_fle: \"typo.json\"");

    let output = run_expenses_server(&["--config", &config_path, "check"]);

    assert!(!output.status.success(), "Unknown keys should be rejected");
}

#[test]
fn test_cli_print_config() {
    let output = run_expenses_server(&["--print-config", "--port", "4321"]);

    assert!(output.status.success(), "Print config should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("server:"), "Should print the server section");
    assert!(stdout.contains("4321"), "CLI port should override the default");
    assert!(stdout.contains("gastos.json"), "Should print the default data file");
}

#[test]
fn test_cli_check_file_storage() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), "  data_file: \"data/gastos.json\"");

    let output = run_expenses_server(&["--config", &config_path, "check"]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "Check should pass, stderr: {stderr}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration check passed (storage: file)"));
    assert!(stdout.contains("data/gastos.json"));
}

#[test]
fn test_cli_check_rejects_unsupported_database() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        temp_dir.path(),
        "  database:\n    url: \"mysql://localhost/gastos\"",
    );

    let output = run_expenses_server(&["--config", &config_path, "check"]);

    assert!(!output.status.success(), "Unsupported scheme should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unsupported database type"), "got: {stderr}");
}

#[test]
fn test_cli_seed_file_storage() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), "  use_file_storage: true");
    let data_file = temp_dir.path().join("seeded.json");

    let output = run_expenses_server(&[
        "--config",
        &config_path,
        "--data-file",
        data_file.to_str().unwrap(),
        "seed",
    ]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "Seed should succeed, stderr: {stderr}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Seeded 8 expenses"), "got: {stdout}");

    let raw = std::fs::read_to_string(&data_file).expect("seed writes the data file");
    let records: serde_json::Value = serde_json::from_str(&raw).expect("valid JSON");
    assert_eq!(records.as_array().map(Vec::len), Some(8));

    // Seeding again replaces rather than appends
    let output = run_expenses_server(&[
        "--config",
        &config_path,
        "--data-file",
        data_file.to_str().unwrap(),
        "seed",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("(8 removed)"), "got: {stdout}");
}

#[test]
fn test_cli_seed_sqlite_storage() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        temp_dir.path(),
        "  database:\n    url: \"sqlite://db/gastos.db\"\n    max_conns: 1",
    );

    let output = run_expenses_server(&["--config", &config_path, "seed"]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "Seed should succeed, stderr: {stderr}");
    assert!(temp_dir.path().join("db/gastos.db").exists());
}

#[tokio::test]
async fn test_cli_run_keeps_serving() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), "  use_file_storage: true");

    let mut cmd = tokio::process::Command::new(env!("CARGO_BIN_EXE_expenses-server"));
    cmd.args(["--config", &config_path, "run"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    // A healthy server is still running when the timeout fires
    let result = timeout(Duration::from_secs(2), cmd.output()).await;
    match result {
        Err(_) => {}
        Ok(Ok(output)) => panic!(
            "Server exited early: {}",
            String::from_utf8_lossy(&output.stderr)
        ),
        Ok(Err(e)) => panic!("Failed to spawn server: {e}"),
    }
}

#[test]
fn test_cli_subcommand_help() {
    for sub in ["run", "check", "seed"] {
        let output = run_expenses_server(&[sub, "--help"]);
        assert!(output.status.success(), "{sub} help should succeed");
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Usage:") || stdout.contains("USAGE:"));
    }
}

#[test]
fn test_cli_shipped_config_is_valid() {
    let config_path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/expenses.yaml");

    let output = run_expenses_server(&["--config", config_path.to_str().unwrap(), "--print-config"]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "Shipped config should load, stderr: {stderr}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sea_orm"));
    assert!(stdout.contains("max_description_length"));
}
