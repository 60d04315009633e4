//! Integration tests for `rustbom config` command.
//!
//! Tests config loading, validation and section display with real TOML files.

use std::fs;

use serial_test::serial;
use tempfile::TempDir;

use rustbom_cli::cli::{ConfigAction, ConfigArgs, OutputFormat};
use rustbom_cli::commands::config::{build_report, execute, load};
use rustbom_cli::output::OutputWriter;

const VALID_CONFIG: &str = r#"
[general]
log_level = "info"
log_format = "json"

[scan]
dependency_dir = "."
application = "demo-app"

[registry]
enabled = false

[output]
sbom_type = "cyclonedx"
format = "json"
"#;

#[tokio::test]
async fn test_config_load_valid_toml() {
    // Given: A valid config file
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("rustbom.toml");
    fs::write(&config_path, VALID_CONFIG).expect("should write config");

    // When: Loading the config explicitly
    let config = load(&config_path, true).await.expect("valid config should load");

    // Then: Values from the file are used
    assert_eq!(config.scan.application, "demo-app");
    assert!(!config.registry.enabled);
    assert_eq!(config.output.sbom_type, "cyclonedx");
}

#[tokio::test]
async fn test_config_load_malformed_toml() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("bad.toml");
    fs::write(&config_path, "[general\nlog_level = \"info\"\n").expect("should write bad config");

    let result = load(&config_path, true).await;
    assert!(result.is_err(), "malformed TOML should fail to load");
}

#[tokio::test]
async fn test_config_load_invalid_value() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("rustbom.toml");
    fs::write(&config_path, "[output]\nformat = \"xml\"\n").expect("should write config");

    let err = load(&config_path, true)
        .await
        .expect_err("unknown output format should fail validation");
    assert!(err.to_string().contains("output.format"));
}

#[tokio::test]
async fn test_config_missing_explicit_file_is_error() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("nope.toml");

    let result = load(&config_path, true).await;
    assert!(result.is_err(), "explicit --config must exist");
}

#[tokio::test]
#[serial]
async fn test_config_missing_default_file_uses_defaults() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("rustbom.toml");

    let config = load(&config_path, false)
        .await
        .expect("missing default file falls back to defaults");
    assert_eq!(config.output.sbom_type, "spdx");
    assert_eq!(config.output.format, "tag");
    assert!(config.registry.enabled);
}

#[tokio::test]
#[serial]
async fn test_config_env_override_applies() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("rustbom.toml");
    fs::write(&config_path, VALID_CONFIG).expect("should write config");

    let original = std::env::var("RUSTBOM_SCAN_APPLICATION").ok();
    // SAFETY: serial test, no other thread reads the environment concurrently
    unsafe {
        std::env::set_var("RUSTBOM_SCAN_APPLICATION", "from-env");
    }

    let result = load(&config_path, true).await;

    // SAFETY: test cleanup
    unsafe {
        match original {
            Some(val) => std::env::set_var("RUSTBOM_SCAN_APPLICATION", val),
            None => std::env::remove_var("RUSTBOM_SCAN_APPLICATION"),
        }
    }

    let config = result.expect("config should load");
    assert_eq!(config.scan.application, "from-env");
}

#[tokio::test]
async fn test_config_show_sections() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("rustbom.toml");
    fs::write(&config_path, VALID_CONFIG).expect("should write config");
    let config = load(&config_path, true).await.expect("config should load");

    let scan = build_report(&config, "rustbom.toml".to_owned(), Some("scan"))
        .expect("scan section");
    assert!(scan.config_toml.contains("demo-app"));

    let output = build_report(&config, "rustbom.toml".to_owned(), Some("output"))
        .expect("output section");
    assert!(output.config_toml.contains("cyclonedx"));
    assert!(!output.config_toml.contains("demo-app"));
}

#[tokio::test]
async fn test_config_validate_command_reports_invalid() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("rustbom.toml");
    fs::write(&config_path, "[general]\nlog_level = \"loud\"\n").expect("should write config");

    let writer = OutputWriter::new(OutputFormat::Json);
    let args = ConfigArgs {
        action: ConfigAction::Validate,
    };

    let err = execute(args, &config_path, true, &writer)
        .await
        .expect_err("invalid log level should fail validation");
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_config_validate_command_accepts_valid() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("rustbom.toml");
    fs::write(&config_path, VALID_CONFIG).expect("should write config");

    let writer = OutputWriter::new(OutputFormat::Json);
    let args = ConfigArgs {
        action: ConfigAction::Validate,
    };

    execute(args, &config_path, true, &writer)
        .await
        .expect("valid config should pass");
}
