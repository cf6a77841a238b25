//! Integration tests for Settings loading from an explicit config file.
//!
//! These tests never touch the global config: an explicit file replaces it.

use std::fs;

use tempfile::TempDir;

use jes_assess::application::ApplicationError;
use jes_assess::config::Settings;

#[test]
fn given_explicit_file_when_loading_then_scalars_and_environments_are_read() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("jes-assess.toml");
    fs::write(
        &path,
        r#"
token_timeout_secs = 30
charm_prefix = "local:"

[environments.aws]
cloud = "aws"
region = "us-east-1"
default_series = "xenial"
constraints = "mem=2G"
config = { "test-mode" = "true" }
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(&path)).expect("load settings");

    // Assert
    assert_eq!(settings.token_timeout_secs, 30);
    assert_eq!(settings.charm_prefix, "local:");
    // untouched values keep their defaults
    assert_eq!(settings.start_timeout_secs, 300);
    assert_eq!(settings.poll_interval_secs, 5);

    let aws = settings.environment("aws").unwrap();
    assert_eq!(aws.cloud, "aws");
    assert_eq!(aws.region.as_deref(), Some("us-east-1"));
    assert_eq!(aws.default_series.as_deref(), Some("xenial"));
    assert_eq!(aws.constraints.as_deref(), Some("mem=2G"));
    assert_eq!(aws.config.get("test-mode").map(String::as_str), Some("true"));
}

#[test]
fn given_missing_explicit_file_when_loading_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn given_malformed_file_when_loading_then_config_error_names_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "token_timeout_secs = \"soon\"\n").unwrap();

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains("broken.toml"));
}
