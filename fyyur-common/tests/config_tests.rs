//! Tests for bootstrap configuration loading
//!
//! Covers:
//! - Missing config file falls back to defaults
//! - Config file values are applied
//! - Overrides take priority over the file
//! - Malformed files are reported as configuration errors

use fyyur_common::config::{load_toml_config, BootstrapConfig, ConfigOverrides, DEFAULT_PORT};
use fyyur_common::Error;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content).expect("Should write config file");
    path
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("does-not-exist.toml");

    assert!(load_toml_config(&path).unwrap().is_none());

    let config = BootstrapConfig::resolve(Some(&path), ConfigOverrides::default())
        .expect("Missing config file should not be fatal");
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.log_level, "info");
    assert!(config.config_file.is_none());
}

#[test]
fn test_file_values_applied() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        database_path = "/var/lib/fyyur/fyyur.db"
        port = 8000

        [logging]
        level = "debug"
        "#,
    );

    let config = BootstrapConfig::resolve(Some(&path), ConfigOverrides::default()).unwrap();

    assert_eq!(config.database_path, PathBuf::from("/var/lib/fyyur/fyyur.db"));
    assert_eq!(config.port, 8000);
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.config_file, Some(path));
}

#[test]
fn test_overrides_take_priority() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "port = 8000\nhost = \"0.0.0.0\"\n");

    let overrides = ConfigOverrides {
        database_path: Some(PathBuf::from("override.db")),
        port: Some(7000),
        log_level: Some("warn".to_string()),
        ..Default::default()
    };
    let config = BootstrapConfig::resolve(Some(&path), overrides).unwrap();

    assert_eq!(config.database_path, PathBuf::from("override.db"));
    assert_eq!(config.port, 7000);
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.log_level, "warn");
}

#[test]
fn test_malformed_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "port = \"not a number\"\n");

    let result = BootstrapConfig::resolve(Some(&path), ConfigOverrides::default());
    assert!(matches!(result, Err(Error::Config(_))), "got {:?}", result);
}
