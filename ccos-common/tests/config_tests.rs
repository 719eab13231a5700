//! Tests for bootstrap configuration loading and root folder resolution
//!
//! Note: Uses serial_test to prevent ENV variable race conditions.
//! Tests that manipulate CCOS_ROOT_FOLDER are marked with #[serial].

use ccos_common::config::{
    load_toml_config, prepare_root_folder, resolve_root_folder, TomlConfig, DATABASE_FILE_NAME,
    DEFAULT_GEMINI_MODEL, ROOT_FOLDER_ENV,
};
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};

#[test]
fn test_defaults_when_sections_missing() {
    let config: TomlConfig = toml::from_str("").unwrap();

    assert!(config.root_folder.is_none());
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 5740);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.gemini.model, DEFAULT_GEMINI_MODEL);
    assert_eq!(config.gemini.timeout_secs, 120);
    assert!(config.gemini.api_key.is_none());
    assert!(config.wordpress.url.is_none());
}

#[test]
fn test_load_explicit_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
root_folder = "/srv/ccos"

[server]
port = 8080

[gemini]
api_key = "toml-key"
model = "gemini-test"

[wordpress]
url = "https://blog.example.com"
username = "editor"
password = "app-password"
"#,
    )
    .unwrap();

    let config = load_toml_config(Some(&path)).unwrap();

    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/ccos")));
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.gemini.api_key.as_deref(), Some("toml-key"));
    assert_eq!(config.gemini.model, "gemini-test");
    assert_eq!(config.wordpress.username.as_deref(), Some("editor"));
}

#[test]
fn test_explicit_missing_file_is_config_error() {
    let result = load_toml_config(Some(Path::new("/nonexistent/ccos/config.toml")));
    assert!(matches!(result, Err(ccos_common::Error::Config(_))));
}

#[test]
fn test_malformed_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[server\nport = ").unwrap();

    let result = load_toml_config(Some(&path));
    assert!(matches!(result, Err(ccos_common::Error::Config(_))));
}

#[test]
#[serial]
fn test_cli_argument_wins_over_everything() {
    env::set_var(ROOT_FOLDER_ENV, "/from/env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..Default::default()
    };

    let root = resolve_root_folder(Some(Path::new("/from/cli")), &config);
    assert_eq!(root, PathBuf::from("/from/cli"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_env_wins_over_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/from/env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..Default::default()
    };

    let root = resolve_root_folder(None, &config);
    assert_eq!(root, PathBuf::from("/from/env"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_toml_used_when_no_cli_or_env() {
    env::remove_var(ROOT_FOLDER_ENV);
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..Default::default()
    };

    let root = resolve_root_folder(None, &config);
    assert_eq!(root, PathBuf::from("/from/toml"));
}

#[test]
#[serial]
fn test_default_root_folder_is_non_empty() {
    env::remove_var(ROOT_FOLDER_ENV);

    let root = resolve_root_folder(None, &TomlConfig::default());
    assert!(!root.as_os_str().is_empty());
}

#[test]
fn test_prepare_root_folder_creates_directory() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("nested").join("ccos");

    let db_path = prepare_root_folder(&root).unwrap();

    assert!(root.is_dir());
    assert_eq!(db_path, root.join(DATABASE_FILE_NAME));
}
