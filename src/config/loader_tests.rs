//! Tests for settings file loading.

use super::*;
use serial_test::serial;
use std::env;
use std::fs;

#[test]
fn default_config_path_contains_vlist_config_toml() {
    if let Some(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(
            path_str.contains("vlist") && path_str.ends_with("config.toml"),
            "Path should contain 'vlist' and end with 'config.toml', got: {}",
            path_str
        );
    }
}

#[test]
fn load_config_file_returns_ok_none_for_missing_file() {
    let result = load_config_file("/nonexistent/path/to/vlist.toml");
    assert_eq!(
        result,
        Ok(None),
        "Missing config file should return Ok(None), not an error"
    );
}

#[test]
fn load_config_file_parses_valid_toml() {
    let config_path = env::temp_dir().join("vlist_test_config.toml");

    let toml_content = r#"
container_id = "feed"
default_item_height = 48.0
buffer = 8
dynamic_buffer = false
max_search_attempts = 3
convergence_delay_ms = 10
"#;

    fs::write(&config_path, toml_content).expect("Failed to write test config");

    let config = load_config_file(&config_path)
        .expect("Should successfully parse valid TOML")
        .expect("Should return Some(SettingsFile) for existing file");

    assert_eq!(config.container_id.as_deref(), Some("feed"));
    assert_eq!(config.default_item_height, Some(48.0));
    assert_eq!(config.buffer, Some(8));
    assert_eq!(config.dynamic_buffer, Some(false));
    assert_eq!(config.max_search_attempts, Some(3));
    assert_eq!(config.convergence_delay_ms, Some(10));
    assert_eq!(config.show_while_measuring, None);

    fs::remove_file(config_path).ok();
}

#[test]
fn load_config_file_returns_error_for_invalid_toml() {
    let config_path = env::temp_dir().join("vlist_test_invalid.toml");
    fs::write(&config_path, "this is not valid TOML ][}{").expect("Failed to write test config");

    let result = load_config_file(&config_path);

    match result {
        Err(ConfigError::ParseError { path, reason: _ }) => {
            assert_eq!(path, config_path);
        }
        other => panic!("Expected ParseError, got {:?}", other),
    }

    fs::remove_file(config_path).ok();
}

#[test]
fn load_config_file_rejects_unknown_keys() {
    let config_path = env::temp_dir().join("vlist_test_unknown_key.toml");
    fs::write(&config_path, "row_height = 10.0\n").expect("Failed to write test config");

    let result = load_config_file(&config_path);
    assert!(
        matches!(result, Err(ConfigError::ParseError { .. })),
        "Unknown keys should be rejected, got {:?}",
        result
    );

    fs::remove_file(config_path).ok();
}

#[test]
fn negative_buffer_in_file_is_corrected_on_resolve() {
    let config_path = env::temp_dir().join("vlist_test_negative_buffer.toml");
    fs::write(&config_path, "buffer = -3\n").expect("Failed to write test config");

    let file = load_config_file(&config_path).unwrap().unwrap();
    let resolved = resolve(file);
    assert_eq!(resolved.settings.buffer(), crate::config::DEFAULT_BUFFER);

    fs::remove_file(config_path).ok();
}

#[test]
fn resolve_uses_defaults_for_empty_file() {
    let resolved = resolve(SettingsFile::default());
    assert_eq!(resolved, ResolvedConfig::default());
}

#[test]
fn resolve_keeps_explicit_log_path() {
    let custom = PathBuf::from("/custom/path/to/vlist.log");
    let resolved = resolve(SettingsFile {
        log_file_path: Some(custom.clone()),
        ..SettingsFile::default()
    });
    assert_eq!(resolved.log_file_path, custom);
}

#[test]
fn default_log_path_ends_with_vlist_log() {
    let path = default_log_path();
    assert!(
        path.to_string_lossy().ends_with("vlist.log"),
        "Default log path should end with 'vlist.log', got: {:?}",
        path
    );
}

#[test]
fn cli_overrides_win_over_file_values() {
    let file = SettingsFile {
        default_item_height: Some(30.0),
        buffer: Some(2),
        ..SettingsFile::default()
    };
    let merged = apply_cli_overrides(
        file,
        CliOverrides {
            buffer: Some(9),
            ..CliOverrides::default()
        },
    );
    assert_eq!(merged.buffer, Some(9));
    assert_eq!(merged.default_item_height, Some(30.0));
}

/// RAII guard to ensure environment variable cleanup even under test parallelism.
struct EnvGuard(&'static str);

impl EnvGuard {
    fn new(name: &'static str) -> Self {
        env::remove_var(name);
        EnvGuard(name)
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        env::remove_var(self.0);
    }
}

#[test]
#[serial(vlist_env)]
fn apply_env_overrides_respects_container_id() {
    let _guard = EnvGuard::new("VLIST_CONTAINER_ID");
    env::set_var("VLIST_CONTAINER_ID", "env-feed");

    let result = apply_env_overrides(SettingsFile::default());
    assert_eq!(result.container_id.as_deref(), Some("env-feed"));
}

#[test]
#[serial(vlist_env)]
fn apply_env_overrides_no_change_when_env_var_not_set() {
    let _guard = EnvGuard::new("VLIST_CONTAINER_ID");
    let base = SettingsFile {
        container_id: Some("file-feed".to_string()),
        ..SettingsFile::default()
    };
    assert_eq!(apply_env_overrides(base.clone()), base);
}

#[test]
#[serial(vlist_env)]
fn load_config_with_precedence_uses_env_path() {
    let _guard = EnvGuard::new("VLIST_CONFIG");
    let config_path = env::temp_dir().join("vlist_test_env_precedence.toml");
    fs::write(&config_path, "buffer = 11\n").expect("Failed to write test config");
    env::set_var("VLIST_CONFIG", &config_path);

    let file = load_config_with_precedence(None).unwrap().unwrap();
    assert_eq!(file.buffer, Some(11));

    fs::remove_file(config_path).ok();
}

#[test]
#[serial(vlist_env)]
fn explicit_path_beats_env_path() {
    let _guard = EnvGuard::new("VLIST_CONFIG");
    env::set_var("VLIST_CONFIG", "/nonexistent/env/vlist.toml");
    let config_path = env::temp_dir().join("vlist_test_explicit_precedence.toml");
    fs::write(&config_path, "buffer = 4\n").expect("Failed to write test config");

    let file = load_config_with_precedence(Some(config_path.clone()))
        .unwrap()
        .unwrap();
    assert_eq!(file.buffer, Some(4));

    fs::remove_file(config_path).ok();
}
