//! Settings file loading with precedence handling.

use super::Settings;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (permission issues, not a file, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML settings file structure.
///
/// All fields are optional and unvalidated - [`Settings::from_raw`] applies
/// defaults and corrections. Corresponds to `~/.config/vlist/config.toml`.
///
/// ```toml
/// container_id = "feed"
/// default_item_height = 48.0
/// buffer = 8
/// max_search_attempts = 3
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    /// Scroll container identifier passed to the host.
    #[serde(default)]
    pub container_id: Option<String>,

    /// Estimated height of unmeasured rows.
    #[serde(default)]
    pub default_item_height: Option<f64>,

    /// Base buffer in rows; signed so negative input can be corrected.
    #[serde(default)]
    pub buffer: Option<i64>,

    /// Scale the buffer with manual scroll speed.
    #[serde(default)]
    pub dynamic_buffer: Option<bool>,

    /// Reveal the list before measurement converges.
    #[serde(default)]
    pub show_while_measuring: Option<bool>,

    /// Viewport height assumed before the first host read.
    #[serde(default)]
    pub initial_viewport_height: Option<f64>,

    /// Distance within which a navigation target counts as reached.
    #[serde(default)]
    pub tolerance: Option<f64>,

    /// Consecutive confirmations before a navigation succeeds.
    #[serde(default)]
    pub required_confirmations: Option<u32>,

    /// Scroll re-issues before a navigation gives up.
    #[serde(default)]
    pub max_scroll_attempts: Option<u32>,

    /// Lookups of a missing identifier before a navigation gives up.
    #[serde(default)]
    pub max_search_attempts: Option<u32>,

    /// Manual scroll quiet period in milliseconds.
    #[serde(default)]
    pub settle_delay_ms: Option<u64>,

    /// Convergence check interval in milliseconds.
    #[serde(default)]
    pub convergence_delay_ms: Option<u64>,

    /// Missing-identifier retry interval in milliseconds.
    #[serde(default)]
    pub search_retry_delay_ms: Option<u64>,

    /// Re-entry delay after a scroll command in milliseconds.
    #[serde(default)]
    pub scroll_safety_delay_ms: Option<u64>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Validated engine settings.
    pub settings: Settings,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            log_file_path: default_log_path(),
        }
    }
}

/// Command-line values that take precedence over every other source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub container_id: Option<String>,
    pub default_item_height: Option<f64>,
    pub buffer: Option<i64>,
    pub initial_viewport_height: Option<f64>,
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/vlist/vlist.log` on Unix-like systems, or the
/// platform equivalent. Falls back to the current directory if no state
/// directory can be determined.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("vlist").join("vlist.log")
    } else {
        PathBuf::from("vlist.log")
    }
}

/// Load a settings file from a specific path.
///
/// Returns `Ok(None)` if the file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if the file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<SettingsFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: SettingsFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/vlist/config.toml` on Unix, appropriate path on other
/// platforms, `None` if no config directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vlist").join("config.toml"))
}

/// Load the settings file with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `VLIST_CONFIG` environment variable
/// 3. Default path `~/.config/vlist/config.toml`
///
/// # Errors
///
/// Returns error only if a settings file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<SettingsFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var("VLIST_CONFIG") {
        if env_path.is_empty() {
            return Err(ConfigError::InvalidPath(
                "VLIST_CONFIG is set but empty".to_string(),
            ));
        }
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides.
///
/// Checks for:
/// - `VLIST_CONTAINER_ID`: Override the scroll container identifier
pub fn apply_env_overrides(mut file: SettingsFile) -> SettingsFile {
    if let Ok(container_id) = std::env::var("VLIST_CONTAINER_ID") {
        file.container_id = Some(container_id);
    }
    file
}

/// Apply CLI argument overrides. Only flags the user actually set are applied.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut file: SettingsFile, cli: CliOverrides) -> SettingsFile {
    if let Some(container_id) = cli.container_id {
        file.container_id = Some(container_id);
    }
    if let Some(height) = cli.default_item_height {
        file.default_item_height = Some(height);
    }
    if let Some(buffer) = cli.buffer {
        file.buffer = Some(buffer);
    }
    if let Some(height) = cli.initial_viewport_height {
        file.initial_viewport_height = Some(height);
    }
    file
}

/// Validate the merged file into the final configuration.
///
/// This is the single point where [`Settings`] are constructed.
pub fn resolve(file: SettingsFile) -> ResolvedConfig {
    ResolvedConfig {
        settings: Settings::from_raw(&file),
        log_file_path: file.log_file_path.unwrap_or_else(default_log_path),
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
