//! Configuration module.
//!
//! [`Settings`] is the immutable snapshot the engine is built from. It is
//! validated exactly once, when it is constructed: invalid values are
//! replaced with defaults rather than rejected, so configuration can never
//! prevent the list from rendering.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, resolve, CliOverrides, ConfigError,
    ResolvedConfig, SettingsFile,
};

use std::time::Duration;

/// Container identifier used when none (or an empty one) is configured.
pub const DEFAULT_CONTAINER_ID: &str = "virtual-list";
/// Estimated row height before measurement.
pub const DEFAULT_ITEM_HEIGHT: f64 = 26.0;
/// Rows rendered beyond each edge of the viewport.
pub const DEFAULT_BUFFER: usize = 5;
/// Viewport height assumed until the host reports a real one.
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 500.0;

/// Retry and tolerance knobs of the scroll-to-item state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationTuning {
    /// Distance (content units) within which the target counts as reached.
    pub tolerance: f64,
    /// Consecutive confirmations required before declaring success.
    pub required_confirmations: u32,
    /// Scroll re-issues allowed before giving up.
    pub max_scroll_attempts: u32,
    /// Lookup retries for an identifier that is not in the list yet.
    pub max_search_attempts: u32,
}

impl Default for NavigationTuning {
    fn default() -> Self {
        Self {
            tolerance: 20.0,
            required_confirmations: 2,
            max_scroll_attempts: 10,
            max_search_attempts: 1,
        }
    }
}

/// Fire-once timer delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Quiet period after a manual scroll event before scrolling counts as stopped.
    pub scroll_settle: Duration,
    /// Delay between convergence checks of an in-progress navigation.
    pub convergence_check: Duration,
    /// Delay between lookups of a not-yet-present target identifier.
    pub search_retry: Duration,
    /// Guaranteed re-entry after issuing a scroll command.
    pub scroll_safety: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            scroll_settle: Duration::from_millis(200),
            convergence_check: Duration::from_millis(50),
            search_retry: Duration::from_millis(100),
            scroll_safety: Duration::from_millis(20),
        }
    }
}

/// Validated, immutable engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    container_id: String,
    default_item_height: f64,
    buffer: usize,
    dynamic_buffer: bool,
    show_while_measuring: bool,
    initial_viewport_height: f64,
    navigation: NavigationTuning,
    timings: Timings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            default_item_height: DEFAULT_ITEM_HEIGHT,
            buffer: DEFAULT_BUFFER,
            dynamic_buffer: true,
            show_while_measuring: false,
            initial_viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            navigation: NavigationTuning::default(),
            timings: Timings::default(),
        }
    }
}

impl Settings {
    /// Build settings from raw (possibly invalid) values.
    ///
    /// Missing fields use defaults. Empty identifiers, negative or
    /// non-finite sizes and zero retry bounds are replaced by defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use vlist::config::{Settings, SettingsFile};
    ///
    /// let settings = Settings::from_raw(&SettingsFile {
    ///     container_id: Some("  ".to_string()),
    ///     default_item_height: Some(-3.0),
    ///     buffer: Some(8),
    ///     ..SettingsFile::default()
    /// });
    /// assert_eq!(settings.container_id(), "virtual-list");
    /// assert_eq!(settings.default_item_height(), 26.0);
    /// assert_eq!(settings.buffer(), 8);
    /// ```
    pub fn from_raw(raw: &SettingsFile) -> Self {
        let defaults = Self::default();
        let nav_defaults = NavigationTuning::default();
        let timing_defaults = Timings::default();

        let container_id = raw
            .container_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or(defaults.container_id);

        let navigation = NavigationTuning {
            tolerance: non_negative(raw.tolerance).unwrap_or(nav_defaults.tolerance),
            required_confirmations: raw
                .required_confirmations
                .unwrap_or(nav_defaults.required_confirmations),
            max_scroll_attempts: raw
                .max_scroll_attempts
                .filter(|&n| n > 0)
                .unwrap_or(nav_defaults.max_scroll_attempts),
            max_search_attempts: raw
                .max_search_attempts
                .filter(|&n| n > 0)
                .unwrap_or(nav_defaults.max_search_attempts),
        };

        let millis = |value: Option<u64>, fallback: Duration| {
            value.map(Duration::from_millis).unwrap_or(fallback)
        };
        let timings = Timings {
            scroll_settle: millis(raw.settle_delay_ms, timing_defaults.scroll_settle),
            convergence_check: millis(raw.convergence_delay_ms, timing_defaults.convergence_check),
            search_retry: millis(raw.search_retry_delay_ms, timing_defaults.search_retry),
            scroll_safety: millis(raw.scroll_safety_delay_ms, timing_defaults.scroll_safety),
        };

        Self {
            container_id,
            default_item_height: raw
                .default_item_height
                .filter(|h| h.is_finite() && *h > 0.0)
                .unwrap_or(defaults.default_item_height),
            buffer: raw
                .buffer
                .and_then(|b| usize::try_from(b).ok())
                .unwrap_or(defaults.buffer),
            dynamic_buffer: raw.dynamic_buffer.unwrap_or(defaults.dynamic_buffer),
            show_while_measuring: raw
                .show_while_measuring
                .unwrap_or(defaults.show_while_measuring),
            initial_viewport_height: non_negative(raw.initial_viewport_height)
                .unwrap_or(defaults.initial_viewport_height),
            navigation,
            timings,
        }
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn default_item_height(&self) -> f64 {
        self.default_item_height
    }

    pub fn buffer(&self) -> usize {
        self.buffer
    }

    pub fn dynamic_buffer(&self) -> bool {
        self.dynamic_buffer
    }

    pub fn show_while_measuring(&self) -> bool {
        self.show_while_measuring
    }

    pub fn initial_viewport_height(&self) -> f64 {
        self.initial_viewport_height
    }

    pub fn navigation(&self) -> &NavigationTuning {
        &self.navigation
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }
}

fn non_negative(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v >= 0.0)
}
