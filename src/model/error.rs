//! Error types for vlist.
//!
//! The engine itself has no fatal errors: list virtualization must never
//! crash the host UI. The types here fall into two groups.
//!
//! # Error Hierarchy
//!
//! - Host response errors, carried as data inside engine events:
//!   - [`MeasureError`] - a row could not be measured (not rendered/attached)
//!   - [`ViewportError`] - the scroll container could not be found
//! - [`AppError`] - failures of the `vlist` binary (config, logging, output,
//!   simulation)
//!
//! # Recovery Strategy
//!
//! Host response errors are always recoverable. A missing row means "not on
//! screen right now"; during a navigation it triggers a nudge toward the
//! estimated target instead of a failure. A missing container is ignored and
//! the engine waits for a later successful read.

use crate::config::ConfigError;
use crate::host::SimError;
use crate::logging::LoggingError;
use thiserror::Error;

/// Top-level error of the `vlist` binary.
///
/// Library users never see this type from the engine; it only collects the
/// fallible steps around it (settings file, log file, writing output).
#[derive(Debug, Error)]
pub enum AppError {
    /// Settings file exists but could not be read or parsed.
    #[error("Failed to load settings: {0}")]
    Config(#[from] ConfigError),

    /// Tracing subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    Logging(#[from] LoggingError),

    /// Writing the simulation report failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// Serializing the JSON report failed.
    #[error("Failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),

    /// The simulated host never went idle.
    #[error("Simulation failed: {0}")]
    Simulation(#[from] SimError),
}

/// Failure to read a row's on-screen geometry.
///
/// Expected during normal operation: the row may have scrolled out of the
/// rendered window between the request and the read.
///
/// # Examples
///
/// ```
/// use vlist::model::MeasureError;
///
/// let err = MeasureError::RowNotFound { index: 12 };
/// assert!(err.to_string().contains("12"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MeasureError {
    /// The row element is not currently rendered or attached.
    #[error("Row {index} is not rendered")]
    RowNotFound {
        /// Row index the measurement was requested for.
        index: usize,
    },
}

/// Failure to read the scroll container's viewport metrics.
///
/// The engine leaves its viewport untouched and relies on a later read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewportError {
    /// No container with the configured identifier exists.
    #[error("Scroll container '{container_id}' not found")]
    ContainerNotFound {
        /// Identifier that was looked up.
        container_id: String,
    },
}
