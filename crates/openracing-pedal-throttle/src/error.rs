//! Error types for the pedal throttle crate.
//!
//! The engine itself is infallible. Errors here belong to the edges:
//! configuration validation, report extraction, and ticker lifecycle.

use std::time::Duration;

use thiserror::Error;

/// Configuration validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A field holds a value the engine cannot operate with.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// Field name
        field: &'static str,
        /// Why the value was rejected
        reason: &'static str,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidValue { field, reason }
    }
}

/// Errors raised while extracting a frame from a device report.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// The report does not reach the clutch offset.
    #[error("Pedal report too short: {len} bytes (need at least {min})")]
    TooShort {
        /// Actual report length
        len: usize,
        /// Minimum length required
        min: usize,
    },
}

/// Errors raised by the concurrency shell.
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Decay ticker already running")]
    AlreadyRunning,

    #[error("Failed to spawn decay ticker: {0}")]
    SpawnFailed(String),

    #[error("Decay ticker did not stop within {0:?}")]
    ShutdownTimeout(Duration),

    #[error("Decay ticker panicked")]
    TickerPanicked,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

pub type FrameResult<T> = Result<T, FrameError>;

pub type ShellResult<T = ()> = Result<T, ShellError>;
