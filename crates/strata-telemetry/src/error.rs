//! Telemetry error types.

use thiserror::Error;

/// Errors that can occur while setting up telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The log level is not a valid filter directive.
    #[error("Invalid log level '{level}': {reason}")]
    InvalidLevel {
        /// The rejected level string.
        level: String,
        /// Why the level was rejected.
        reason: String,
    },

    /// Failed to install the global subscriber.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),
}

impl TelemetryError {
    /// Creates an invalid level error.
    pub fn invalid_level(level: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidLevel {
            level: level.into(),
            reason: reason.to_string(),
        }
    }
}
