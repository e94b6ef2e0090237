//! Top-level configuration type.

use serde::{Deserialize, Serialize};
use strata_middleware::StackOptions;
use strata_telemetry::LogConfig;

use crate::{ConfigError, LogFormat, LoggingConfig, StackConfig};

/// Complete Strata configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use strata_config::StrataConfig;
///
/// let config = StrataConfig::default();
/// assert_eq!(config.stack.id, "strata-stack");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct StrataConfig {
    /// Stack configuration.
    #[serde(default)]
    pub stack: StackConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StrataConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if:
    /// - `stack.id` is empty
    /// - `logging.level` is not a valid filter directive while logging is
    ///   enabled
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stack.id.trim().is_empty() {
            return Err(ConfigError::invalid_value("stack.id", "must not be empty"));
        }

        if self.logging.enabled {
            strata_telemetry::create_env_filter(&self.logging.level)
                .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// Pretty, colored debug logs with source locations.
    ///
    /// ```
    /// use strata_config::{LogFormat, StrataConfig};
    ///
    /// let config = StrataConfig::development();
    /// assert_eq!(config.logging.format, LogFormat::Pretty);
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.ansi_enabled = true;
        config.logging.include_location = true;
        config
    }

    /// Create a production configuration preset.
    ///
    /// JSON logs at `info` level.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config.logging.ansi_enabled = false;
        config
    }

    /// Returns the options for building a `Stack`.
    #[must_use]
    pub fn stack_options(&self) -> StackOptions {
        StackOptions::from(&self.stack)
    }

    /// Returns the logging setup, named after the stack.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        LogConfig::from(&self.logging).with_service_name(self.stack.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stack_id_rejected() {
        let mut config = StrataConfig::default();
        config.stack.id = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "stack.id"
        ));
    }

    #[test]
    fn test_invalid_level_rejected() {
        let mut config = StrataConfig::default();
        config.logging.level = "strata=loudest".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "logging.level"
        ));

        config.logging.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        let dev = StrataConfig::development();
        assert_eq!(dev.logging.level, "debug");
        assert!(dev.logging.include_location);

        let prod = StrataConfig::production();
        assert_eq!(prod.logging.format, LogFormat::Json);
        assert!(!prod.logging.ansi_enabled);
    }

    #[test]
    fn test_derived_options() {
        let mut config = StrataConfig::development();
        config.stack.id = "GetItem".to_string();
        config.stack.instrument = false;

        let options = config.stack_options();
        assert_eq!(options, StackOptions::new("GetItem").with_instrument(false));

        let log = config.log_config();
        assert_eq!(log.service_name, "GetItem");
        assert!(!log.json_format);
    }
}
