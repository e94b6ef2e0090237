//! Configuration schema types.

use serde::{Deserialize, Serialize};
use strata_middleware::StackOptions;
use strata_telemetry::LogConfig;

/// Stack configuration section.
///
/// # Example
///
/// ```
/// use strata_config::StackConfig;
/// use strata_middleware::StackOptions;
///
/// let config = StackConfig {
///     id: "PutItem".to_string(),
///     instrument: false,
/// };
/// let options = StackOptions::from(&config);
/// assert_eq!(options.id, "PutItem");
/// assert!(!options.instrument);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StackConfig {
    /// Stack identifier, usually the operation name.
    #[serde(default = "default_stack_id")]
    pub id: String,

    /// Wrap stack and step invocations in tracing spans.
    #[serde(default = "default_true")]
    pub instrument: bool,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            id: default_stack_id(),
            instrument: true,
        }
    }
}

impl From<&StackConfig> for StackOptions {
    fn from(config: &StackConfig) -> Self {
        StackOptions::new(config.id.clone()).with_instrument(config.instrument)
    }
}

fn default_stack_id() -> String {
    "strata-stack".to_string()
}

fn default_true() -> bool {
    true
}

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level or filter directive (e.g. "info,strata_middleware=trace").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include ANSI color codes in output.
    #[serde(default)]
    pub ansi_enabled: bool,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            ansi_enabled: false,
            include_location: false,
        }
    }
}

impl From<&LoggingConfig> for LogConfig {
    fn from(config: &LoggingConfig) -> Self {
        let base = match config.format {
            LogFormat::Json => LogConfig::production(),
            LogFormat::Pretty => LogConfig::development(),
        };
        LogConfig {
            enabled: config.enabled,
            level: config.level.clone(),
            ansi: config.ansi_enabled,
            file_line_info: config.include_location,
            ..base
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_defaults() {
        let config = StackConfig::default();
        assert_eq!(config.id, "strata-stack");
        assert!(config.instrument);
    }

    #[test]
    fn test_partial_stack_section_uses_defaults() {
        let config: StackConfig = toml::from_str(r#"id = "GetItem""#).unwrap();
        assert_eq!(config.id, "GetItem");
        assert!(config.instrument);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<StackConfig, _> = toml::from_str("name = \"x\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_log_format_serde() {
        let config: LoggingConfig = serde_json::from_str(r#"{"format": "pretty"}"#).unwrap();
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_logging_into_log_config() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            ansi_enabled: true,
            include_location: false,
            ..LoggingConfig::default()
        };
        let log = LogConfig::from(&config);
        assert!(!log.json_format);
        assert!(log.ansi);
        assert!(!log.file_line_info);
        assert_eq!(log.level, "debug");

        let log = LogConfig::from(&LoggingConfig::default());
        assert!(log.json_format);
    }
}
