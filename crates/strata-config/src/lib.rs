//! Typed configuration for Strata.
//!
//! Supports:
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict parsing (unknown fields are errors)
//! - Layered configuration (defaults → file → env)
//!
//! # Example
//!
//! ```no_run
//! use strata_config::ConfigLoader;
//! use strata_middleware::{Stack, Value};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("strata.toml")?
//!     .with_env_prefix("STRATA")
//!     .load()?;
//!
//! strata_telemetry::init_logging(&config.log_config())?;
//! let stack = Stack::with_options(config.stack_options(), || Value::new(()));
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [stack]
//! id = "PutItem"
//! instrument = true
//!
//! [logging]
//! enabled = true
//! level = "info,strata_middleware=debug"
//! format = "json"
//! ansi_enabled = false
//! include_location = false
//! ```
//!
//! # Environment Variable Overrides
//!
//! - `STRATA__STACK__ID=PutItem`
//! - `STRATA__STACK__INSTRUMENT=false`
//! - `STRATA__LOGGING__LEVEL=debug`
//! - `STRATA__LOGGING__FORMAT=pretty`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::StrataConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{LogFormat, LoggingConfig, StackConfig};
