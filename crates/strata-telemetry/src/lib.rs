//! Logging setup for Strata.
//!
//! The middleware crates only emit [`tracing`] events and spans: every stack
//! invocation opens a `stack` span and every step a nested `step` span, and
//! registry mutations are logged at `trace` level. This crate installs the
//! subscriber that turns them into output.
//!
//! ```text
//! stack{stack_id="PutItem"}
//! └─ step{step_id="Serialize stack step"}
//!    └─ step{step_id="Build stack step"}
//!       └─ ...
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use strata_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! tracing::info!(stack_id = "PutItem", "stack configured");
//! ```

#![doc(html_root_url = "https://docs.rs/strata-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
