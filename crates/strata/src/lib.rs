//! # Strata
//!
//! Ordered middleware stacks for operation clients.
//!
//! An operation runs through a [`Stack`](middleware::Stack) of five fixed
//! steps. Each step holds its own ordered list of named middleware, which can
//! be added, inserted next to each other, swapped or removed while the stack
//! is being configured.
//!
//! ```text
//! parameters → Initialize → Serialize → Build → Finalize → Deserialize → transport
//!                                                                          ↓
//! result ←─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use strata::prelude::*;
//!
//! let config = ConfigLoader::new().with_env_prefix("STRATA").load()?;
//! init_logging(&config.log_config())?;
//!
//! let mut stack = Stack::with_options(config.stack_options(), new_http_request);
//! stack.serialize.add(set_headers, RelativePosition::After)?;
//!
//! let output = stack.invoke(&mut Context::new(), Value::new(params), &transport).await?;
//! ```
//!
//! See `examples/serialize_headers.rs` for a runnable version.

#![doc(html_root_url = "https://docs.rs/strata/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export the middleware core
pub use strata_middleware as middleware;

// Re-export logging setup
pub use strata_telemetry as telemetry;

// Re-export configuration
pub use strata_config as config;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```
/// use strata::prelude::*;
///
/// let stack = Stack::new("op", || Value::new(()));
/// assert_eq!(stack.list().len(), 6);
/// ```
pub mod prelude {
    pub use strata_middleware::{
        decorate_handler, BoxError, BoxFuture, Context, Error, Handler, HandlerFn, HandlerResult,
        Middleware, MiddlewareFn, RelativePosition, Stack, StackOptions, StepId, StrataResult,
        Value,
    };

    // Re-export step envelopes
    pub use strata_middleware::stages::{
        BuildInput, BuildOutput, DeserializeInput, DeserializeOutput, FinalizeInput,
        FinalizeOutput, InitializeInput, InitializeOutput, SerializeInput, SerializeOutput,
    };

    // Re-export logging and configuration entry points
    pub use strata_config::{ConfigLoader, StrataConfig};
    pub use strata_telemetry::{init_logging, LogConfig};
}
