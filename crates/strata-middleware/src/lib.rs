//! # Strata Middleware
//!
//! Ordered middleware pipelines for operation clients.
//!
//! This crate provides the building blocks for running an operation through
//! a chain of named, independently addressable middleware:
//!
//! - [`OrderedIds`]: a registry of uniquely named entries that supports
//!   relative insertion, in-place swaps and removal
//! - [`Handler`] / [`Middleware`]: the async contracts every unit of work and
//!   every composed chain satisfies
//! - [`decorate_handler`]: composes a terminal handler with a list of
//!   middleware so that the first registered middleware runs first
//! - [`Step`]: a typed stage owning its own registry, usable as a single
//!   middleware
//! - [`Stack`]: the five fixed steps of an operation
//!
//! ## Pipeline
//!
//! ```text
//! Initialize → Serialize → Build → Finalize → Deserialize → handler
//!                                                             ↓
//! result ←────────────────────────────────────────────────────┘
//! ```
//!
//! The step order is fixed; the middleware inside each step can be added,
//! inserted relative to each other, swapped and removed at configuration
//! time.
//!
//! ## Example
//!
//! ```
//! use strata_middleware::{OrderedIds, RelativePosition, Identify};
//!
//! #[derive(Clone)]
//! struct Named(&'static str);
//!
//! impl Identify for Named {
//!     fn id(&self) -> &str {
//!         self.0
//!     }
//! }
//!
//! let mut ids = OrderedIds::new();
//! ids.add(Named("retry"), RelativePosition::After).unwrap();
//! ids.insert(Named("sign"), "retry", RelativePosition::After).unwrap();
//! ids.add(Named("user-agent"), RelativePosition::Before).unwrap();
//!
//! let order: Vec<_> = ids.ids().collect();
//! assert_eq!(order, vec!["user-agent", "retry", "sign"]);
//! ```
//!
//! ## Concurrency
//!
//! Configure first, then run. Invocations only read the registries and
//! snapshot them on entry, so a `Stack` can be shared across tasks behind an
//! `Arc`; mutating it requires exclusive access.

#![doc(html_root_url = "https://docs.rs/strata-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod context;
pub mod error;
pub mod middleware;
pub mod ordered;
pub mod pipeline;
pub mod stages;
pub mod step;
pub mod types;

// Re-export main types at crate root
pub use context::{CancelHandle, Context};
pub use error::{BoxError, Error, HandlerResult, StrataResult};
pub use middleware::{
    decorate_handler, BoxFuture, BoxHandler, Handler, HandlerFn, Middleware, MiddlewareFn,
    SharedMiddleware,
};
pub use ordered::{Identify, OrderedIds, RelativePosition};
pub use pipeline::{Stack, StackOptions, StepId};
pub use step::{Step, StepKind};
pub use types::Value;
