//! Error types for the middleware stack.
//!
//! Two kinds of failure exist in this crate:
//!
//! - [`Error`] covers everything the stack itself can detect: registry
//!   mutations that would break the identifier invariants, and payloads that
//!   cannot be narrowed to the type a step or middleware expects.
//! - [`BoxError`] is what flows out of a handler chain. Errors produced by
//!   middleware or terminal handlers pass through the chain untouched, so the
//!   caller can downcast them back to the type that was returned.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type StrataResult<T> = Result<T, Error>;

/// Type-erased error returned by handlers and middleware.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result of invoking a handler chain.
pub type HandlerResult<T> = Result<T, BoxError>;

/// Errors raised by the stack itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A middleware was registered with an empty identifier.
    #[error("middleware identifier must not be empty")]
    EmptyId,

    /// The identifier is already present in the step.
    #[error("duplicate middleware id: {id}")]
    DuplicateId {
        /// The conflicting identifier.
        id: String,
    },

    /// The anchor of a relative insert does not exist.
    #[error("anchor middleware not found: {id}")]
    AnchorNotFound {
        /// The missing anchor identifier.
        id: String,
    },

    /// The middleware targeted by a swap or remove does not exist.
    #[error("middleware not found: {id}")]
    NotFound {
        /// The missing identifier.
        id: String,
    },

    /// A payload value did not hold the expected type.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Name of the type the caller asked for.
        expected: &'static str,
        /// Name of the type actually stored.
        found: &'static str,
    },
}

impl Error {
    /// Create a new duplicate id error.
    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self::DuplicateId { id: id.into() }
    }

    /// Create a new anchor not found error.
    pub fn anchor_not_found(id: impl Into<String>) -> Self {
        Self::AnchorNotFound { id: id.into() }
    }

    /// Create a new not found error.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a new type mismatch error.
    pub const fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        Self::TypeMismatch { expected, found }
    }
}
