//! Opaque payload values.
//!
//! The outer stack moves payloads between steps without knowing their
//! concrete types: operation parameters go in, a transport request is built
//! along the way, and a raw response comes back. [`Value`] is the container
//! for those payloads. Narrowing a value back to a concrete type is always a
//! checked operation that reports [`Error::TypeMismatch`] instead of
//! panicking.

use crate::error::{Error, StrataResult};
use std::any::{type_name, Any};
use std::fmt;

/// A type-erased payload passed between steps of a stack.
///
/// # Example
///
/// ```
/// use strata_middleware::Value;
///
/// let mut value = Value::new(String::from("abc"));
/// value.downcast_mut::<String>().unwrap().push('d');
///
/// assert_eq!(value.downcast_ref::<String>().unwrap(), "abcd");
/// assert!(value.downcast_ref::<u32>().is_err());
/// ```
pub struct Value {
    inner: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Value {
    /// Wraps a concrete value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Box::new(value),
            type_name: type_name::<T>(),
        }
    }

    /// Returns the name of the stored type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns true if the stored value is a `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Borrows the stored value as a `T`.
    pub fn downcast_ref<T: Any>(&self) -> StrataResult<&T> {
        let found = self.type_name;
        self.inner
            .downcast_ref::<T>()
            .ok_or_else(|| Error::type_mismatch(type_name::<T>(), found))
    }

    /// Mutably borrows the stored value as a `T`.
    pub fn downcast_mut<T: Any>(&mut self) -> StrataResult<&mut T> {
        let found = self.type_name;
        self.inner
            .downcast_mut::<T>()
            .ok_or_else(|| Error::type_mismatch(type_name::<T>(), found))
    }

    /// Consumes the value, returning the stored `T`.
    ///
    /// On mismatch the payload is dropped.
    pub fn downcast<T: Any>(self) -> StrataResult<T> {
        let found = self.type_name;
        self.inner
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| Error::type_mismatch(type_name::<T>(), found))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Value").field(&self.type_name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Params {
        name: String,
    }

    #[test]
    fn test_downcast_ref_matching_type() {
        let value = Value::new(Params {
            name: "abc".to_string(),
        });
        assert!(value.is::<Params>());
        assert_eq!(value.downcast_ref::<Params>().unwrap().name, "abc");
    }

    #[test]
    fn test_downcast_ref_mismatch() {
        let value = Value::new(42_u32);
        let err = value.downcast_ref::<String>().unwrap_err();
        assert_eq!(
            err,
            Error::TypeMismatch {
                expected: type_name::<String>(),
                found: "u32",
            }
        );
    }

    #[test]
    fn test_downcast_mut_modifies_in_place() {
        let mut value = Value::new(vec![1, 2]);
        value.downcast_mut::<Vec<i32>>().unwrap().push(3);
        assert_eq!(value.downcast::<Vec<i32>>().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_downcast_owned_mismatch() {
        let value = Value::new("static str");
        assert!(matches!(
            value.downcast::<String>(),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_debug_shows_type_name() {
        let value = Value::new(7_u8);
        assert_eq!(format!("{value:?}"), "Value(\"u8\")");
    }
}
