//! Dynamic payload carrier.
//!
//! Effect inputs and resume outputs flow through the engine untyped; each
//! built-in effect enforces its input/output contract at its own construction
//! boundary by downcasting. A failed downcast inside a handler means a
//! foreign payload reached it, which is an internal-consistency violation.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A value that can flow through the engine.
///
/// Cheap to clone; the payload is shared, never copied. Keeps the payload's
/// type name for diagnostics.
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Value {
    pub fn new<T: Send + Sync + 'static>(value: T) -> Value {
        Value {
            inner: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// The unit payload.
    pub fn unit() -> Value {
        Value::new(())
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.inner.is::<T>()
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Clone the payload out as `T`.
    ///
    /// Panics on a type mismatch: the engine only routes payloads to handlers
    /// whose tag matched, so a mismatch here is a fatal internal-consistency
    /// violation, not a recoverable condition.
    pub fn cast<T: Clone + 'static>(&self) -> T {
        match self.inner.downcast_ref::<T>() {
            Some(value) => value.clone(),
            None => panic!(
                "payload type mismatch: expected {}, found {}",
                std::any::type_name::<T>(),
                self.type_name
            ),
        }
    }

    /// Type name of the carried payload.
    pub fn type_name(&self) -> &'static str {
        self.type_name
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

    #[test]
    fn test_roundtrip() {
        let value = Value::new(42i64);
        assert_eq!(value.cast::<i64>(), 42);
        assert_eq!(value.downcast_ref::<i64>(), Some(&42));
    }

    #[test]
    fn test_type_checks() {
        let value = Value::new("hello".to_string());
        assert!(value.is::<String>());
        assert!(!value.is::<i64>());
        assert!(value.downcast_ref::<i64>().is_none());
    }

    #[test]
    #[should_panic(expected = "payload type mismatch")]
    fn test_cast_mismatch_panics() {
        Value::new(1i64).cast::<String>();
    }

    #[test]
    fn test_unit() {
        assert!(Value::unit().is::<()>());
    }
}
