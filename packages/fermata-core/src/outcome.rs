//! Three-way outcome type.
//!
//! `Success` carries a final value; `Failure` carries a caller-defined,
//! freely mappable error; `Panic` carries an opaque unrecoverable payload
//! that is only ever propagated, never pattern-matched on. `Failure` and
//! `Panic` together form the error family that flows through the
//! typed-failure effect.

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Uninhabited type. Plugs the success hole of a pure error outcome
/// (`Outcome<Never, E>`).
#[derive(Debug, PartialEq, Eq, Hash)]
pub enum Never {}

impl Clone for Never {
    fn clone(&self) -> Never {
        match *self {}
    }
}

impl fmt::Display for Never {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

/// Opaque description of an unrecoverable exception.
///
/// Constructible from the payload shape `std::panic::catch_unwind` returns,
/// so foreign unwinds can be folded into the error family at the boundary.
#[derive(Clone, PartialEq, Eq)]
pub struct PanicPayload {
    message: Arc<str>,
}

impl PanicPayload {
    pub fn new(message: impl Into<String>) -> PanicPayload {
        PanicPayload {
            message: Arc::from(message.into()),
        }
    }

    /// Fold an unwind payload into an opaque panic description.
    pub fn from_unwind(payload: Box<dyn Any + Send>) -> PanicPayload {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "opaque panic payload".to_string()
        };
        PanicPayload::new(message)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Debug for PanicPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PanicPayload").field(&self.message).finish()
    }
}

impl fmt::Display for PanicPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "panic: {}", self.message)
    }
}

impl Error for PanicPayload {}

/// Three-way discriminated outcome. Exactly one variant is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T, E> {
    Success(T),
    Failure(E),
    Panic(PanicPayload),
}

impl<T, E> Outcome<T, E> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    pub fn is_panic(&self) -> bool {
        matches!(self, Outcome::Panic(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U, E> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Failure(error) => Outcome::Failure(error),
            Outcome::Panic(payload) => Outcome::Panic(payload),
        }
    }

    pub fn map_failure<F>(self, f: impl FnOnce(E) -> F) -> Outcome<T, F> {
        match self {
            Outcome::Success(value) => Outcome::Success(value),
            Outcome::Failure(error) => Outcome::Failure(f(error)),
            Outcome::Panic(payload) => Outcome::Panic(payload),
        }
    }

    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            _ => None,
        }
    }
}

impl<T, E> Outcome<T, E>
where
    E: Error + Send + Sync + 'static,
{
    /// Convert the error family into a boxed exception. Defined only when
    /// `E` is provably an error type; `Panic` always converts directly.
    pub fn into_error(self) -> Result<T, Box<dyn Error + Send + Sync>> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(error) => Err(Box::new(error)),
            Outcome::Panic(payload) => Err(Box::new(payload)),
        }
    }
}

impl<E> Outcome<Never, E> {
    /// Re-type a pure error outcome at any success type.
    pub fn widen<T>(self) -> Outcome<T, E> {
        match self {
            Outcome::Success(never) => match never {},
            Outcome::Failure(error) => Outcome::Failure(error),
            Outcome::Panic(payload) => Outcome::Panic(payload),
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Outcome<T, E> {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(error) => Outcome::Failure(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
    #[error("boom: {0}")]
    struct Boom(String);

    #[test]
    fn test_map_touches_only_success() {
        let ok: Outcome<i64, Boom> = Outcome::Success(2);
        assert_eq!(ok.map(|v| v * 10), Outcome::Success(20));

        let err: Outcome<i64, Boom> = Outcome::Failure(Boom("x".into()));
        assert_eq!(err.map(|v| v * 10), Outcome::Failure(Boom("x".into())));
    }

    #[test]
    fn test_map_failure_touches_only_failure() {
        let err: Outcome<i64, Boom> = Outcome::Failure(Boom("x".into()));
        let mapped = err.map_failure(|e| e.0.len());
        assert_eq!(mapped, Outcome::Failure(1));
    }

    #[test]
    fn test_into_error_converts_failure_and_panic() {
        let err: Outcome<i64, Boom> = Outcome::Failure(Boom("bad".into()));
        assert_eq!(err.into_error().unwrap_err().to_string(), "boom: bad");

        let panicked: Outcome<i64, Boom> = Outcome::Panic(PanicPayload::new("dead"));
        assert_eq!(panicked.into_error().unwrap_err().to_string(), "panic: dead");
    }

    #[test]
    fn test_from_unwind_extracts_str_messages() {
        let payload = std::panic::catch_unwind(|| -> () { panic!("kaboom") }).unwrap_err();
        assert_eq!(PanicPayload::from_unwind(payload).message(), "kaboom");
    }

    #[test]
    fn test_widen_retypes_error_outcomes() {
        let err: Outcome<Never, Boom> = Outcome::Failure(Boom("x".into()));
        let widened: Outcome<String, Boom> = err.widen();
        assert!(widened.is_failure());
    }

    #[test]
    fn test_from_result() {
        let out: Outcome<i64, Boom> = Ok(3).into();
        assert_eq!(out, Outcome::Success(3));
    }
}
