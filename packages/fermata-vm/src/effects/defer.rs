//! Deferred side effect.
//!
//! Input: unit. Output: unit. The suspension marks the pause point; the thunk
//! itself lives in the resume chain, so nothing runs until a handler resumes.
//! An unwind inside the thunk is caught at the boundary and re-surfaced as a
//! panic suspension on the `Abort<PanicPayload>` channel. All failure,
//! expected or not, flows through the typed-failure channel, never as a
//! native unwind past the engine.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use fermata_core::{PanicPayload, Tag};

use crate::computation::Computation;
use crate::dispatch::handle;
use crate::effects::abort;
use crate::value::Value;

/// Marker for the deferred-effect channel. Never constructed.
pub struct Defer;

/// Tag of the deferred-effect channel.
pub fn tag() -> Tag {
    Tag::of::<Defer>()
}

/// Defer a side-effecting thunk producing a plain value.
pub fn delay<A, F>(thunk: F) -> Computation<A>
where
    A: 'static,
    F: Fn() -> A + Send + Sync + 'static,
{
    defer(move || Computation::pure(thunk()))
}

/// Defer a side-effecting thunk producing a computation.
pub fn defer<A, F>(thunk: F) -> Computation<A>
where
    A: 'static,
    F: Fn() -> Computation<A> + Send + Sync + 'static,
{
    Computation::suspend(tag(), Value::unit()).flat_map(move |_| {
        match catch_unwind(AssertUnwindSafe(&thunk)) {
            Ok(comp) => comp,
            Err(payload) => {
                abort::panic::<A, PanicPayload>(PanicPayload::from_unwind(payload))
            }
        }
    })
}

/// Discharge the deferred-effect channel by resuming each suspension with
/// unit, which runs the deferred thunk behind it.
pub fn run<A: 'static>(comp: Computation<A>) -> Computation<A> {
    handle(&tag(), comp, |_input, resume| resume(Value::unit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::eval;
    use fermata_core::Outcome;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_thunk_does_not_run_until_discharged() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_in = calls.clone();
        let comp = delay(move || calls_in.fetch_add(1, Ordering::Relaxed));
        assert_eq!(calls.load(Ordering::Relaxed), 0);
        eval(run(comp)).unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_delayed_value_flows_out() {
        let comp = delay(|| 6i64).map(|v| v * 7);
        assert_eq!(eval(run(comp)).unwrap(), 42);
    }

    #[test]
    fn test_unwind_becomes_panic_on_the_failure_channel() {
        let comp: Computation<i64> = delay(|| panic!("thunk exploded"));
        let handled = abort::run::<i64, PanicPayload>(run(comp));
        match eval(handled).unwrap() {
            Outcome::Panic(payload) => assert_eq!(payload.message(), "thunk exploded"),
            other => panic!("expected Panic, got {other:?}"),
        }
    }

    #[test]
    fn test_defer_flattens_inner_computation() {
        let comp = defer(|| delay(|| 5i64));
        assert_eq!(eval(run(comp)).unwrap(), 5);
    }
}
