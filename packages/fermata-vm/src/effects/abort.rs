//! Typed failure.
//!
//! Input: a pure error outcome (`Outcome<Never, E>`). Output: never. The
//! resume function of a failure suspension is unreachable, so everything
//! sequenced after a `fail`/`panic` is garbage, not cancelled.
//!
//! One tag per error type: a computation may declare several independent
//! failure channels (`Abort<ValidationError>`, `Abort<DbError>`) and have
//! them discharged one at a time with zero cross-talk.

use std::marker::PhantomData;
use std::sync::Arc;

use fermata_core::{Never, Outcome, PanicPayload, Tag};

use crate::computation::{Computation, Suspension};
use crate::dispatch::discharge;
use crate::value::Value;

/// Marker for the failure channel of error type `E`. Never constructed.
pub struct Abort<E>(PhantomData<E>);

/// Tag of the `E` failure channel.
pub fn tag<E: 'static>() -> Tag {
    Tag::of::<Abort<E>>()
}

/// Suspend on the `E` channel with a typed failure.
pub fn fail<A, E>(error: E) -> Computation<A>
where
    A: 'static,
    E: Clone + Send + Sync + 'static,
{
    raise(Outcome::Failure(error))
}

/// Suspend on the `E` channel with an unrecoverable panic.
pub fn panic<A, E>(payload: PanicPayload) -> Computation<A>
where
    A: 'static,
    E: Clone + Send + Sync + 'static,
{
    raise::<A, E>(Outcome::Panic(payload))
}

/// Suspend on the `E` channel with an error outcome.
pub fn raise<A, E>(outcome: Outcome<Never, E>) -> Computation<A>
where
    A: 'static,
    E: Clone + Send + Sync + 'static,
{
    Computation::Suspend(Suspension {
        tag: tag::<E>(),
        input: Value::new(outcome),
        resume: Arc::new(|_| unreachable!("typed-failure suspensions are never resumed")),
    })
}

/// Discharge the `E` channel: the final value is lifted into `Success`, and a
/// failure suspension short-circuits to its error outcome without resuming.
pub fn run<A, E>(comp: Computation<A>) -> Computation<Outcome<A, E>>
where
    A: 'static,
    E: Clone + Send + Sync + 'static,
{
    let lifted = comp.map(Outcome::Success);
    discharge(
        &tag::<E>(),
        lifted,
        Arc::new(|input: Value, _resume| {
            let outcome = input.cast::<Outcome<Never, E>>();
            Computation::Done(outcome.widen())
        }),
    )
}

/// Discharge the `E` channel, folding failures through `f`. Panics stay on
/// the channel and keep propagating.
pub fn recover<A, E, F>(comp: Computation<A>, f: F) -> Computation<A>
where
    A: 'static,
    E: Clone + Send + Sync + 'static,
    F: Fn(E) -> Computation<A> + Send + Sync + 'static,
{
    run::<A, E>(comp).flat_map(move |outcome| match outcome {
        Outcome::Success(value) => Computation::pure(value),
        Outcome::Failure(error) => f(error),
        Outcome::Panic(payload) => panic::<A, E>(payload),
    })
}
