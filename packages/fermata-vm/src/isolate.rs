//! Isolation protocol: capture / isolate / restore.
//!
//! An isolate is an immutable strategy value describing how one effect's
//! ambient state is snapshotted, rebound privately around a computation, and
//! re-exposed afterward. `run` is always the same three ordered phases, no
//! branching:
//!
//! 1. **capture**: read a `State` snapshot of the governed effect
//! 2. **isolate**: run the computation with the effect bound to that
//!    snapshot, producing a `Transform`-wrapped result
//! 3. **restore**: unwrap the transform and decide how the final value is
//!    re-exposed to the caller
//!
//! Strategies compose sequentially with [`Isolate::and_then`]; [`Identity`]
//! is the two-sided neutral element.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use fermata_core::Outcome;

use crate::computation::Computation;
use crate::effects::{abort, cell};

/// A three-phase state-management strategy over one governed effect.
pub trait Isolate {
    /// Snapshot shape captured from the ambient effect.
    type State: Clone + Send + Sync + 'static;

    /// How a result is wrapped while isolated.
    type Transform<A: Clone + Send + Sync + 'static>: Clone + Send + Sync + 'static;

    /// Obtain a snapshot of the governed effect's ambient value and pass it
    /// on. Runs under the effect being removed plus the effects kept
    /// available.
    fn capture<A, F>(&self, f: F) -> Computation<A>
    where
        A: Clone + Send + Sync + 'static,
        F: Fn(Self::State) -> Computation<A> + Send + Sync + 'static;

    /// Run `comp` with the governed effect bound to `state`, producing the
    /// wrapped result.
    fn isolate<A>(
        &self,
        state: Self::State,
        comp: Computation<A>,
    ) -> Computation<Self::Transform<A>>
    where
        A: Clone + Send + Sync + 'static;

    /// Unwrap the transform and decide how the governed effect's final value
    /// is re-exposed.
    fn restore<A>(&self, comp: Computation<Self::Transform<A>>) -> Computation<A>
    where
        A: Clone + Send + Sync + 'static;

    /// The three phases in order.
    fn run<A>(&self, comp: Computation<A>) -> Computation<A>
    where
        Self: Clone + Sized + Send + Sync + 'static,
        A: Clone + Send + Sync + 'static,
    {
        let this = self.clone();
        self.capture(move |state| this.restore(this.isolate(state, comp.clone())))
    }

    /// Sequential composition: paired state, nested transform. Not
    /// commutative; capture and restore order both follow the composition
    /// order.
    fn and_then<J>(self, second: J) -> Then<Self, J>
    where
        Self: Sized,
        J: Isolate,
    {
        Then {
            first: self,
            second,
        }
    }
}

/// Neutral strategy: no state, pass-through phases.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Isolate for Identity {
    type State = ();
    type Transform<A: Clone + Send + Sync + 'static> = A;

    fn capture<A, F>(&self, f: F) -> Computation<A>
    where
        A: Clone + Send + Sync + 'static,
        F: Fn(()) -> Computation<A> + Send + Sync + 'static,
    {
        f(())
    }

    fn isolate<A>(&self, _state: (), comp: Computation<A>) -> Computation<A>
    where
        A: Clone + Send + Sync + 'static,
    {
        comp
    }

    fn restore<A>(&self, comp: Computation<A>) -> Computation<A>
    where
        A: Clone + Send + Sync + 'static,
    {
        comp
    }
}

/// Commit strategy over the `S` cell: state changes made inside propagate
/// out.
pub struct LastUpdate<S>(PhantomData<S>);

impl<S> LastUpdate<S> {
    pub fn new() -> LastUpdate<S> {
        LastUpdate(PhantomData)
    }
}

impl<S> Default for LastUpdate<S> {
    fn default() -> LastUpdate<S> {
        LastUpdate::new()
    }
}

impl<S> Clone for LastUpdate<S> {
    fn clone(&self) -> LastUpdate<S> {
        LastUpdate(PhantomData)
    }
}

impl<S> fmt::Debug for LastUpdate<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LastUpdate")
    }
}

impl<S: Clone + Send + Sync + 'static> Isolate for LastUpdate<S> {
    type State = S;
    type Transform<A: Clone + Send + Sync + 'static> = (S, A);

    fn capture<A, F>(&self, f: F) -> Computation<A>
    where
        A: Clone + Send + Sync + 'static,
        F: Fn(S) -> Computation<A> + Send + Sync + 'static,
    {
        cell::get::<S>().flat_map(f)
    }

    fn isolate<A>(&self, state: S, comp: Computation<A>) -> Computation<(S, A)>
    where
        A: Clone + Send + Sync + 'static,
    {
        cell::run_tuple(state, comp)
    }

    fn restore<A>(&self, comp: Computation<(S, A)>) -> Computation<A>
    where
        A: Clone + Send + Sync + 'static,
    {
        comp.flat_map(|(state, value)| cell::set(state).map(move |_| value.clone()))
    }
}

/// Rollback strategy over the `S` cell: mutations inside are invisible
/// outside.
pub struct Discard<S>(PhantomData<S>);

impl<S> Discard<S> {
    pub fn new() -> Discard<S> {
        Discard(PhantomData)
    }
}

impl<S> Default for Discard<S> {
    fn default() -> Discard<S> {
        Discard::new()
    }
}

impl<S> Clone for Discard<S> {
    fn clone(&self) -> Discard<S> {
        Discard(PhantomData)
    }
}

impl<S> fmt::Debug for Discard<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Discard")
    }
}

impl<S: Clone + Send + Sync + 'static> Isolate for Discard<S> {
    type State = S;
    type Transform<A: Clone + Send + Sync + 'static> = A;

    fn capture<A, F>(&self, f: F) -> Computation<A>
    where
        A: Clone + Send + Sync + 'static,
        F: Fn(S) -> Computation<A> + Send + Sync + 'static,
    {
        cell::get::<S>().flat_map(f)
    }

    fn isolate<A>(&self, state: S, comp: Computation<A>) -> Computation<A>
    where
        A: Clone + Send + Sync + 'static,
    {
        cell::run(state, comp)
    }

    fn restore<A>(&self, comp: Computation<A>) -> Computation<A>
    where
        A: Clone + Send + Sync + 'static,
    {
        comp
    }
}

/// Commit-or-rollback strategy over the `S` cell combined with the `E`
/// failure channel.
///
/// Success commits. Failure consults the predicate: true discards the state
/// change and re-raises; false commits and still re-raises. A panic always
/// commits and re-raises. The final state is observed inside `isolate`,
/// before any re-raise, because every path here needs it.
pub struct ConditionalUpdate<S, E> {
    discard_on: Arc<dyn Fn(&E) -> bool + Send + Sync>,
    _types: PhantomData<fn() -> (S, E)>,
}

impl<S, E> ConditionalUpdate<S, E> {
    pub fn new(discard_on: impl Fn(&E) -> bool + Send + Sync + 'static) -> ConditionalUpdate<S, E> {
        ConditionalUpdate {
            discard_on: Arc::new(discard_on),
            _types: PhantomData,
        }
    }
}

impl<S, E> Clone for ConditionalUpdate<S, E> {
    fn clone(&self) -> ConditionalUpdate<S, E> {
        ConditionalUpdate {
            discard_on: self.discard_on.clone(),
            _types: PhantomData,
        }
    }
}

impl<S, E> fmt::Debug for ConditionalUpdate<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConditionalUpdate")
    }
}

impl<S, E> Isolate for ConditionalUpdate<S, E>
where
    S: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    type State = S;
    type Transform<A: Clone + Send + Sync + 'static> = (S, Outcome<A, E>);

    fn capture<A, F>(&self, f: F) -> Computation<A>
    where
        A: Clone + Send + Sync + 'static,
        F: Fn(S) -> Computation<A> + Send + Sync + 'static,
    {
        cell::get::<S>().flat_map(f)
    }

    fn isolate<A>(&self, state: S, comp: Computation<A>) -> Computation<(S, Outcome<A, E>)>
    where
        A: Clone + Send + Sync + 'static,
    {
        cell::run_tuple(state, abort::run::<A, E>(comp))
    }

    fn restore<A>(&self, comp: Computation<(S, Outcome<A, E>)>) -> Computation<A>
    where
        A: Clone + Send + Sync + 'static,
    {
        let discard_on = self.discard_on.clone();
        comp.flat_map(move |(state, outcome)| match outcome {
            Outcome::Success(value) => cell::set(state).map(move |_| value.clone()),
            Outcome::Failure(error) => {
                if discard_on(&error) {
                    abort::fail::<A, E>(error)
                } else {
                    cell::set(state).flat_map(move |_| abort::fail::<A, E>(error.clone()))
                }
            }
            Outcome::Panic(payload) => {
                cell::set(state).flat_map(move |_| abort::panic::<A, E>(payload.clone()))
            }
        })
    }
}

/// Sequential composition of two isolates.
///
/// Capture nests first-then-second; isolate wraps `first` around `second`'s
/// result; restore un-nests in the reverse order.
#[derive(Debug, Clone)]
pub struct Then<I, J> {
    first: I,
    second: J,
}

impl<I, J> Isolate for Then<I, J>
where
    I: Isolate + Clone + Send + Sync + 'static,
    J: Isolate + Clone + Send + Sync + 'static,
{
    type State = (I::State, J::State);
    type Transform<A: Clone + Send + Sync + 'static> = I::Transform<J::Transform<A>>;

    fn capture<A, F>(&self, f: F) -> Computation<A>
    where
        A: Clone + Send + Sync + 'static,
        F: Fn(Self::State) -> Computation<A> + Send + Sync + 'static,
    {
        let second = self.second.clone();
        let f = Arc::new(f);
        self.first.capture(move |first_state: I::State| {
            let f = f.clone();
            second.capture(move |second_state: J::State| {
                f((first_state.clone(), second_state))
            })
        })
    }

    fn isolate<A>(
        &self,
        state: Self::State,
        comp: Computation<A>,
    ) -> Computation<Self::Transform<A>>
    where
        A: Clone + Send + Sync + 'static,
    {
        let (first_state, second_state) = state;
        self.first
            .isolate(first_state, self.second.isolate(second_state, comp))
    }

    fn restore<A>(&self, comp: Computation<Self::Transform<A>>) -> Computation<A>
    where
        A: Clone + Send + Sync + 'static,
    {
        self.second.restore(self.first.restore(comp))
    }
}
