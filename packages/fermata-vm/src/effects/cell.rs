//! Single-cell mutable state.
//!
//! Input: one of Get / Set / Update. Output: the resulting value (the current
//! value for Get, the written value for Set, the updated value for Update).
//!
//! The handler is the canonical stateful handler: an explicit loop that
//! threads the current value as an accumulator, re-installing itself with the
//! new value before looking for the next suspension of the effect. The cell
//! is private per `run` invocation; callers needing storage shared across
//! runs must capture the final value and re-enter with it.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use fermata_core::Tag;

use crate::computation::{Computation, Suspension};
use crate::value::Value;

/// Marker for the state cell of value type `S`. Never constructed.
pub struct Cell<S>(PhantomData<S>);

/// Tag of the `S` state cell.
pub fn tag<S: 'static>() -> Tag {
    Tag::of::<Cell<S>>()
}

/// One state operation.
pub enum CellOp<S> {
    Get,
    Set(S),
    Update(Arc<dyn Fn(S) -> S + Send + Sync>),
}

impl<S: Clone> Clone for CellOp<S> {
    fn clone(&self) -> CellOp<S> {
        match self {
            CellOp::Get => CellOp::Get,
            CellOp::Set(value) => CellOp::Set(value.clone()),
            CellOp::Update(f) => CellOp::Update(f.clone()),
        }
    }
}

impl<S> fmt::Debug for CellOp<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellOp::Get => f.write_str("Get"),
            CellOp::Set(_) => f.write_str("Set(..)"),
            CellOp::Update(_) => f.write_str("Update(..)"),
        }
    }
}

/// Read the current cell value.
pub fn get<S>() -> Computation<S>
where
    S: Clone + Send + Sync + 'static,
{
    op(CellOp::Get)
}

/// Replace the cell value; resumes with the written value.
pub fn set<S>(value: S) -> Computation<S>
where
    S: Clone + Send + Sync + 'static,
{
    op(CellOp::Set(value))
}

/// Apply `f` to the cell value; resumes with the updated value.
pub fn update<S, F>(f: F) -> Computation<S>
where
    S: Clone + Send + Sync + 'static,
    F: Fn(S) -> S + Send + Sync + 'static,
{
    op(CellOp::Update(Arc::new(f)))
}

fn op<S>(operation: CellOp<S>) -> Computation<S>
where
    S: Clone + Send + Sync + 'static,
{
    Computation::suspend(tag::<S>(), Value::new(operation)).map(|output| output.cast::<S>())
}

/// Discharge the `S` cell starting from `initial`, discarding the final
/// state.
pub fn run<A, S>(initial: S, comp: Computation<A>) -> Computation<A>
where
    A: 'static,
    S: Clone + Send + Sync + 'static,
{
    run_tuple(initial, comp).map(|(_, value)| value)
}

/// Discharge the `S` cell starting from `initial`, yielding the final state
/// alongside the result.
pub fn run_tuple<A, S>(initial: S, comp: Computation<A>) -> Computation<(S, A)>
where
    A: 'static,
    S: Clone + Send + Sync + 'static,
{
    let cell_tag = tag::<S>();
    let mut state = initial;
    let mut current = comp;
    loop {
        match current {
            Computation::Done(value) => return Computation::Done((state, value)),
            Computation::Suspend(suspension) => {
                if suspension.tag.is_subtype_of(&cell_tag) {
                    state = match suspension.input.cast::<CellOp<S>>() {
                        CellOp::Get => state,
                        CellOp::Set(value) => value,
                        CellOp::Update(f) => f(state),
                    };
                    current = (suspension.resume)(Value::new(state.clone()));
                } else {
                    let Suspension { tag, input, resume } = suspension;
                    let snapshot = state;
                    return Computation::Suspend(Suspension {
                        tag,
                        input,
                        resume: Arc::new(move |output| {
                            run_tuple(snapshot.clone(), resume(output))
                        }),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::eval;
    use crate::effects::emit;

    #[test]
    fn test_set_update_get_threads_state() {
        let comp = set(10i64)
            .flat_map(|_| update(|v: i64| v * 2))
            .flat_map(|_| get::<i64>());
        assert_eq!(eval(run(0i64, comp)).unwrap(), 20);
    }

    #[test]
    fn test_get_sees_initial_value() {
        assert_eq!(eval(run(42i64, get::<i64>())).unwrap(), 42);
    }

    #[test]
    fn test_set_resumes_with_written_value() {
        assert_eq!(eval(run(0i64, set(9i64))).unwrap(), 9);
    }

    #[test]
    fn test_update_resumes_with_updated_value() {
        let comp = set(4i64).flat_map(|_| update(|v: i64| v + 1));
        assert_eq!(eval(run(0i64, comp)).unwrap(), 5);
    }

    #[test]
    fn test_run_tuple_yields_final_state() {
        let comp = set(3i64).map(|_| "done");
        let (final_state, result) = eval(run_tuple(0i64, comp)).unwrap();
        assert_eq!(final_state, 3);
        assert_eq!(result, "done");
    }

    #[test]
    fn test_state_survives_rotation_around_foreign_effects() {
        // set, emit (foreign), update: the rotated re-entry must carry the
        // state written before the foreign suspension.
        let comp = set(1i64)
            .flat_map(|_| emit::emit("ping".to_string()))
            .flat_map(|_| update(|v: i64| v + 1));
        let comp = run_tuple(0i64, comp);
        let (emitted, (final_state, last)) =
            eval(emit::run_collect::<(i64, i64), String>(comp)).unwrap();
        assert_eq!(emitted, vec!["ping".to_string()]);
        assert_eq!(final_state, 2);
        assert_eq!(last, 2);
    }

    #[test]
    fn test_cells_of_distinct_types_are_independent() {
        let comp = set(1i64)
            .flat_map(|_| set("x".to_string()))
            .flat_map(|_| get::<i64>());
        let comp = run(0i64, comp);
        assert_eq!(eval(run("".to_string(), comp)).unwrap(), 1);
    }

    #[test]
    fn test_long_state_chain_discharges_flat() {
        fn bump(remaining: u32) -> Computation<i64> {
            if remaining == 0 {
                get::<i64>()
            } else {
                update(|v: i64| v + 1).flat_map(move |_| bump(remaining - 1))
            }
        }
        assert_eq!(eval(run(0i64, bump(50_000))).unwrap(), 50_000);
    }
}
