//! Signal emission.
//!
//! Input: the emitted value. Output: unit. One tag per emitted type, so a
//! computation can carry several independent signal streams.

use std::marker::PhantomData;
use std::sync::Arc;

use fermata_core::Tag;

use crate::computation::{Computation, Suspension};
use crate::dispatch::discharge;
use crate::value::Value;

/// Marker for the emission channel of value type `V`. Never constructed.
pub struct Emit<V>(PhantomData<V>);

/// Tag of the `V` emission channel.
pub fn tag<V: 'static>() -> Tag {
    Tag::of::<Emit<V>>()
}

/// Emit a value on the `V` channel.
pub fn emit<V>(value: V) -> Computation<()>
where
    V: Clone + Send + Sync + 'static,
{
    Computation::suspend(tag::<V>(), Value::new(value)).map(|_| ())
}

/// Discharge the `V` channel by invoking `f` on each emitted value, folding
/// `f`'s own computation in sequence before resuming with unit.
pub fn run_foreach<A, V, F>(comp: Computation<A>, f: F) -> Computation<A>
where
    A: 'static,
    V: Clone + Send + Sync + 'static,
    F: Fn(V) -> Computation<()> + Send + Sync + 'static,
{
    let f = Arc::new(f);
    discharge(
        &tag::<V>(),
        comp,
        Arc::new(move |input: Value, resume| {
            let value = input.cast::<V>();
            f(value).flat_map(move |_| resume(Value::unit()))
        }),
    )
}

/// Discharge the `V` channel, dropping every emitted value.
pub fn run_discard<A, V>(comp: Computation<A>) -> Computation<A>
where
    A: 'static,
    V: Clone + Send + Sync + 'static,
{
    run_foreach(comp, |_: V| Computation::unit())
}

/// Discharge the `V` channel, accumulating emitted values in emission order
/// alongside the result.
pub fn run_collect<A, V>(comp: Computation<A>) -> Computation<(Vec<V>, A)>
where
    A: 'static,
    V: Clone + Send + Sync + 'static,
{
    collect_loop(Vec::new(), comp)
}

// Accumulator loop in the same shape as cell::run_tuple: matching
// suspensions are consumed iteratively, foreign ones rotate with the
// accumulated prefix captured in the re-entry closure.
fn collect_loop<A, V>(mut collected: Vec<V>, comp: Computation<A>) -> Computation<(Vec<V>, A)>
where
    A: 'static,
    V: Clone + Send + Sync + 'static,
{
    let emit_tag = tag::<V>();
    let mut current = comp;
    loop {
        match current {
            Computation::Done(value) => return Computation::Done((collected, value)),
            Computation::Suspend(suspension) => {
                if suspension.tag.is_subtype_of(&emit_tag) {
                    collected.push(suspension.input.cast::<V>());
                    current = (suspension.resume)(Value::unit());
                } else {
                    let Suspension { tag, input, resume } = suspension;
                    let prefix = collected;
                    return Computation::Suspend(Suspension {
                        tag,
                        input,
                        resume: Arc::new(move |output| {
                            collect_loop(prefix.clone(), resume(output))
                        }),
                    });
                }
            }
        }
    }
}
