//! The rotate-and-discharge handling algorithm.
//!
//! Given a target tag and a handler, walk a computation:
//!
//! - `Done` is returned unchanged
//! - a suspension whose tag matches the target (subtype match) is consumed:
//!   the handler receives the input payload and the resume function, and the
//!   loop continues on the handler's result, so one handler instance threads
//!   its own state across any number of suspensions of the same effect
//! - a non-matching suspension is **rotated**: rebuilt with the same tag and
//!   input but with its resume wrapped to re-enter this algorithm, preserving
//!   the foreign effect for an outer handler
//!
//! The matching case is an explicit loop, not recursion. The rotation wraps
//! re-entry in a resume closure, so when an enclosing handler (itself a loop)
//! drives a long chain of foreign suspensions, the stack stays flat: depth
//! grows with handler nesting, never with chain length.

use std::sync::Arc;

use fermata_core::Tag;
use log::trace;

use crate::computation::{Computation, ResumeFn, Suspension};
use crate::value::Value;

/// A handler for one effect tag: input payload and resume function in,
/// transformed computation out. May resume zero, one, or many times.
pub type HandlerFn<A> = Arc<dyn Fn(Value, ResumeFn<A>) -> Computation<A> + Send + Sync>;

/// Discharge every suspension of `tag` in `comp` with `handler`.
pub fn discharge<A: 'static>(tag: &Tag, comp: Computation<A>, handler: HandlerFn<A>) -> Computation<A> {
    let mut current = comp;
    loop {
        match current {
            Computation::Done(value) => return Computation::Done(value),
            Computation::Suspend(suspension) => {
                if suspension.tag.is_subtype_of(tag) {
                    trace!("discharge {}: handling suspension", tag);
                    let Suspension { input, resume, .. } = suspension;
                    current = handler(input, resume);
                } else {
                    trace!(
                        "discharge {}: rotating suspension on {}",
                        tag,
                        suspension.tag
                    );
                    return rotate(tag.clone(), suspension, handler);
                }
            }
        }
    }
}

/// Convenience wrapper taking an unboxed handler closure.
pub fn handle<A, H>(tag: &Tag, comp: Computation<A>, handler: H) -> Computation<A>
where
    A: 'static,
    H: Fn(Value, ResumeFn<A>) -> Computation<A> + Send + Sync + 'static,
{
    discharge(tag, comp, Arc::new(handler))
}

fn rotate<A: 'static>(
    target: Tag,
    suspension: Suspension<A>,
    handler: HandlerFn<A>,
) -> Computation<A> {
    let Suspension { tag, input, resume } = suspension;
    Computation::Suspend(Suspension {
        tag,
        input,
        resume: Arc::new(move |output| {
            discharge(&target, resume(output), handler.clone())
        }),
    })
}
