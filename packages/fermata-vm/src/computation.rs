//! The central recursive data type: finished value or tagged suspension.
//!
//! `map` and `flat_map` compose resume functions; they never run anything.
//! Resume functions are `Arc<dyn Fn>` rather than boxed `FnOnce`: handlers
//! are allowed to resume a suspension zero, one, or many times, and a
//! computation may be shared and driven to completion independently by
//! different handler chains.

use std::fmt;
use std::sync::Arc;

use fermata_core::Tag;

use crate::value::Value;

/// Resume function of a suspension: output payload in, rest of the
/// computation out.
pub type ResumeFn<A> = Arc<dyn Fn(Value) -> Computation<A> + Send + Sync>;

/// A paused computation: effect tag, input payload, resume function.
///
/// Calling the resume function is the only legal way to advance past a
/// suspension.
pub struct Suspension<A> {
    pub tag: Tag,
    pub input: Value,
    pub resume: ResumeFn<A>,
}

impl<A> Clone for Suspension<A> {
    fn clone(&self) -> Suspension<A> {
        Suspension {
            tag: self.tag.clone(),
            input: self.input.clone(),
            resume: self.resume.clone(),
        }
    }
}

impl<A> fmt::Debug for Suspension<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suspension")
            .field("tag", &self.tag)
            .field("input", &self.input)
            .finish()
    }
}

/// A computation that either finished with a value or is waiting on an
/// effect.
pub enum Computation<A> {
    Done(A),
    Suspend(Suspension<A>),
}

impl<A: 'static> Computation<A> {
    /// Finished computation. Requires no effects.
    pub fn pure(value: A) -> Computation<A> {
        Computation::Done(value)
    }

    /// Transform the final value. For a suspension the transformation is
    /// composed into the resume chain; nothing runs here.
    pub fn map<B, F>(self, f: F) -> Computation<B>
    where
        B: 'static,
        F: Fn(A) -> B + Send + Sync + 'static,
    {
        self.map_shared(Arc::new(f))
    }

    fn map_shared<B: 'static>(self, f: Arc<dyn Fn(A) -> B + Send + Sync>) -> Computation<B> {
        match self {
            Computation::Done(value) => Computation::Done(f(value)),
            Computation::Suspend(suspension) => {
                let Suspension { tag, input, resume } = suspension;
                Computation::Suspend(Suspension {
                    tag,
                    input,
                    resume: Arc::new(move |output| resume(output).map_shared(f.clone())),
                })
            }
        }
    }

    /// Sequence another computation after this one. The single building
    /// block from which the other sequencing operators are derived.
    pub fn flat_map<B, F>(self, f: F) -> Computation<B>
    where
        B: 'static,
        F: Fn(A) -> Computation<B> + Send + Sync + 'static,
    {
        self.flat_map_shared(Arc::new(f))
    }

    fn flat_map_shared<B: 'static>(
        self,
        f: Arc<dyn Fn(A) -> Computation<B> + Send + Sync>,
    ) -> Computation<B> {
        match self {
            Computation::Done(value) => f(value),
            Computation::Suspend(suspension) => {
                let Suspension { tag, input, resume } = suspension;
                Computation::Suspend(Suspension {
                    tag,
                    input,
                    resume: Arc::new(move |output| resume(output).flat_map_shared(f.clone())),
                })
            }
        }
    }

    /// Run `self`, discard its result, then run `next`.
    pub fn then<B>(self, next: Computation<B>) -> Computation<B>
    where
        B: Clone + Send + Sync + 'static,
    {
        self.flat_map(move |_| next.clone())
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Computation::Done(_))
    }
}

impl Computation<Value> {
    /// Suspension on `tag` with an identity resume: the handler's output
    /// payload becomes the final value.
    pub fn suspend(tag: Tag, input: Value) -> Computation<Value> {
        Computation::Suspend(Suspension {
            tag,
            input,
            resume: Arc::new(Computation::Done),
        })
    }
}

impl Computation<()> {
    /// Finished unit computation.
    pub fn unit() -> Computation<()> {
        Computation::Done(())
    }
}

impl<A: Clone> Clone for Computation<A> {
    fn clone(&self) -> Computation<A> {
        match self {
            Computation::Done(value) => Computation::Done(value.clone()),
            Computation::Suspend(suspension) => Computation::Suspend(suspension.clone()),
        }
    }
}

impl<A: fmt::Debug> fmt::Debug for Computation<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Computation::Done(value) => f.debug_tuple("Done").field(value).finish(),
            Computation::Suspend(suspension) => {
                f.debug_tuple("Suspend").field(suspension).finish()
            }
        }
    }
}
