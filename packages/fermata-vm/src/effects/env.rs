//! Contextual read.
//!
//! Input: unit. Output: the full [`TypeMap`]. The suspension tag is the read
//! type's own tag (not a wrapper marker), which lets [`run_map`] discharge
//! every tag a map carries without a translation table.
//!
//! A read for a type the handler never bound is a programmer error: the
//! lookup fails with `MissingKey` and aborts. It is never retried.

use std::fmt;
use std::sync::Arc;

use fermata_core::{Tag, TypeMap};

use crate::computation::Computation;
use crate::dispatch::discharge;
use crate::value::Value;

/// Tag of the contextual-read channel for `T`.
pub fn tag<T: 'static>() -> Tag {
    Tag::of::<T>()
}

/// Read the contextual value of type `T`.
pub fn get<T>() -> Computation<T>
where
    T: Clone + fmt::Debug + Send + Sync + 'static,
{
    Computation::suspend(tag::<T>(), Value::unit()).map(|output| {
        let map = output.cast::<TypeMap>();
        match map.get::<T>() {
            Ok(value) => value.clone(),
            Err(missing) => panic!("{missing}"),
        }
    })
}

/// Read the contextual value of type `T` and apply `f`.
pub fn use_with<T, B, F>(f: F) -> Computation<B>
where
    T: Clone + fmt::Debug + Send + Sync + 'static,
    B: 'static,
    F: Fn(T) -> B + Send + Sync + 'static,
{
    get::<T>().map(f)
}

/// Discharge reads of `T` by resuming with a single-entry map containing
/// `value`.
pub fn run<A, T>(value: T, comp: Computation<A>) -> Computation<A>
where
    A: 'static,
    T: Clone + fmt::Debug + Send + Sync + 'static,
{
    run_tag(tag::<T>(), TypeMap::of(value), comp)
}

/// Discharge reads for every tag `map` carries, resuming each with the full
/// map.
pub fn run_map<A: 'static>(map: TypeMap, comp: Computation<A>) -> Computation<A> {
    let tags: Vec<Tag> = map.tags().cloned().collect();
    tags.into_iter()
        .fold(comp, |acc, t| run_tag(t, map.clone(), acc))
}

fn run_tag<A: 'static>(tag: Tag, map: TypeMap, comp: Computation<A>) -> Computation<A> {
    discharge(
        &tag,
        comp,
        Arc::new(move |_input: Value, resume| resume(Value::new(map.clone()))),
    )
}
