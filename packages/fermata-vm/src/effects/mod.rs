//! Reference effects.
//!
//! Each effect is a contract: a marker type whose [`Tag`](fermata_core::Tag)
//! identifies suspensions of the effect, constructors that are the only legal
//! way to build those suspensions, and a `run` family that is the only legal
//! way to discharge the tag. The input/output contracts are enforced here, at
//! the construction boundary, not by the engine.

pub mod abort;
pub mod cell;
pub mod defer;
pub mod emit;
pub mod env;
pub mod sync;
