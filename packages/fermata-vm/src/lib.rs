//! fermata-vm: suspension engine for algebraic effects.
//!
//! # Architecture
//!
//! - **Tagged suspensions**: a `Computation` is either `Done` or suspended on
//!   an effect tag with a dynamic payload and a multi-shot resume function
//! - **Rotate-and-discharge**: one iterative handling algorithm
//!   ([`dispatch::discharge`]) shared by every handler
//! - **Reference effects**: typed failure, signal emission, contextual read,
//!   deferred side effect, single-cell state
//! - **Isolation protocol**: capture/isolate/restore strategies for scoping
//!   the state effect across a computation boundary

pub mod computation;
pub mod dispatch;
pub mod driver;
pub mod effects;
pub mod error;
pub mod isolate;
pub mod value;


// Re-exports for convenience
pub use computation::{Computation, ResumeFn, Suspension};
pub use dispatch::{discharge, handle, HandlerFn};
pub use driver::{eval, run_sync};
pub use error::EngineError;
pub use fermata_core::{MissingKey, Never, Outcome, PanicPayload, Tag, TypeMap};
pub use isolate::{ConditionalUpdate, Discard, Identity, Isolate, LastUpdate, Then};
pub use value::Value;
