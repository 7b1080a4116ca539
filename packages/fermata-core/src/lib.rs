//! fermata-core: leaf types for the fermata effect runtime.
//!
//! This crate has no knowledge of the suspension engine. It provides:
//!
//! - **`Tag`**: runtime identity tokens for types, with equality and a
//!   declared subtype relation
//! - **`TypeMap`**: an immutable, insertion-ordered heterogeneous map keyed
//!   by `Tag`
//! - **`Outcome`**: the three-way result type (success / typed failure /
//!   opaque panic)

pub mod outcome;
pub mod tag;
pub mod typemap;

// Re-exports for convenience
pub use outcome::{Never, Outcome, PanicPayload};
pub use tag::Tag;
pub use typemap::{MissingKey, TypeMap};
