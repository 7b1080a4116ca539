//! Error types for the engine.
//!
//! Effects signal failure through their own payloads (the typed-failure
//! effect); the engine itself only errors at a terminal run point, when a
//! suspension reaches the driver with a tag no handler recognized.

use fermata_core::Tag;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A computation reached the driver still suspended on an effect. Fatal:
    /// dropping the suspension would silently lose the work behind it.
    #[error("unhandled effect: computation is still suspended on {tag}")]
    UnhandledEffect { tag: Tag },

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl EngineError {
    pub fn unhandled_effect(tag: &Tag) -> EngineError {
        EngineError::UnhandledEffect { tag: tag.clone() }
    }

    pub fn internal(message: impl Into<String>) -> EngineError {
        EngineError::Internal {
            message: message.into(),
        }
    }
}
