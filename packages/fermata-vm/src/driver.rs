//! Terminal run points.
//!
//! A surrounding program runner is expected to discharge effects until a
//! computation is done, then perform the corresponding native side effect.
//! The engine's own boundary is small: [`eval`] extracts a finished value and
//! treats a leftover suspension as a fatal internal-consistency violation;
//! [`run_sync`] is the standard terminal chain for computations whose only
//! remaining capabilities are the "Sync" pair.

use fermata_core::{Outcome, PanicPayload};
use log::debug;

use crate::computation::Computation;
use crate::effects::sync;
use crate::error::EngineError;

/// Extract the final value of a fully discharged computation.
///
/// A suspension reaching this point means a tag escaped every installed
/// handler; the error is fatal rather than silently dropping the suspension.
pub fn eval<A>(comp: Computation<A>) -> Result<A, EngineError> {
    match comp {
        Computation::Done(value) => Ok(value),
        Computation::Suspend(suspension) => {
            debug!("eval reached a live suspension on {}", suspension.tag);
            Err(EngineError::unhandled_effect(&suspension.tag))
        }
    }
}

/// Discharge the "Sync" pair (deferred effects, unrecoverable failures) and
/// extract the outcome.
pub fn run_sync<A: 'static>(comp: Computation<A>) -> Result<Outcome<A, PanicPayload>, EngineError> {
    eval(sync::run(comp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::defer::delay;
    use crate::effects::emit;

    #[test]
    fn test_eval_done() {
        assert_eq!(eval(Computation::pure(1i64)).unwrap(), 1);
    }

    #[test]
    fn test_eval_rejects_live_suspensions() {
        let comp = emit::emit(1i64);
        let err = eval(comp).unwrap_err();
        assert!(matches!(err, EngineError::UnhandledEffect { .. }));
    }

    #[test]
    fn test_run_sync_executes_deferred_work() {
        let comp = delay(|| 21i64).map(|v| v * 2);
        assert_eq!(run_sync(comp).unwrap(), Outcome::Success(42));
    }

    #[test]
    fn test_run_sync_reports_foreign_tags_as_fatal() {
        let comp = emit::emit("stray".to_string()).map(|_| 0i64);
        assert!(run_sync(comp).is_err());
    }
}
