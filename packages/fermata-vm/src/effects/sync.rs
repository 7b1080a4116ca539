//! The "Sync" composite capability.
//!
//! A named alias over a fixed pair of tags: the deferred-effect channel plus
//! the failure channel whose error type is the unrecoverable
//! [`PanicPayload`]. "May run an opaque side effect and may fail with an
//! arbitrary exception, but not with a checked error." Resolved at discharge
//! time by running both underlying handlers in sequence.

use fermata_core::{Outcome, PanicPayload, Tag};

use crate::computation::Computation;
use crate::effects::{abort, defer};

/// The two tags the composite discharges: deferred effects first, then the
/// unrecoverable failure channel.
pub fn tags() -> [Tag; 2] {
    [defer::tag(), abort::tag::<PanicPayload>()]
}

/// Discharge both underlying channels in sequence.
pub fn run<A: 'static>(comp: Computation<A>) -> Computation<Outcome<A, PanicPayload>> {
    abort::run::<A, PanicPayload>(defer::run(comp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::eval;
    use crate::effects::defer::delay;

    #[test]
    fn test_run_discharges_both_channels() {
        let comp = delay(|| 2i64).flat_map(|a| delay(move || a + 3));
        assert_eq!(eval(run(comp)).unwrap(), Outcome::Success(5));
    }

    #[test]
    fn test_run_surfaces_thunk_unwinds_as_panic() {
        let comp: Computation<i64> = delay(|| panic!("io exploded"));
        match eval(run(comp)).unwrap() {
            Outcome::Panic(payload) => assert_eq!(payload.message(), "io exploded"),
            other => panic!("expected Panic, got {other:?}"),
        }
    }

    #[test]
    fn test_tags_name_the_fixed_pair() {
        let [deferred, failure] = tags();
        assert_eq!(deferred, defer::tag());
        assert_eq!(failure, abort::tag::<PanicPayload>());
    }
}
