//! A decision source that never changes anything.

use crate::{
    Decision, DecisionContext, DecisionReply, DecisionResult, DecisionSource, TruckEvent,
    TruckSnapshot,
};

/// A [`DecisionSource`] that always answers `CONTINUE` with full confidence.
///
/// Useful as a placeholder in tests and for runs without an external
/// reasoning service.  Low-fuel events still get the heuristic override.
pub struct ContinueSource;

impl DecisionSource for ContinueSource {
    fn decide(
        &self,
        _truck: &TruckSnapshot,
        event:  &TruckEvent,
        _ctx:   &DecisionContext<'_>,
    ) -> DecisionResult<DecisionReply> {
        Ok(DecisionReply::new(
            Decision::proceed(format!("No action needed for {}", event.kind), 1.0),
            vec![],
        ))
    }
}
