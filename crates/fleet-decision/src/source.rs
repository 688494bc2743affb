//! The two extension points the simulation dispatches events through.

use crate::{DecisionContext, DecisionReply, DecisionResult, TruckEvent, TruckSnapshot};

/// Produces a decision for one truck facing one event.
///
/// This is where an external reasoning service plugs in.  Implementations
/// may block (network calls, rate-limit waits); the simulation calls them
/// sequentially after the movement phase of a tick.
///
/// # Failure
///
/// Any `Err` is answered by the simulation's [`HeuristicFallback`], so a
/// source never has to invent a "safe" decision itself.  Return
/// [`DecisionError::RateLimited`][crate::DecisionError::RateLimited] for
/// quota errors so a [`CooldownSource`][crate::CooldownSource] wrapper can
/// mute the source for a while.
///
/// # Example
///
/// ```rust,ignore
/// struct AlwaysWait;
///
/// impl DecisionSource for AlwaysWait {
///     fn decide(&self, _: &TruckSnapshot, _: &TruckEvent, _: &DecisionContext<'_>)
///         -> DecisionResult<DecisionReply>
///     {
///         Ok(DecisionReply::new(
///             Decision::new(Action::Wait, "holding position", 0.9, Impact::None),
///             vec![],
///         ))
///     }
/// }
/// ```
pub trait DecisionSource: Send + Sync + 'static {
    fn decide(
        &self,
        truck: &TruckSnapshot,
        event: &TruckEvent,
        ctx:   &DecisionContext<'_>,
    ) -> DecisionResult<DecisionReply>;
}

/// Deterministic local rules used whenever a [`DecisionSource`] fails, and
/// for the low-fuel safety override.
///
/// Infallible by contract: the worst answer is `CONTINUE`.
pub trait HeuristicFallback: Send + Sync + 'static {
    /// `reason` is a short description of why the fallback ran, recorded in
    /// the returned trace.
    fn fallback(
        &self,
        truck:  &TruckSnapshot,
        event:  &TruckEvent,
        reason: &str,
        ctx:    &DecisionContext<'_>,
    ) -> DecisionReply;
}
