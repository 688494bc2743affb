//! Mutes a decision source for a while after it reports a rate limit.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{info, warn};

use fleet_core::Clock;

use crate::{
    DecisionContext, DecisionError, DecisionReply, DecisionResult, DecisionSource, TruckEvent,
    TruckSnapshot,
};

/// Wraps a [`DecisionSource`]; after it returns
/// [`DecisionError::RateLimited`] every request fails fast with
/// [`DecisionError::Unavailable`] until the cooldown has passed.
///
/// The simulation answers those failures with its heuristic, so a rate-limited
/// service is not called again on every event.
pub struct CooldownSource<S> {
    inner:       S,
    clock:       Arc<dyn Clock>,
    cooldown:    Duration,
    muted_until: Mutex<Option<Duration>>,
}

impl<S: DecisionSource> CooldownSource<S> {
    pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(120);

    pub fn new(inner: S, clock: Arc<dyn Clock>) -> Self {
        Self::with_cooldown(inner, clock, Self::DEFAULT_COOLDOWN)
    }

    pub fn with_cooldown(inner: S, clock: Arc<dyn Clock>, cooldown: Duration) -> Self {
        Self { inner, clock, cooldown, muted_until: Mutex::new(None) }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Time left before the wrapped source is called again.
    pub fn remaining(&self) -> Option<Duration> {
        let until = (*self.muted_until.lock())?;
        until.checked_sub(self.clock.now()).filter(|d| !d.is_zero())
    }

    pub fn is_muted(&self) -> bool {
        self.remaining().is_some()
    }

    /// Lift the mute immediately.
    pub fn reset_cooldown(&self) {
        *self.muted_until.lock() = None;
    }
}

impl<S: DecisionSource> DecisionSource for CooldownSource<S> {
    fn decide(
        &self,
        truck: &TruckSnapshot,
        event: &TruckEvent,
        ctx:   &DecisionContext<'_>,
    ) -> DecisionResult<DecisionReply> {
        if let Some(left) = self.remaining() {
            return Err(DecisionError::Unavailable(format!(
                "cooling down for another {}s",
                left.as_secs()
            )));
        }
        {
            let mut muted = self.muted_until.lock();
            if muted.take().is_some() {
                info!("decision source cooldown over");
            }
        }

        let result = self.inner.decide(truck, event, ctx);
        if matches!(result, Err(DecisionError::RateLimited)) {
            warn!(secs = self.cooldown.as_secs(), "decision source rate limited; muting");
            *self.muted_until.lock() = Some(self.clock.now() + self.cooldown);
        }
        result
    }
}
