//! Process-wide cooldown and circuit breaker in front of the routing provider.
//!
//! # Call spacing
//!
//! Consecutive provider calls are at least `min_interval` apart, across every
//! caller.  A caller that arrives early is handed the next free slot and
//! sleeps until it, so concurrent callers queue up instead of failing.  The
//! slot is reserved under the lock; the sleep happens outside it, so a
//! waiting caller never blocks the guard for anyone else.
//!
//! # Circuit breaker
//!
//! A rate-limit response opens the circuit for `circuit_open_secs`.  While
//! open, [`ProviderGuard::acquire`] fails fast with
//! [`ProviderError::CircuitOpen`]; the first call after the window closes
//! the circuit and proceeds.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use fleet_core::Clock;

use crate::ProviderError;

// ── GuardConfig ───────────────────────────────────────────────────────────────

/// Tuning for [`ProviderGuard`] and the client retry loop.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GuardConfig {
    /// Minimum spacing between any two provider calls.  Default: 2500 ms.
    pub min_interval_ms: u64,
    /// How long a rate-limit response suspends the provider.  Default: 300 s.
    pub circuit_open_secs: u64,
    /// Attempts per logical request before falling back.  Default: 2.
    pub max_attempts: u32,
    /// Per-request HTTP timeout.  Default: 5000 ms.
    pub request_timeout_ms: u64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            min_interval_ms:    2_500,
            circuit_open_secs:  300,
            max_attempts:       2,
            request_timeout_ms: 5_000,
        }
    }
}

impl GuardConfig {
    #[inline]
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    #[inline]
    pub fn circuit_open_for(&self) -> Duration {
        Duration::from_secs(self.circuit_open_secs)
    }

    #[inline]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

// ── ProviderGuard ─────────────────────────────────────────────────────────────

#[derive(Default)]
struct GuardState {
    /// Start time of the most recently reserved call slot.
    last_call:        Option<Duration>,
    circuit_open:     bool,
    circuit_reset_at: Duration,
}

pub struct ProviderGuard {
    config: GuardConfig,
    clock:  Arc<dyn Clock>,
    state:  Mutex<GuardState>,
}

impl ProviderGuard {
    pub fn new(config: GuardConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock, state: Mutex::new(GuardState::default()) }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Wait for permission to call the provider.
    ///
    /// Returns `Err(CircuitOpen)` immediately while the circuit is open.
    /// Otherwise reserves the next call slot and sleeps until it arrives.
    pub fn acquire(&self) -> Result<(), ProviderError> {
        let wait = {
            let mut st = self.state.lock();
            let now = self.clock.now();

            if st.circuit_open {
                if now < st.circuit_reset_at {
                    return Err(ProviderError::CircuitOpen);
                }
                st.circuit_open = false;
                info!("routing provider circuit closed");
            }

            let slot = match st.last_call {
                Some(last) => (last + self.config.min_interval()).max(now),
                None => now,
            };
            st.last_call = Some(slot);
            slot - now
        };

        if !wait.is_zero() {
            debug!(wait_ms = wait.as_millis() as u64, "provider cooldown");
            self.clock.sleep(wait);
        }
        Ok(())
    }

    /// Open the circuit for the configured window, starting now.
    pub fn record_rate_limited(&self) {
        let mut st = self.state.lock();
        let reset_at = self.clock.now() + self.config.circuit_open_for();
        if !st.circuit_open {
            warn!(
                open_secs = self.config.circuit_open_secs,
                "routing provider rate limited; circuit opened"
            );
        }
        st.circuit_open = true;
        st.circuit_reset_at = reset_at;
    }

    /// `true` while calls would fail fast.
    pub fn is_open(&self) -> bool {
        let st = self.state.lock();
        st.circuit_open && self.clock.now() < st.circuit_reset_at
    }
}
