//! Wall-clock abstraction for real-time concerns (provider cooldowns,
//! circuit-breaker windows, decision-source mute periods).
//!
//! The simulation's *virtual* time lives in [`SimClock`][crate::SimClock];
//! this module is about the real passage of time between external calls.
//! Anything that waits or measures elapsed time takes a `Clock` so tests can
//! swap in a [`ManualClock`] and run instantly.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// A monotonic time source that can also suspend the caller.
pub trait Clock: Send + Sync {
    /// Time elapsed since this clock's (arbitrary, fixed) origin.
    fn now(&self) -> Duration;

    /// Suspend the calling thread for `d`.
    fn sleep(&self, d: Duration);
}

// ── SystemClock ───────────────────────────────────────────────────────────────

/// Real time, measured from the moment the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, d: Duration) {
        if !d.is_zero() {
            std::thread::sleep(d);
        }
    }
}

// ── ManualClock ───────────────────────────────────────────────────────────────

/// Virtual time that only moves when told to.
///
/// `sleep` advances the clock instead of blocking, so code under test that
/// waits out a cooldown completes immediately while still observing the
/// elapsed time.
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `d`.
    pub fn advance(&self, d: Duration) {
        self.nanos.fetch_add(d.as_nanos() as u64, Ordering::SeqCst);
    }

    /// Total time spent in `sleep` plus explicit advances.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.elapsed()
    }

    fn sleep(&self, d: Duration) {
        self.advance(d);
    }
}
