//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter.  The mapping to
//! simulated wall-clock time is held in `SimClock`:
//!
//!   sim_time = start_unix_secs + tick * tick_duration_secs
//!
//! The default tick is 60 s (one simulated minute).  How often a tick fires in
//! *real* time is a separate knob, [`SimConfig::tick_interval_ms`], used only
//! by paced runners.

use std::fmt;
use std::time::Duration;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The virtual clock: converts tick counts to simulated time of day.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated Unix timestamp of tick 0.
    pub start_unix_secs: i64,
    /// Simulated seconds per tick.  Default: 60.
    pub tick_duration_secs: u32,
    /// The last tick processed; advanced by `SimClock::advance()`.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(start_unix_secs: i64, tick_duration_secs: u32) -> Self {
        Self {
            start_unix_secs,
            tick_duration_secs,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Elapsed simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> i64 {
        self.current_tick.0 as i64 * self.tick_duration_secs as i64
    }

    #[inline]
    pub fn current_unix_secs(&self) -> i64 {
        self.start_unix_secs + self.elapsed_secs()
    }

    /// Simulated minutes represented by one tick (at least 1).
    #[inline]
    pub fn minutes_per_tick(&self) -> u32 {
        (self.tick_duration_secs / 60).max(1)
    }

    /// Simulated time of day as `"HH:MM"`.
    pub fn time_of_day(&self) -> String {
        let secs = self.current_unix_secs().rem_euclid(86_400);
        format!("{:02}:{:02}", secs / 3_600, (secs % 3_600) / 60)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.current_tick, self.time_of_day())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a TOML file by the application crate and passed to
/// the simulation builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Simulated Unix timestamp of tick 0.  Default: 08:00 on day 0.
    pub start_unix_secs: i64,

    /// Simulated seconds per tick.  Default: 60 (one minute).
    pub tick_duration_secs: u32,

    /// Total ticks for a bounded `run`.  `0` means unbounded.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical random events.
    pub seed: u64,

    /// Worker thread count passed to Rayon.  `None` uses all logical cores.
    pub num_threads: Option<usize>,

    /// Snapshot every N ticks.  `0` disables snapshots.
    pub output_interval_ticks: u64,

    /// Real wall-clock milliseconds between ticks for paced runners.
    pub tick_interval_ms: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_unix_secs:       8 * 3_600,
            tick_duration_secs:    60,
            total_ticks:           0,
            seed:                  42,
            num_threads:           None,
            output_interval_ticks: 1,
            tick_interval_ms:      2_000,
        }
    }
}

impl SimConfig {
    /// The tick at which a bounded run ends, or `None` if unbounded.
    #[inline]
    pub fn end_tick(&self) -> Option<Tick> {
        (self.total_ticks > 0).then_some(Tick(self.total_ticks))
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start_unix_secs, self.tick_duration_secs)
    }

    #[inline]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
