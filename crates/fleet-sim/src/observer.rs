//! Simulation observer trait for progress reporting and data collection.

use fleet_core::{SimClock, Tick};
use fleet_mobility::{TruckState, TruckStatus};

use crate::DecisionRecord;

/// Per-tick fleet counts handed to [`SimObserver::on_tick_end`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickSummary {
    pub tick:      Tick,
    pub moving:    usize,
    pub refueling: usize,
    pub stranded:  usize,
    pub arrived:   usize,
    pub idle:      usize,
    /// Events dispatched this tick.
    pub events:    usize,
}

impl TickSummary {
    pub fn count(tick: Tick, trucks: &[TruckState], events: usize) -> Self {
        let mut s = TickSummary { tick, events, ..Default::default() };
        for t in trucks {
            match t.status {
                TruckStatus::EnRoute | TruckStatus::Rerouting => s.moving += 1,
                TruckStatus::Refueling      => s.refueling += 1,
                TruckStatus::StoppedForFuel => s.stranded += 1,
                TruckStatus::Arrived        => s.arrived += 1,
                TruckStatus::Idle           => s.idle += 1,
            }
        }
        s
    }
}

/// Callbacks invoked by [`FleetSim`][crate::FleetSim] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter;
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, summary: &TickSummary) {
///         println!("{}: {} moving, {} arrived", summary.tick, summary.moving, summary.arrived);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called right after the virtual clock advanced, before any truck moves.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per dispatched event, after its decision was applied.
    fn on_event(&mut self, _record: &DecisionRecord) {}

    /// Called at the end of each tick.
    fn on_tick_end(&mut self, _summary: &TickSummary) {}

    /// Called every `config.output_interval_ticks` ticks with the full fleet.
    fn on_snapshot(&mut self, _clock: &SimClock, _trucks: &[TruckState]) {}

    /// Called once after a bounded [`run`][crate::FleetSim::run] finishes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
