//! A thread-safe handle to a running simulation, plus a paced background
//! ticker.
//!
//! The ticker takes the lock for exactly one tick at a time, so snapshots,
//! event injections and resets from other threads always land between whole
//! ticks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, info};

use fleet_decision::{DecisionSource, HeuristicFallback};

use crate::{
    DecisionRecord, FleetConfig, FleetSim, FleetSnapshot, NoopObserver, SimError, SimObserver,
    SimResult, TickSummary,
};

/// Cloneable shared ownership of a [`FleetSim`].
pub struct SharedSim<D: DecisionSource, H: HeuristicFallback> {
    inner: Arc<Mutex<FleetSim<D, H>>>,
}

impl<D: DecisionSource, H: HeuristicFallback> Clone for SharedSim<D, H> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<D: DecisionSource, H: HeuristicFallback> SharedSim<D, H> {
    pub fn new(sim: FleetSim<D, H>) -> Self {
        Self { inner: Arc::new(Mutex::new(sim)) }
    }

    pub fn tick(&self) -> TickSummary {
        self.inner.lock().tick(&mut NoopObserver)
    }

    pub fn snapshot(&self) -> FleetSnapshot {
        self.inner.lock().snapshot()
    }

    pub fn inject_event(&self, truck_id: &str, event_type: &str) -> SimResult<DecisionRecord> {
        self.inner.lock().inject_event(truck_id, event_type)
    }

    pub fn reset(&self, config: &FleetConfig) -> SimResult<()> {
        self.inner.lock().reset(config)
    }

    pub fn set_route_active(&self, route_id: &str, active: bool) -> SimResult<()> {
        self.inner.lock().set_route_active(route_id, active)
    }

    /// Run `f` with exclusive access between ticks.
    pub fn with<R>(&self, f: impl FnOnce(&mut FleetSim<D, H>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Tick every `interval` on a background thread until the handle is
    /// stopped.  `observer` sees every tick and is handed back by
    /// [`TickerHandle::stop`].
    pub fn spawn_ticker<O>(&self, interval: Duration, mut observer: O) -> TickerHandle<O>
    where
        O: SimObserver + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let sim = self.clone();
        let flag = Arc::clone(&stop);

        let handle = std::thread::spawn(move || {
            info!(interval_ms = interval.as_millis() as u64, "ticker started");
            while !flag.load(Ordering::Acquire) {
                let started = Instant::now();
                let summary = sim.inner.lock().tick(&mut observer);
                debug!(tick = summary.tick.0, events = summary.events, "tick done");

                let deadline = started + interval;
                while !flag.load(Ordering::Acquire) {
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    std::thread::sleep((deadline - now).min(TickerHandle::<O>::POLL));
                }
            }
            info!("ticker stopped");
            observer
        });

        TickerHandle { stop, handle }
    }
}

/// Owns a running ticker thread.
pub struct TickerHandle<O> {
    stop:   Arc<AtomicBool>,
    handle: JoinHandle<O>,
}

impl<O> TickerHandle<O> {
    /// Longest a stop request waits for the ticker to notice it.
    const POLL: Duration = Duration::from_millis(50);

    /// Stop after the tick in progress and return the observer.
    pub fn stop(self) -> SimResult<O> {
        self.stop.store(true, Ordering::Release);
        self.handle.join().map_err(|_| SimError::TickerPanicked)
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}
