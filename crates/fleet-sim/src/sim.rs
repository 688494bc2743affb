//! The `FleetSim` struct and its tick loop.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use fleet_core::{SimClock, SimConfig, Tick, TruckId};
use fleet_decision::{
    DecisionContext, DecisionSource, EventKind, HeuristicFallback, TruckEvent, TruckSnapshot,
};
use fleet_mobility::{History, MovementParams, TruckState, TruckStatus, advance, needs_fuel_event};
use fleet_network::{NodeCatalog, RouteCatalog};

use crate::{
    DecisionOrigin, DecisionRecord, FleetConfig, FleetSnapshot, RandomEvents, SimError,
    SimObserver, SimResult, TickSummary, TruckSpec, apply_decision,
};

// ── FleetSim ──────────────────────────────────────────────────────────────────

/// The fleet simulation.
///
/// `FleetSim<D, H>` owns every truck and drives the tick loop:
///
/// 1. **Clock**: advance the virtual clock by one tick.
/// 2. **Movement phase** (optionally parallel with the `parallel` feature),
///    per truck:
///    - a truck on a catalog route that has been closed holds position and
///      raises `ROAD_CLOSED` once;
///    - otherwise it takes one movement step, after which a `LOW_FUEL`
///      event is raised if it dropped below the threshold.
/// 3. **Random events**: one draw per truck, in truck order.
/// 4. **Dispatch** (sequential, truck order): ask `D` for a decision, fall
///    back to `H` on failure, apply it, then run the low-fuel safety
///    override.
///
/// Create via [`FleetSimBuilder`][crate::FleetSimBuilder].
pub struct FleetSim<D: DecisionSource, H: HeuristicFallback> {
    pub config: SimConfig,

    /// Virtual clock; `current_tick` is the last tick processed.
    pub clock: SimClock,

    pub params: MovementParams,

    pub nodes: Arc<NodeCatalog>,

    /// Shared with the operator; active flags are read fresh every tick.
    pub routes: Arc<RouteCatalog>,

    /// Fleet state, in `TruckSpec` order.
    pub trucks: Vec<TruckState>,

    pub source: D,

    pub fallback: H,

    pub(crate) specs:        Vec<TruckSpec>,
    pub(crate) random:       Box<dyn RandomEvents>,
    pub(crate) decision_log: HashMap<TruckId, History<DecisionRecord>>,
}

impl<D: DecisionSource, H: HeuristicFallback> FleetSim<D, H> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run until `config.total_ticks` ticks have been processed.
    ///
    /// Unbounded configurations (`total_ticks == 0`) are rejected; drive
    /// those with [`run_ticks`][Self::run_ticks] or a
    /// [`SharedSim`][crate::SharedSim] ticker.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let end = self.config.end_tick().ok_or_else(|| {
            SimError::Config("run needs total_ticks > 0".into())
        })?;
        while self.clock.current_tick < end {
            self.tick(observer);
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `total_ticks`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.tick(observer);
        }
    }

    /// Process one whole tick.
    pub fn tick<O: SimObserver>(&mut self, observer: &mut O) -> TickSummary {
        self.clock.advance();
        let now = self.clock.current_tick;
        observer.on_tick_start(now);

        let mut events = self.movement_phase();
        for (i, truck) in self.trucks.iter().enumerate() {
            if let Some(event) = self.random.draw(now, truck) {
                events.push((i, event));
            }
        }
        events.sort_by_key(|(i, _)| *i);

        let dispatched = events.len();
        for (i, event) in events {
            let record = self.dispatch(i, event);
            observer.on_event(&record);
        }

        let summary = TickSummary::count(now, &self.trucks, dispatched);
        observer.on_tick_end(&summary);
        if self.config.output_interval_ticks > 0
            && now.0 % self.config.output_interval_ticks == 0
        {
            observer.on_snapshot(&self.clock, &self.trucks);
        }
        summary
    }

    /// Current virtual time and a copy of every truck.  Never mutates.
    pub fn snapshot(&self) -> FleetSnapshot {
        FleetSnapshot {
            tick:          self.clock.current_tick,
            time:          self.clock.time_of_day(),
            sim_unix_secs: self.clock.current_unix_secs(),
            trucks:        self.trucks.clone(),
        }
    }

    /// The last tick processed.
    #[inline]
    pub fn now(&self) -> Tick {
        self.clock.current_tick
    }

    pub fn truck(&self, truck_id: &str) -> Option<&TruckState> {
        self.trucks.iter().find(|t| t.truck_id == truck_id)
    }

    /// Raise `event_type` for a truck right now, outside the tick loop.
    ///
    /// The event is dispatched exactly like one raised by the simulation.
    pub fn inject_event(&mut self, truck_id: &str, event_type: &str) -> SimResult<DecisionRecord> {
        self.inject(truck_id, TruckEvent::new(EventKind::parse(event_type), "manual"))
    }

    pub fn inject(&mut self, truck_id: &str, event: TruckEvent) -> SimResult<DecisionRecord> {
        let idx = self
            .trucks
            .iter()
            .position(|t| t.truck_id == truck_id)
            .ok_or_else(|| SimError::TruckNotFound(TruckId::from(truck_id)))?;
        Ok(self.dispatch(idx, event))
    }

    /// Rebuild every truck from its `TruckSpec`, with `config` overriding fuel and
    /// load, and restart the clock.  Nothing changes if any truck fails to
    /// build.
    pub fn reset(&mut self, config: &FleetConfig) -> SimResult<()> {
        if let Some(unknown) = config
            .trucks
            .keys()
            .find(|id| !self.specs.iter().any(|s| &s.truck_id == *id))
        {
            return Err(SimError::TruckNotFound(unknown.clone()));
        }

        let trucks = self
            .specs
            .iter()
            .map(|s| s.spawn(config.trucks.get(&s.truck_id), &self.nodes, &self.routes, &self.params))
            .collect::<SimResult<Vec<_>>>()?;

        self.trucks = trucks;
        self.clock = self.config.make_clock();
        self.decision_log.clear();
        info!(trucks = self.trucks.len(), "fleet reset");
        Ok(())
    }

    /// Operator toggle for a catalog route.
    pub fn set_route_active(&self, route_id: &str, active: bool) -> SimResult<()> {
        Ok(self.routes.set_active(route_id, active)?)
    }

    /// Recent decisions for one truck, oldest first.
    pub fn decisions(&self, truck_id: &str) -> Option<&History<DecisionRecord>> {
        self.decision_log.get(truck_id)
    }

    // ── Tick phases ───────────────────────────────────────────────────────

    /// Move every truck; returns the events raised, by truck index.
    fn movement_phase(&mut self) -> Vec<(usize, TruckEvent)> {
        let nodes   = &*self.nodes;
        let routes  = &*self.routes;
        let params  = &self.params;
        let minutes = self.clock.minutes_per_tick();

        #[cfg(not(feature = "parallel"))]
        let raised: Vec<Option<TruckEvent>> = self
            .trucks
            .iter_mut()
            .map(|truck| step_truck(truck, nodes, routes, params, minutes))
            .collect();

        #[cfg(feature = "parallel")]
        let raised: Vec<Option<TruckEvent>> = {
            use rayon::prelude::*;

            self.trucks
                .par_iter_mut()
                .map(|truck| step_truck(truck, nodes, routes, params, minutes))
                .collect()
        };

        raised
            .into_iter()
            .enumerate()
            .filter_map(|(i, e)| e.map(|e| (i, e)))
            .collect()
    }

    /// Decide and apply one event for `self.trucks[idx]`.
    fn dispatch(&mut self, idx: usize, event: TruckEvent) -> DecisionRecord {
        let now    = self.clock.current_tick;
        let nodes  = &*self.nodes;
        let routes = &*self.routes;
        let ctx    = DecisionContext::new(now, nodes, routes);
        let truck  = &mut self.trucks[idx];

        if event.kind == EventKind::LowFuel {
            truck.pending.low_fuel = true;
        }
        info!(tick = now.0, truck = %truck.truck_id, event = %event, "event raised");

        let snapshot = TruckSnapshot::of(truck);
        let (reply, origin) = match self.source.decide(&snapshot, &event, &ctx) {
            Ok(reply) => (reply, DecisionOrigin::Source),
            Err(err) => {
                warn!(truck = %truck.truck_id, error = %err, "decision source failed; using heuristic");
                let reply = self.fallback.fallback(&snapshot, &event, &err.to_string(), &ctx);
                (reply, DecisionOrigin::Fallback)
            }
        };
        for line in reply.trace {
            truck.think(line);
        }
        let outcome = apply_decision(truck, &reply.decision, nodes, routes, &self.params);

        let mut record = DecisionRecord {
            tick: now,
            truck_id: truck.truck_id.clone(),
            event,
            decision: reply.decision,
            origin,
            outcome,
            overridden: None,
        };

        if record.event.kind == EventKind::LowFuel
            && origin == DecisionOrigin::Source
            && !record.outcome.is_reroute()
            && truck.status != TruckStatus::Refueling
        {
            warn!(truck = %truck.truck_id, action = %record.decision.action, "low fuel left unresolved; applying safety override");
            let snapshot = TruckSnapshot::of(truck);
            let safety = self.fallback.fallback(&snapshot, &record.event, "low-fuel safety override", &ctx);
            for line in safety.trace {
                truck.think(line);
            }
            record.outcome = apply_decision(truck, &safety.decision, nodes, routes, &self.params);
            record.overridden = Some(std::mem::replace(&mut record.decision, safety.decision));
            record.origin = DecisionOrigin::SafetyOverride;
        }

        debug!(truck = %record.truck_id, outcome = %record.outcome, "event handled");
        let limit = self.params.history_limit;
        self.decision_log
            .entry(record.truck_id.clone())
            .or_insert_with(|| History::new(limit))
            .push(record.clone());
        record
    }
}

// ── Per-truck movement step ───────────────────────────────────────────────────

/// Closed-route hold, movement, then the low-fuel check for one truck.
///
/// Touches only `truck`, so the movement phase can run trucks in parallel.
fn step_truck(
    truck:   &mut TruckState,
    nodes:   &NodeCatalog,
    routes:  &RouteCatalog,
    params:  &MovementParams,
    minutes: u32,
) -> Option<TruckEvent> {
    // The hold ends once the route reopens or a reroute moved the truck off it.
    if let Some(closed) = &truck.pending.road_closed {
        let still_on = truck.active_route.catalog_id() == Some(closed);
        if !still_on || routes.is_active(closed.as_str()) {
            truck.pending.road_closed = None;
        }
    }

    if truck.status.is_moving() {
        if let Some(route) = truck.active_route.catalog_id() {
            if !routes.is_active(route.as_str()) {
                if truck.pending.road_closed.as_ref() == Some(route) {
                    return None;
                }
                let route = route.clone();
                truck.pending.road_closed = Some(route.clone());
                truck.status = TruckStatus::Rerouting;
                truck.alert(format!("Route {route} closed; holding for a reroute"));
                warn!(truck = %truck.truck_id, route = %route, "route closed; holding position");
                return Some(TruckEvent::new(EventKind::RoadClosed, route.as_str()));
            }
        }
    }

    advance(truck, nodes, params, minutes);

    if needs_fuel_event(truck, params) {
        truck.alert(format!("Low fuel: {:.1}%", truck.fuel_percent));
        return Some(TruckEvent::new(EventKind::LowFuel, format!("{:.1}%", truck.fuel_percent)));
    }
    None
}
