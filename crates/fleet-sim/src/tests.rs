//! Integration tests for fleet-sim.

#[cfg(test)]
mod helpers {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use fleet_core::{SimConfig, Tick};
    use fleet_decision::{
        ContinueSource, Decision, DecisionContext, DecisionReply, DecisionResult, DecisionSource,
        SafetyHeuristic, TruckEvent, TruckSnapshot,
    };
    use fleet_mobility::TruckState;
    use fleet_network::demo;

    use crate::{
        DecisionRecord, FleetSim, FleetSimBuilder, NoRandomEvents, SimObserver, TickSummary,
        TruckSpec, demo_fleet,
    };

    /// Answers from a queue, then `CONTINUE` once the queue runs dry.
    #[derive(Default)]
    pub struct ScriptedSource {
        replies: Mutex<VecDeque<DecisionResult<DecisionReply>>>,
        calls:   AtomicUsize,
    }

    impl ScriptedSource {
        pub fn new(replies: Vec<DecisionResult<DecisionReply>>) -> Self {
            Self { replies: Mutex::new(replies.into()), calls: AtomicUsize::new(0) }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl DecisionSource for ScriptedSource {
        fn decide(&self, _: &TruckSnapshot, _: &TruckEvent, _: &DecisionContext<'_>) -> DecisionResult<DecisionReply> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(DecisionReply::new(Decision::proceed("scripted", 1.0), vec![])))
        }
    }

    pub fn reply(decision: Decision) -> DecisionResult<DecisionReply> {
        Ok(DecisionReply::new(decision, vec!["scripted".into()]))
    }

    pub fn config(total_ticks: u64) -> SimConfig {
        SimConfig { total_ticks, ..SimConfig::default() }
    }

    pub fn sim_with<D: DecisionSource>(trucks: Vec<TruckSpec>, source: D) -> FleetSim<D, SafetyHeuristic> {
        let (nodes, routes) = demo::world().unwrap();
        FleetSimBuilder::new(config(0), Arc::new(nodes), Arc::new(routes), source, SafetyHeuristic::new())
            .trucks(trucks)
            .random_events(NoRandomEvents)
            .build()
            .unwrap()
    }

    pub fn demo_sim() -> FleetSim<ContinueSource, SafetyHeuristic> {
        sim_with(demo_fleet(), ContinueSource)
    }

    pub fn t1_only() -> Vec<TruckSpec> {
        vec![TruckSpec::new("T1", "R_SW_HWY", 50.0, 70.0)]
    }

    pub fn t3_only() -> Vec<TruckSpec> {
        vec![TruckSpec::new("T3", "R_NENW_MAIN", 18.0, 90.0)]
    }

    pub fn truck<'a, D: DecisionSource>(sim: &'a FleetSim<D, SafetyHeuristic>, id: &str) -> &'a TruckState {
        sim.truck(id).unwrap()
    }

    #[derive(Default)]
    pub struct Counter {
        pub starts:    usize,
        pub ends:      usize,
        pub snapshots: usize,
        pub events:    Vec<DecisionRecord>,
        pub last:      Option<TickSummary>,
        pub finished:  Option<Tick>,
    }

    impl SimObserver for Counter {
        fn on_tick_start(&mut self, _tick: Tick) {
            self.starts += 1;
        }
        fn on_event(&mut self, record: &DecisionRecord) {
            self.events.push(record.clone());
        }
        fn on_tick_end(&mut self, summary: &TickSummary) {
            self.ends += 1;
            self.last = Some(summary.clone());
        }
        fn on_snapshot(&mut self, _clock: &fleet_core::SimClock, _trucks: &[TruckState]) {
            self.snapshots += 1;
        }
        fn on_sim_end(&mut self, final_tick: Tick) {
            self.finished = Some(final_tick);
        }
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use std::sync::Arc;

    use fleet_decision::{ContinueSource, SafetyHeuristic};
    use fleet_mobility::TruckStatus;
    use fleet_network::demo;

    use super::helpers::*;
    use crate::{FleetSimBuilder, SimError, TruckSpec};

    #[test]
    fn demo_fleet_starts_at_route_origins() {
        let sim = demo_sim();
        assert_eq!(sim.trucks.len(), 3);
        let t1 = truck(&sim, "T1");
        assert_eq!(t1.current_node.as_str(), "HUB_SOUTH");
        assert_eq!(t1.destination_node.as_str(), "DEST_WEST");
        assert_eq!(t1.eta_minutes, 30);
        assert_eq!(t1.status, TruckStatus::EnRoute);
        assert_eq!(truck(&sim, "T3").fuel_percent, 18.0);
        assert_eq!(sim.now().0, 0);
    }

    #[test]
    fn empty_fleet_rejected() {
        let (nodes, routes) = demo::world().unwrap();
        let result = FleetSimBuilder::new(config(0), Arc::new(nodes), Arc::new(routes), ContinueSource, SafetyHeuristic::new())
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn duplicate_truck_rejected() {
        let (nodes, routes) = demo::world().unwrap();
        let result = FleetSimBuilder::new(config(0), Arc::new(nodes), Arc::new(routes), ContinueSource, SafetyHeuristic::new())
            .trucks(vec![
                TruckSpec::new("T1", "R_SW_HWY", 50.0, 10.0),
                TruckSpec::new("T1", "R_EN_HWY", 50.0, 10.0),
            ])
            .build();
        assert!(matches!(result, Err(SimError::DuplicateTruck(_))));
    }

    #[test]
    fn unknown_route_rejected() {
        let (nodes, routes) = demo::world().unwrap();
        let result = FleetSimBuilder::new(config(0), Arc::new(nodes), Arc::new(routes), ContinueSource, SafetyHeuristic::new())
            .trucks(vec![TruckSpec::new("T9", "R_NOWHERE", 50.0, 10.0)])
            .build();
        assert!(matches!(result, Err(SimError::Network(_))));
    }

    #[test]
    fn out_of_range_fuel_rejected() {
        let (nodes, routes) = demo::world().unwrap();
        let result = FleetSimBuilder::new(config(0), Arc::new(nodes), Arc::new(routes), ContinueSource, SafetyHeuristic::new())
            .trucks(vec![TruckSpec::new("T1", "R_SW_HWY", 150.0, 10.0)])
            .build();
        assert!(matches!(result, Err(SimError::Mobility(_))));
    }
}

// ── Decision application ──────────────────────────────────────────────────────

#[cfg(test)]
mod apply {
    use fleet_core::{NodeId, RouteId, TruckId};
    use fleet_decision::{Action, Decision, Impact};
    use fleet_mobility::{ActiveRoute, MovementParams, TruckState, TruckStatus};
    use fleet_network::{Node, NodeCatalog, NodeCategory, RouteCatalog, demo};

    use crate::{ApplyOutcome, apply_decision};

    fn ids(v: &[&str]) -> Vec<NodeId> {
        v.iter().copied().map(NodeId::from).collect()
    }

    fn on_route(route: &str, path: &[&str], nodes: &NodeCatalog) -> TruckState {
        TruckState::new(
            TruckId::from("T1"),
            ids(path),
            ActiveRoute::Catalog(RouteId::from(route)),
            60.0,
            20.0,
            30,
            20,
            nodes,
        )
        .unwrap()
    }

    #[test]
    fn explicit_path_is_appended_after_current_node() {
        let nodes = NodeCatalog::new(vec![
            Node::new("X",         18.50, 73.80, NodeCategory::Junction),
            Node::new("FUEL_A",    18.56, 73.78, NodeCategory::FuelStation),
            Node::new("DEST_WEST", 18.59, 73.74, NodeCategory::City),
        ])
        .unwrap();
        let routes = RouteCatalog::empty();
        let mut t = on_route("R_TEST", &["X", "DEST_WEST"], &nodes);

        let decision = Decision::reroute_via(ids(&["FUEL_A", "DEST_WEST"]), "refuel first", 0.9);
        let outcome = apply_decision(&mut t, &decision, &nodes, &routes, &MovementParams::default());

        assert_eq!(outcome, ApplyOutcome::Rerouted);
        assert_eq!(t.route_nodes, ids(&["X", "FUEL_A", "DEST_WEST"]));
        assert_eq!(t.route_coordinates.len(), 3);
        assert_eq!(t.route_coordinates[1], nodes.coordinate("FUEL_A").unwrap());
        assert_eq!(t.active_route, ActiveRoute::AdHoc);
        assert_eq!(t.status, TruckStatus::Rerouting);
        assert_eq!(t.eta_minutes, 30);
        assert_eq!(t.destination_node.as_str(), "DEST_WEST");
        assert!(t.alerts.latest().unwrap().contains("FUEL_A"));
        assert!(t.thoughts.latest().unwrap().starts_with("REROUTE"));
    }

    #[test]
    fn unknown_node_is_ignored_without_side_effects() {
        let (nodes, routes) = demo::world().unwrap();
        let mut t = on_route("R_SW_HWY", &["HUB_SOUTH", "J_BYPASS", "DEST_WEST"], &nodes);
        let before = t.route_nodes.clone();

        let decision = Decision::reroute_via(ids(&["ATLANTIS"]), "?", 0.5);
        let outcome = apply_decision(&mut t, &decision, &nodes, &routes, &MovementParams::default());

        assert!(matches!(outcome, ApplyOutcome::Ignored { .. }));
        assert_eq!(t.route_nodes, before);
        assert_eq!(t.status, TruckStatus::EnRoute);
        assert!(t.plan_is_aligned());
    }

    #[test]
    fn unknown_or_closed_route_is_ignored() {
        let (nodes, routes) = demo::world().unwrap();
        let mut t = on_route("R_SW_HWY", &["HUB_SOUTH", "J_BYPASS", "DEST_WEST"], &nodes);
        let params = MovementParams::default();

        let unknown = Decision::reroute_onto(RouteId::from("R_NOWHERE"), "?", 0.5);
        assert!(matches!(apply_decision(&mut t, &unknown, &nodes, &routes, &params), ApplyOutcome::Ignored { .. }));

        routes.set_active("R_SW_CITY", false).unwrap();
        let closed = Decision::reroute_onto(RouteId::from("R_SW_CITY"), "?", 0.5);
        assert!(matches!(apply_decision(&mut t, &closed, &nodes, &routes, &params), ApplyOutcome::Ignored { .. }));

        let pathless = Decision::new(Action::Reroute, "?", 0.5, Impact::None);
        assert!(matches!(apply_decision(&mut t, &pathless, &nodes, &routes, &params), ApplyOutcome::Ignored { .. }));

        assert_eq!(t.active_route, ActiveRoute::Catalog(RouteId::from("R_SW_HWY")));
    }

    #[test]
    fn catalog_route_appends_suffix_after_current_node() {
        let (nodes, routes) = demo::world().unwrap();
        let mut t = on_route("R_SW_HWY", &["HUB_SOUTH", "J_BYPASS", "DEST_WEST"], &nodes);

        let decision = Decision::reroute_onto(RouteId::from("R_SW_CITY"), "avoid bypass", 0.7);
        let outcome = apply_decision(&mut t, &decision, &nodes, &routes, &MovementParams::default());

        assert_eq!(outcome, ApplyOutcome::Rerouted);
        assert_eq!(t.route_nodes, ids(&["HUB_SOUTH", "J_CENTRAL", "J_WEST", "DEST_WEST"]));
        assert_eq!(t.active_route, ActiveRoute::Catalog(RouteId::from("R_SW_CITY")));
        assert_eq!(t.eta_minutes, 45);
        assert!(t.plan_is_aligned());
    }

    #[test]
    fn catalog_route_elsewhere_is_appended_whole() {
        let (nodes, routes) = demo::world().unwrap();
        let mut t = on_route("R_SW_HWY", &["HUB_SOUTH", "J_BYPASS", "DEST_WEST"], &nodes);

        let decision = Decision::reroute_onto(RouteId::from("R_EN_HWY"), "new job", 0.7);
        apply_decision(&mut t, &decision, &nodes, &routes, &MovementParams::default());

        assert_eq!(
            t.route_nodes,
            ids(&["HUB_SOUTH", "HUB_EAST", "J_CENTRAL", "J_NORTH", "DEST_NORTH"])
        );
        assert_eq!(t.eta_minutes, 70);
    }

    #[test]
    fn stop_for_fuel_only_at_a_station() {
        let (nodes, routes) = demo::world().unwrap();
        let params = MovementParams::default();
        let stop = Decision::new(Action::StopForFuel, "top up", 0.8, Impact::None);

        let mut away = on_route("R_SW_HWY", &["HUB_SOUTH", "J_BYPASS", "DEST_WEST"], &nodes);
        assert_eq!(apply_decision(&mut away, &stop, &nodes, &routes, &params), ApplyOutcome::Traced);
        assert_eq!(away.status, TruckStatus::EnRoute);

        let mut at = on_route("R_TEST", &["FUEL_A", "DEST_WEST"], &nodes);
        assert_eq!(apply_decision(&mut at, &stop, &nodes, &routes, &params), ApplyOutcome::Refueling);
        assert_eq!(at.status, TruckStatus::Refueling);
        assert_eq!(at.wait_time_ticks, 5);
    }

    #[test]
    fn passive_actions_only_trace() {
        let (nodes, routes) = demo::world().unwrap();
        let params = MovementParams::default();
        let mut t = on_route("R_SW_HWY", &["HUB_SOUTH", "J_BYPASS", "DEST_WEST"], &nodes);
        let before = t.clone();

        for action in [Action::Continue, Action::Wait, Action::AcceptLoad, Action::RejectLoad] {
            let d = Decision::new(action, "noted", 0.6, Impact::None);
            assert_eq!(apply_decision(&mut t, &d, &nodes, &routes, &params), ApplyOutcome::Traced);
        }
        assert_eq!(t.route_nodes, before.route_nodes);
        assert_eq!(t.status, before.status);
        assert_eq!(t.thoughts.len(), 4);
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tick_loop {
    use std::sync::Arc;

    use fleet_core::NodeId;
    use fleet_decision::{ContinueSource, Decision, DecisionError, EventKind, SafetyHeuristic};
    use fleet_mobility::{ActiveRoute, TruckStatus};
    use fleet_network::demo;

    use super::helpers::*;
    use crate::{
        DecisionOrigin, FleetSimBuilder, NoopObserver, RandomEventParams, ScriptedEvents,
        demo_fleet,
    };

    #[test]
    fn plans_stay_aligned_and_fuel_only_drops_or_refills() {
        let (nodes, routes) = demo::world().unwrap();
        let mut sim = FleetSimBuilder::new(config(0), Arc::new(nodes), Arc::new(routes), ContinueSource, SafetyHeuristic::new())
            .trucks(demo_fleet())
            .random_params(RandomEventParams { probability: 0.05 })
            .build()
            .unwrap();

        for _ in 0..300 {
            let before: Vec<f64> = sim.trucks.iter().map(|t| t.fuel_percent).collect();
            sim.tick(&mut NoopObserver);
            for (t, fuel) in sim.trucks.iter().zip(before) {
                assert!(t.plan_is_aligned(), "{} misaligned", t.truck_id);
                assert!(
                    t.fuel_percent <= fuel + 1e-9 || t.fuel_percent == 100.0,
                    "{} fuel rose from {fuel} to {}",
                    t.truck_id,
                    t.fuel_percent
                );
                assert!((0.0..=100.0).contains(&t.fuel_percent));
                if t.status == TruckStatus::Arrived {
                    assert!(t.route_nodes.len() <= 1);
                }
            }
        }
    }

    #[test]
    fn closed_route_holds_position_until_reopened() {
        let mut sim = sim_with(t1_only(), ContinueSource);
        sim.tick(&mut NoopObserver);
        sim.set_route_active("R_SW_HWY", false).unwrap();
        let held_at = truck(&sim, "T1").location;

        let mut obs = Counter::default();
        sim.tick(&mut obs);
        let t1 = truck(&sim, "T1");
        assert_eq!(t1.location, held_at);
        assert_eq!(t1.status, TruckStatus::Rerouting);
        assert!(t1.alerts.latest().unwrap().contains("R_SW_HWY"));
        assert_eq!(obs.events.len(), 1);
        assert_eq!(obs.events[0].event.kind, EventKind::RoadClosed);

        // Still closed: no second event, still no movement.
        sim.tick(&mut obs);
        assert_eq!(obs.events.len(), 1);
        assert_eq!(truck(&sim, "T1").location, held_at);

        sim.set_route_active("R_SW_HWY", true).unwrap();
        sim.tick(&mut obs);
        let t1 = truck(&sim, "T1");
        assert_ne!(t1.location, held_at);
        assert!(t1.pending.road_closed.is_none());
    }

    #[test]
    fn closed_route_with_failing_source_takes_heuristic_alternative() {
        let source = ScriptedSource::new(vec![Err(DecisionError::Unavailable("offline".into()))]);
        let mut sim = sim_with(t1_only(), source);
        sim.set_route_active("R_SW_HWY", false).unwrap();
        let start = truck(&sim, "T1").location;

        let mut obs = Counter::default();
        sim.tick(&mut obs);

        let record = &obs.events[0];
        assert_eq!(record.origin, DecisionOrigin::Fallback);
        assert!(record.outcome.is_reroute());
        let t1 = truck(&sim, "T1");
        assert_eq!(t1.location, start);
        assert_eq!(t1.active_route.to_string(), "R_SW_CITY");
        assert_eq!(t1.route_nodes[0].as_str(), "HUB_SOUTH");
        assert_eq!(t1.route_nodes[1].as_str(), "J_CENTRAL");
        assert!(t1.pending.road_closed.is_none());

        // On the new route the truck moves again.
        sim.tick(&mut obs);
        assert_ne!(truck(&sim, "T1").location, start);
        assert_eq!(sim.source.calls(), 1);
    }

    #[test]
    fn low_fuel_continue_is_overridden_toward_a_station() {
        let mut sim = sim_with(t3_only(), ContinueSource);
        let mut obs = Counter::default();
        sim.tick(&mut obs);

        assert_eq!(obs.events.len(), 1);
        let record = &obs.events[0];
        assert_eq!(record.event.kind, EventKind::LowFuel);
        assert_eq!(record.origin, DecisionOrigin::SafetyOverride);
        assert_eq!(record.overridden.as_ref().map(|d| d.is_reroute()), Some(false));
        assert!(record.decision.is_reroute());

        let t3 = truck(&sim, "T3");
        assert_eq!(t3.status, TruckStatus::Rerouting);
        assert_eq!(t3.active_route, ActiveRoute::AdHoc);
        assert!(sim.nodes.is_fuel_station(t3.route_nodes[1].as_str()));
        assert_eq!(t3.destination_node.as_str(), "DEST_NORTH_WEST");
        assert!(t3.pending.low_fuel);

        // The request is outstanding; no second LOW_FUEL.
        sim.tick(&mut obs);
        assert_eq!(obs.events.len(), 1);
    }

    #[test]
    fn low_fuel_reroute_from_source_is_kept() {
        let detour = Decision::reroute_via(
            vec![NodeId::from("FUEL_A"), NodeId::from("DEST_NORTH_WEST")],
            "FUEL_A has the shortest queue",
            0.9,
        );
        let mut sim = sim_with(t3_only(), ScriptedSource::new(vec![reply(detour)]));
        let mut obs = Counter::default();
        sim.tick(&mut obs);

        let record = &obs.events[0];
        assert_eq!(record.origin, DecisionOrigin::Source);
        assert!(record.overridden.is_none());
        assert_eq!(truck(&sim, "T3").route_nodes[1].as_str(), "FUEL_A");
        assert!(truck(&sim, "T3").thoughts.iter().any(|t| t == "scripted"));
    }

    #[test]
    fn low_fuel_with_failing_source_uses_heuristic_once() {
        let source = ScriptedSource::new(vec![Err(DecisionError::Malformed("garbage".into()))]);
        let mut sim = sim_with(t3_only(), source);
        let mut obs = Counter::default();
        sim.tick(&mut obs);

        let record = &obs.events[0];
        assert_eq!(record.origin, DecisionOrigin::Fallback);
        assert!(record.outcome.is_reroute());
        assert!(sim.nodes.is_fuel_station(truck(&sim, "T3").route_nodes[1].as_str()));
    }

    #[test]
    fn refuelling_waits_then_restarts_full() {
        let detour = Decision::reroute_via(
            vec![NodeId::from("FUEL_B"), NodeId::from("DEST_WEST")],
            "refuel",
            0.9,
        );
        let mut sim = sim_with(t1_only(), ScriptedSource::new(vec![reply(detour)]));
        sim.inject_event("T1", "TRAFFIC_JAM").unwrap();

        let mut ticks = 0;
        while truck(&sim, "T1").status != TruckStatus::Refueling {
            sim.tick(&mut NoopObserver);
            ticks += 1;
            assert!(ticks < 30, "never reached FUEL_B");
        }
        let t1 = truck(&sim, "T1");
        assert_eq!(t1.current_node.as_str(), "FUEL_B");
        assert_eq!(t1.wait_time_ticks, 5);
        let parked_at = t1.location;
        let parked_fuel = t1.fuel_percent;

        for _ in 0..4 {
            sim.tick(&mut NoopObserver);
            let t1 = truck(&sim, "T1");
            assert_eq!(t1.status, TruckStatus::Refueling);
            assert_eq!(t1.location, parked_at);
            assert_eq!(t1.fuel_percent, parked_fuel);
        }

        sim.tick(&mut NoopObserver);
        let t1 = truck(&sim, "T1");
        assert_eq!(t1.status, TruckStatus::EnRoute);
        assert_eq!(t1.fuel_percent, 100.0);
        assert_ne!(t1.location, parked_at);
    }

    #[test]
    fn low_fuel_while_refuelling_keeps_the_refuel() {
        let detour = Decision::reroute_via(
            vec![NodeId::from("FUEL_B"), NodeId::from("DEST_WEST")],
            "refuel",
            0.9,
        );
        let onward = Decision::reroute_via(
            vec![NodeId::from("J_CENTRAL"), NodeId::from("J_WEST"), NodeId::from("DEST_WEST")],
            "city route after the stop",
            0.8,
        );
        let source = ScriptedSource::new(vec![
            reply(detour),
            Err(DecisionError::Unavailable("offline".into())),
            reply(Decision::proceed("keep going", 0.5)),
            reply(onward),
        ]);
        let mut sim = sim_with(t1_only(), source);
        sim.inject_event("T1", "TRAFFIC_JAM").unwrap();

        let mut ticks = 0;
        while truck(&sim, "T1").status != TruckStatus::Refueling {
            sim.tick(&mut NoopObserver);
            ticks += 1;
            assert!(ticks < 30, "never reached FUEL_B");
        }

        let record = sim.inject_event("T1", "LOW_FUEL").unwrap();
        assert_eq!(record.origin, DecisionOrigin::Fallback);
        assert!(!record.outcome.is_reroute());

        let record = sim.inject_event("T1", "LOW_FUEL").unwrap();
        assert_eq!(record.origin, DecisionOrigin::Source);
        assert!(record.overridden.is_none());

        let record = sim.inject_event("T1", "LOW_FUEL").unwrap();
        assert!(record.outcome.is_reroute());

        let t1 = truck(&sim, "T1");
        assert_eq!(t1.status, TruckStatus::Refueling);
        assert_eq!(t1.current_node.as_str(), "FUEL_B");
        assert_eq!(t1.wait_time_ticks, 5);
        assert!(t1.pending.low_fuel);

        sim.run_ticks(5, &mut NoopObserver);
        let t1 = truck(&sim, "T1");
        assert_eq!(t1.status, TruckStatus::EnRoute);
        assert_eq!(t1.fuel_percent, 100.0);
        assert!(!t1.pending.low_fuel);
        assert_eq!(t1.route_nodes[1].as_str(), "J_CENTRAL");
    }

    #[test]
    fn superseding_reroute_through_a_station_keeps_one_low_fuel_request() {
        let via_station = Decision::reroute_via(
            vec![NodeId::from("J_CENTRAL"), NodeId::from("FUEL_B"), NodeId::from("DEST_NORTH_WEST")],
            "south side, refuel on the way",
            0.7,
        );
        let source = ScriptedSource::new(vec![reply(Decision::proceed("push on", 0.4)), reply(via_station)]);
        let mut sim = sim_with(t3_only(), source);
        let mut counter = Counter::default();

        sim.tick(&mut counter);
        assert_eq!(counter.events.len(), 1);
        assert_eq!(counter.events[0].origin, DecisionOrigin::SafetyOverride);
        assert!(truck(&sim, "T3").pending.low_fuel);

        let record = sim.inject_event("T3", "TRAFFIC_JAM").unwrap();
        assert!(record.outcome.is_reroute());
        assert!(truck(&sim, "T3").pending.low_fuel);

        let mut ticks = 0;
        while truck(&sim, "T3").status != TruckStatus::Refueling {
            sim.tick(&mut counter);
            ticks += 1;
            assert!(ticks < 60, "never reached FUEL_B");
        }
        let low_fuel = counter.events.iter().filter(|r| r.event.kind == EventKind::LowFuel).count();
        assert_eq!(low_fuel, 1);
        assert_eq!(sim.source.calls(), 2);
    }

    #[test]
    fn low_fuel_request_is_raised_again_after_a_reroute_drops_the_station() {
        let source = ScriptedSource::new(vec![
            reply(Decision::proceed("push on", 0.4)),
            reply(Decision::reroute_onto("R_NENW_SOUTH".into(), "avoid the jam", 0.7)),
        ]);
        let mut sim = sim_with(t3_only(), source);
        let mut counter = Counter::default();

        sim.tick(&mut counter);
        let t3 = truck(&sim, "T3");
        assert_eq!(t3.route_nodes.iter().map(NodeId::as_str).collect::<Vec<_>>(), ["HUB_NORTH_EAST", "FUEL_B", "DEST_NORTH_WEST"]);
        assert!(t3.pending.low_fuel);

        let record = sim.inject_event("T3", "TRAFFIC_JAM").unwrap();
        assert!(record.outcome.is_reroute());
        let t3 = truck(&sim, "T3");
        assert_eq!(t3.active_route, ActiveRoute::Catalog("R_NENW_SOUTH".into()));
        assert!(!t3.pending.low_fuel);

        let mut ticks = 0;
        while truck(&sim, "T3").status != TruckStatus::Arrived {
            sim.tick(&mut counter);
            ticks += 1;
            assert!(ticks < 120, "never arrived");
            assert_ne!(truck(&sim, "T3").status, TruckStatus::StoppedForFuel, "ran dry");
        }

        let low_fuel: Vec<_> = counter.events.iter().filter(|r| r.event.kind == EventKind::LowFuel).collect();
        assert_eq!(low_fuel.len(), 2);
        assert!(low_fuel.iter().all(|r| r.outcome.is_reroute()));
        let t3 = truck(&sim, "T3");
        assert_eq!(t3.current_node.as_str(), "DEST_NORTH_WEST");
        assert!(t3.fuel_percent > 0.0);
    }

    #[test]
    fn arrival_freezes_the_truck() {
        let mut sim = sim_with(t1_only(), ContinueSource);
        let mut ticks = 0;
        while truck(&sim, "T1").status != TruckStatus::Arrived {
            sim.tick(&mut NoopObserver);
            ticks += 1;
            assert!(ticks < 200, "never arrived");
        }
        let t1 = truck(&sim, "T1").clone();
        assert_eq!(t1.eta_minutes, 0);
        assert_eq!(t1.route_nodes.len(), 1);
        assert_eq!(t1.current_node.as_str(), "DEST_WEST");

        sim.run_ticks(3, &mut NoopObserver);
        assert_eq!(truck(&sim, "T1").location, t1.location);
        assert_eq!(truck(&sim, "T1").fuel_percent, t1.fuel_percent);
    }

    #[test]
    fn scripted_random_events_are_dispatched() {
        let (nodes, routes) = demo::world().unwrap();
        let mut sim = FleetSimBuilder::new(config(0), Arc::new(nodes), Arc::new(routes), ContinueSource, SafetyHeuristic::new())
            .trucks(demo_fleet())
            .random_events(ScriptedEvents::new().at(fleet_core::Tick(2), "T2", EventKind::TrafficJam))
            .build()
            .unwrap();

        sim.run_ticks(1, &mut NoopObserver);
        assert!(sim.decisions("T2").is_none());
        sim.run_ticks(1, &mut NoopObserver);
        let log = sim.decisions("T2").unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.latest().unwrap().event.kind, EventKind::TrafficJam);
    }

    #[test]
    fn same_seed_same_run() {
        let build = || {
            let (nodes, routes) = demo::world().unwrap();
            FleetSimBuilder::new(config(0), Arc::new(nodes), Arc::new(routes), ContinueSource, SafetyHeuristic::new())
                .trucks(demo_fleet())
                .random_params(RandomEventParams { probability: 0.2 })
                .build()
                .unwrap()
        };
        let mut a = build();
        let mut b = build();
        a.run_ticks(60, &mut NoopObserver);
        b.run_ticks(60, &mut NoopObserver);
        assert_eq!(a.snapshot(), b.snapshot());
    }
}

// ── Operator surface ──────────────────────────────────────────────────────────

#[cfg(test)]
mod operator {
    use std::sync::Arc;
    use std::time::Duration;

    use fleet_decision::{ContinueSource, EventKind, SafetyHeuristic};
    use fleet_network::demo;

    use super::helpers::*;
    use crate::{
        FleetConfig, FleetSimBuilder, NoRandomEvents, SharedSim, SimError, demo_fleet,
    };

    #[test]
    fn inject_unknown_truck_is_not_found() {
        let mut sim = demo_sim();
        assert!(matches!(sim.inject_event("T99", "LOW_FUEL"), Err(SimError::TruckNotFound(_))));
    }

    #[test]
    fn inject_dispatches_like_the_loop() {
        let mut sim = demo_sim();
        let record = sim.inject_event("T2", "new_load_offer").unwrap();
        assert_eq!(record.event.kind, EventKind::NewLoadOffer);
        assert_eq!(record.tick.0, 0);
        assert_eq!(sim.decisions("T2").unwrap().len(), 1);
    }

    #[test]
    fn snapshot_does_not_mutate() {
        let mut sim = demo_sim();
        sim.run_ticks(5, &mut crate::NoopObserver);
        let a = sim.snapshot();
        let b = sim.snapshot();
        assert_eq!(a, b);
        assert_eq!(a.tick.0, 5);
        assert_eq!(a.time, "08:05");
        assert_eq!(a.trucks.len(), 3);
    }

    #[test]
    fn reset_applies_overrides_and_restarts_clock() {
        let mut sim = demo_sim();
        sim.run_ticks(10, &mut crate::NoopObserver);

        sim.reset(&FleetConfig::default().with("T1", 90.0, 10.0)).unwrap();
        assert_eq!(sim.now().0, 0);
        let t1 = truck(&sim, "T1");
        assert_eq!(t1.fuel_percent, 90.0);
        assert_eq!(t1.capacity_used_percent, 10.0);
        assert_eq!(t1.current_node.as_str(), "HUB_SOUTH");
        assert_eq!(truck(&sim, "T2").fuel_percent, 80.0);
    }

    #[test]
    fn reset_with_unknown_truck_changes_nothing() {
        let mut sim = demo_sim();
        sim.run_ticks(3, &mut crate::NoopObserver);
        let before = sim.snapshot();
        let err = sim.reset(&FleetConfig::default().with("T42", 50.0, 50.0));
        assert!(matches!(err, Err(SimError::TruckNotFound(_))));
        assert_eq!(sim.snapshot(), before);
    }

    #[test]
    fn bounded_run_calls_every_hook() {
        let (nodes, routes) = demo::world().unwrap();
        let mut sim = FleetSimBuilder::new(config(10), Arc::new(nodes), Arc::new(routes), ContinueSource, SafetyHeuristic::new())
            .trucks(demo_fleet())
            .random_events(NoRandomEvents)
            .build()
            .unwrap();
        let mut obs = Counter::default();
        sim.run(&mut obs).unwrap();
        assert_eq!(obs.starts, 10);
        assert_eq!(obs.ends, 10);
        assert_eq!(obs.snapshots, 10);
        assert_eq!(obs.finished.map(|t| t.0), Some(10));
        assert_eq!(obs.last.unwrap().tick.0, 10);
    }

    #[test]
    fn unbounded_run_is_rejected() {
        let mut sim = demo_sim();
        assert!(matches!(sim.run(&mut crate::NoopObserver), Err(SimError::Config(_))));
    }

    #[test]
    fn ticker_advances_and_stops() {
        let shared = SharedSim::new(demo_sim());
        let handle = shared.spawn_ticker(Duration::from_millis(1), Counter::default());
        std::thread::sleep(Duration::from_millis(100));
        assert!(handle.is_running());
        let obs = handle.stop().unwrap();

        assert!(obs.ends > 0);
        let snap = shared.snapshot();
        assert_eq!(snap.tick.0 as usize, obs.ends);

        // The handle still works after the ticker is gone.
        shared.tick();
        assert_eq!(shared.snapshot().tick.0 as usize, obs.ends + 1);
        assert!(shared.inject_event("T1", "TRAFFIC_JAM").is_ok());
    }
}
