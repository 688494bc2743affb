//! Deterministic local safety rules.
//!
//! | Event                                   | Answer                                              |
//! |-----------------------------------------|-----------------------------------------------------|
//! | `LOW_FUEL`                              | `REROUTE` via the nearest fuel station, then on to the destination; `CONTINUE` while already refuelling |
//! | `ROAD_CLOSED`, `TRAFFIC_JAM`            | `REROUTE` onto the best open alternative route, preferring ones through the truck's node |
//! | anything else                           | `CONTINUE`                                          |
//!
//! Every heuristic decision carries confidence 0.

use std::sync::Arc;

use tracing::{debug, warn};

use fleet_core::{Coordinate, NodeId};
use fleet_mobility::TruckStatus;
use fleet_network::{NodeCatalog, NodeCategory};
use fleet_routing::RoutingClient;

use crate::{
    Decision, DecisionContext, DecisionReply, EventKind, HeuristicFallback, TruckEvent,
    TruckSnapshot,
};

/// The default [`HeuristicFallback`].
///
/// With a routing client the nearest fuel station is chosen by driving
/// duration (one matrix lookup, which itself degrades to a straight-line
/// estimate); without one, by planar distance through the node R-tree.
#[derive(Default)]
pub struct SafetyHeuristic {
    routing: Option<Arc<RoutingClient>>,
}

impl SafetyHeuristic {
    /// Planar-distance station choice; never touches the network.
    pub fn new() -> Self {
        Self { routing: None }
    }

    pub fn with_routing(routing: Arc<RoutingClient>) -> Self {
        Self { routing: Some(routing) }
    }

    /// The fuel station `from` should head to, with the road duration in
    /// minutes when it was measured.
    pub fn nearest_fuel_station(
        &self,
        from:  Coordinate,
        nodes: &NodeCatalog,
    ) -> Option<(NodeId, Option<f64>)> {
        let Some(routing) = &self.routing else {
            return nodes
                .nearest_of(from, NodeCategory::FuelStation)
                .map(|n| (n.id.clone(), None));
        };

        let stations: Vec<_> = nodes.of_category(NodeCategory::FuelStation).collect();
        if stations.is_empty() {
            return None;
        }
        let mut points = Vec::with_capacity(stations.len() + 1);
        points.push(from);
        points.extend(stations.iter().map(|n| n.coordinate));

        let matrix = routing.get_matrix(&points);
        let row = matrix.durations.first()?;
        stations
            .iter()
            .enumerate()
            .filter_map(|(i, n)| row.get(i + 1).map(|&d| (n, d)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(n, d)| (n.id.clone(), Some(d)))
    }

    fn low_fuel(&self, truck: &TruckSnapshot, ctx: &DecisionContext<'_>, trace: &mut Vec<String>) -> Decision {
        if truck.status == TruckStatus::Refueling {
            trace.push(format!("Already refuelling at {}", truck.current_node));
            return Decision::proceed("Low fuel is being handled; finishing the refuel", 0.0);
        }
        let Some((station, minutes)) = self.nearest_fuel_station(truck.location, ctx.nodes) else {
            warn!(truck = %truck.truck_id, "no fuel station in the network");
            trace.push("No fuel station is known; continuing".into());
            return Decision::proceed("Low fuel but no station is reachable", 0.0);
        };

        match minutes {
            Some(m) => trace.push(format!("Nearest fuel station is {station} ({m:.1} min away)")),
            None    => trace.push(format!("Nearest fuel station is {station}")),
        }

        let mut path = vec![station.clone()];
        if station != truck.destination_node {
            path.push(truck.destination_node.clone());
        }
        trace.push(format!("Diverting via {station} to {}", truck.destination_node));
        debug!(truck = %truck.truck_id, station = %station, "heuristic fuel diversion");

        Decision::reroute_via(
            path,
            format!(
                "Fuel at {:.1}%: refuelling at {station} before continuing to {}",
                truck.fuel_percent, truck.destination_node
            ),
            0.0,
        )
    }

    fn avoid_route(&self, truck: &TruckSnapshot, ctx: &DecisionContext<'_>, trace: &mut Vec<String>) -> Decision {
        let current = truck.active_route.catalog_id().map(|r| r.as_str());
        let mut options = ctx.routes.alternatives(truck.destination_node.as_str(), current);
        // Routes that pass the truck's node go first; the rest would drive it
        // back to their origin.  Stable, so duration order holds within each group.
        options.sort_by_key(|r| {
            !ctx.routes
                .path(r.id.as_str())
                .is_some_and(|p| p.contains(&truck.current_node))
        });

        let Some(best) = options.first() else {
            trace.push(format!("No open alternative route to {}", truck.destination_node));
            return Decision::proceed("No alternative available; holding current plan", 0.0);
        };

        trace.push(format!(
            "{} open alternative(s); choosing {} ({} min, congestion {:.2})",
            options.len(),
            best.id,
            best.duration_minutes,
            best.congestion_risk
        ));
        Decision::reroute_onto(
            best.id.clone(),
            format!("Switching to {} to reach {}", best.id, truck.destination_node),
            0.0,
        )
    }
}

impl HeuristicFallback for SafetyHeuristic {
    fn fallback(
        &self,
        truck:  &TruckSnapshot,
        event:  &TruckEvent,
        reason: &str,
        ctx:    &DecisionContext<'_>,
    ) -> DecisionReply {
        let mut trace = vec![format!("Heuristic fallback ({reason})")];
        let decision = match event.kind {
            EventKind::LowFuel                             => self.low_fuel(truck, ctx, &mut trace),
            EventKind::RoadClosed | EventKind::TrafficJam  => self.avoid_route(truck, ctx, &mut trace),
            _ => Decision::proceed(format!("No local rule for {}", event.kind), 0.0),
        };
        DecisionReply::new(decision, trace)
    }
}
