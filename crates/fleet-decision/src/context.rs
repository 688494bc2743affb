//! Read-only state handed to every decision callback.

use fleet_core::{Coordinate, NodeId, Tick, TruckId};
use fleet_mobility::{ActiveRoute, TruckState, TruckStatus};
use fleet_network::{NodeCatalog, RouteCatalog};

/// The world as a decision source sees it during one dispatch.
///
/// Built by fleet-sim for each decision request.  The route catalog is
/// shared with the simulation, so activity flags are the live values.
pub struct DecisionContext<'a> {
    pub tick:   Tick,
    pub nodes:  &'a NodeCatalog,
    pub routes: &'a RouteCatalog,
}

impl<'a> DecisionContext<'a> {
    #[inline]
    pub fn new(tick: Tick, nodes: &'a NodeCatalog, routes: &'a RouteCatalog) -> Self {
        Self { tick, nodes, routes }
    }
}

/// A compact copy of a truck's state for decision sources.
///
/// Drops the coordinate list and keeps only the recent diagnostics so a
/// serialised snapshot stays small enough to put in a prompt.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TruckSnapshot {
    pub truck_id:              TruckId,
    pub current_node:          NodeId,
    pub destination_node:      NodeId,
    pub route_nodes:           Vec<NodeId>,
    #[cfg_attr(feature = "serde", serde(rename = "active_route_id"))]
    pub active_route:          ActiveRoute,
    pub location:              Coordinate,
    pub fuel_percent:          f64,
    pub capacity_used_percent: f64,
    pub status:                TruckStatus,
    pub eta_minutes:           u32,
    pub recent_alerts:         Vec<String>,
    pub recent_thoughts:       Vec<String>,
}

impl TruckSnapshot {
    pub const RECENT_ALERTS: usize = 3;
    pub const RECENT_THOUGHTS: usize = 5;

    pub fn of(truck: &TruckState) -> Self {
        Self {
            truck_id:              truck.truck_id.clone(),
            current_node:          truck.current_node.clone(),
            destination_node:      truck.destination_node.clone(),
            route_nodes:           truck.route_nodes.clone(),
            active_route:          truck.active_route.clone(),
            location:              truck.location,
            fuel_percent:          truck.fuel_percent,
            capacity_used_percent: truck.capacity_used_percent,
            status:                truck.status,
            eta_minutes:           truck.eta_minutes,
            recent_alerts:   truck.alerts.tail(Self::RECENT_ALERTS).cloned().collect(),
            recent_thoughts: truck.thoughts.tail(Self::RECENT_THOUGHTS).cloned().collect(),
        }
    }
}

impl From<&TruckState> for TruckSnapshot {
    fn from(truck: &TruckState) -> Self {
        TruckSnapshot::of(truck)
    }
}
