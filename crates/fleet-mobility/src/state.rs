//! Per-truck state.

use std::fmt;

use fleet_core::{Coordinate, NodeId, RouteId, TruckId};
use fleet_network::NodeCatalog;

use crate::{History, MobilityError, MobilityResult};

// ── TruckStatus ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TruckStatus {
    EnRoute,
    /// A new plan was applied; becomes `EnRoute` at the next waypoint.
    Rerouting,
    /// Parked at a fuel station, counting down `wait_time_ticks`.
    Refueling,
    /// Out of fuel and not moving.
    StoppedForFuel,
    /// No plan left.
    Idle,
    Arrived,
}

impl TruckStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TruckStatus::EnRoute        => "EN_ROUTE",
            TruckStatus::Rerouting      => "REROUTING",
            TruckStatus::Refueling      => "REFUELING",
            TruckStatus::StoppedForFuel => "STOPPED_FOR_FUEL",
            TruckStatus::Idle           => "IDLE",
            TruckStatus::Arrived        => "ARRIVED",
        }
    }

    /// `true` for the two states in which the truck advances along its plan.
    #[inline]
    pub fn is_moving(self) -> bool {
        matches!(self, TruckStatus::EnRoute | TruckStatus::Rerouting)
    }
}

impl fmt::Display for TruckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── ActiveRoute ───────────────────────────────────────────────────────────────

/// Which plan the truck is following.
///
/// Exported as a single string: the catalog route id, or `"AD_HOC"`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "String", from = "String"))]
pub enum ActiveRoute {
    Catalog(RouteId),
    /// A node list supplied directly by a decision.
    AdHoc,
}

impl ActiveRoute {
    pub const AD_HOC: &'static str = "AD_HOC";

    pub fn catalog_id(&self) -> Option<&RouteId> {
        match self {
            ActiveRoute::Catalog(id) => Some(id),
            ActiveRoute::AdHoc => None,
        }
    }
}

impl fmt::Display for ActiveRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveRoute::Catalog(id) => f.write_str(id.as_str()),
            ActiveRoute::AdHoc => f.write_str(Self::AD_HOC),
        }
    }
}

impl From<ActiveRoute> for String {
    fn from(route: ActiveRoute) -> String {
        route.to_string()
    }
}

impl From<String> for ActiveRoute {
    fn from(s: String) -> Self {
        if s == ActiveRoute::AD_HOC {
            ActiveRoute::AdHoc
        } else {
            ActiveRoute::Catalog(RouteId(s))
        }
    }
}

// ── PendingEvents ─────────────────────────────────────────────────────────────

/// Event classes with an outstanding decision request for this truck.
///
/// A marker is set when the event is raised and suppresses re-raising the
/// same class until the condition is resolved.
#[derive(Clone, Default, PartialEq, Debug)]
pub struct PendingEvents {
    /// The closed route the truck is holding on.
    pub road_closed: Option<RouteId>,
    /// Set from the low-fuel event until refuelling completes.
    pub low_fuel:    bool,
}

// ── TruckState ────────────────────────────────────────────────────────────────

/// Everything the simulation knows about one truck.
///
/// `route_nodes[0]` is the node the truck last reached; `route_coordinates`
/// is aligned 1:1 with it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TruckState {
    pub truck_id: TruckId,

    // Plan
    pub destination_node:  NodeId,
    pub route_nodes:       Vec<NodeId>,
    pub route_coordinates: Vec<Coordinate>,
    #[cfg_attr(feature = "serde", serde(rename = "active_route_id"))]
    pub active_route:      ActiveRoute,

    // Physical
    pub location:              Coordinate,
    pub current_node:          NodeId,
    pub fuel_percent:          f64,
    pub capacity_used_percent: f64,

    // Control
    pub status:          TruckStatus,
    pub wait_time_ticks: u32,
    pub eta_minutes:     u32,

    // Diagnostics
    pub alerts:   History<String>,
    pub thoughts: History<String>,

    #[cfg_attr(feature = "serde", serde(skip))]
    pub pending: PendingEvents,
}

impl TruckState {
    /// A truck parked at `path[0]`, about to follow `path`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        truck_id:              TruckId,
        path:                  Vec<NodeId>,
        active_route:          ActiveRoute,
        fuel_percent:          f64,
        capacity_used_percent: f64,
        eta_minutes:           u32,
        history_limit:         usize,
        nodes:                 &NodeCatalog,
    ) -> MobilityResult<Self> {
        check_percent("fuel_percent", fuel_percent)?;
        check_percent("capacity_used_percent", capacity_used_percent)?;

        let route_coordinates = nodes.resolve_path(&path)?;
        let (Some(first), Some(last)) = (path.first().cloned(), path.last().cloned()) else {
            return Err(MobilityError::EmptyPlan(truck_id));
        };

        let status = if path.len() >= 2 { TruckStatus::EnRoute } else { TruckStatus::Idle };
        Ok(Self {
            truck_id,
            destination_node: last,
            location: route_coordinates[0],
            route_nodes: path,
            route_coordinates,
            active_route,
            current_node: first,
            fuel_percent,
            capacity_used_percent,
            status,
            wait_time_ticks: 0,
            eta_minutes,
            alerts: History::new(history_limit),
            thoughts: History::new(history_limit),
            pending: PendingEvents::default(),
        })
    }

    /// The waypoint the truck is heading to.
    pub fn next_node(&self) -> Option<&NodeId> {
        self.route_nodes.get(1)
    }

    pub fn alert(&mut self, msg: impl Into<String>) {
        self.alerts.push(msg.into());
    }

    pub fn think(&mut self, msg: impl Into<String>) {
        self.thoughts.push(msg.into());
    }

    /// Swap in a new plan whose head is the truck's `current_node`.
    ///
    /// Coordinates are resolved before anything is touched, so an unknown
    /// node leaves the truck exactly as it was.  The truck keeps its current
    /// location and heads straight for the plan's second node.
    ///
    /// An outstanding low-fuel request survives only if the new plan still
    /// passes a fuel station; otherwise the next low-fuel check raises it
    /// again.  A truck that is refuelling stays parked until the refuel
    /// completes.
    pub fn replace_plan(
        &mut self,
        route_nodes:  Vec<NodeId>,
        active_route: ActiveRoute,
        eta_minutes:  u32,
        nodes:        &NodeCatalog,
    ) -> MobilityResult<()> {
        let route_coordinates = nodes.resolve_path(&route_nodes)?;
        let Some(last) = route_nodes.last().cloned() else {
            return Err(MobilityError::EmptyPlan(self.truck_id.clone()));
        };

        let refuels_ahead = route_nodes
            .iter()
            .skip(1)
            .any(|n| nodes.is_fuel_station(n.as_str()));

        self.destination_node = last;
        self.route_nodes = route_nodes;
        self.route_coordinates = route_coordinates;
        self.active_route = active_route;
        self.eta_minutes = eta_minutes;
        self.pending.road_closed = None;
        // A parked truck finishes its refuel before following the new plan.
        if self.status != TruckStatus::Refueling {
            self.status = TruckStatus::Rerouting;
            if !refuels_ahead {
                self.pending.low_fuel = false;
            }
        }
        Ok(())
    }

    /// `len(route_coordinates) == len(route_nodes)`.
    #[inline]
    pub fn plan_is_aligned(&self) -> bool {
        self.route_coordinates.len() == self.route_nodes.len()
    }
}

fn check_percent(field: &'static str, value: f64) -> MobilityResult<()> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(MobilityError::PercentOutOfRange { field, value })
    }
}
