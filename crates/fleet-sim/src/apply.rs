//! Turning a [`Decision`] into a change of truck state.

use std::fmt;

use tracing::{info, warn};

use fleet_core::NodeId;
use fleet_decision::{Action, Decision, Impact};
use fleet_mobility::{ActiveRoute, MovementParams, TruckState, TruckStatus};
use fleet_network::{NodeCatalog, RouteCatalog};

/// What applying a decision did.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ApplyOutcome {
    /// A new plan was installed; the truck is `REROUTING` unless it is
    /// still refuelling.
    Rerouted,
    /// `STOP_FOR_FUEL` at a fuel station; the truck is `REFUELING`.
    Refueling,
    /// Recorded in the truck's thoughts only.
    Traced,
    /// The decision referenced something unusable and was dropped.
    Ignored { reason: String },
}

impl ApplyOutcome {
    #[inline]
    pub fn is_reroute(&self) -> bool {
        matches!(self, ApplyOutcome::Rerouted)
    }

    fn ignored(reason: impl Into<String>) -> Self {
        ApplyOutcome::Ignored { reason: reason.into() }
    }
}

impl fmt::Display for ApplyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyOutcome::Rerouted           => f.write_str("rerouted"),
            ApplyOutcome::Refueling          => f.write_str("refueling"),
            ApplyOutcome::Traced             => f.write_str("traced"),
            ApplyOutcome::Ignored { reason } => write!(f, "ignored ({reason})"),
        }
    }
}

/// Apply `decision` to `truck`.
///
/// Unknown node or route references leave the truck untouched and come back
/// as [`ApplyOutcome::Ignored`].
pub fn apply_decision(
    truck:    &mut TruckState,
    decision: &Decision,
    nodes:    &NodeCatalog,
    routes:   &RouteCatalog,
    params:   &MovementParams,
) -> ApplyOutcome {
    truck.think(format!("{}: {}", decision.action, decision.reasoning));

    let outcome = match decision.action {
        Action::Reroute     => reroute(truck, &decision.impact, nodes, routes, params),
        Action::StopForFuel => stop_for_fuel(truck, nodes, params),
        Action::Continue | Action::Wait | Action::AcceptLoad | Action::RejectLoad => {
            ApplyOutcome::Traced
        }
    };

    if let ApplyOutcome::Ignored { reason } = &outcome {
        warn!(truck = %truck.truck_id, action = %decision.action, reason = %reason, "decision ignored");
    }
    outcome
}

fn reroute(
    truck:  &mut TruckState,
    impact: &Impact,
    nodes:  &NodeCatalog,
    routes: &RouteCatalog,
    params: &MovementParams,
) -> ApplyOutcome {
    let (tail, active_route, eta) = match impact {
        Impact::ExplicitPath(path) => {
            let tail = strip_current(&truck.current_node, path);
            if tail.is_empty() {
                return ApplyOutcome::ignored("empty node list");
            }
            let eta = params.minutes_per_node.saturating_mul(tail.len() as u32);
            (tail.to_vec(), ActiveRoute::AdHoc, eta)
        }
        Impact::RouteReference(id) => {
            let Some(route) = routes.get(id.as_str()) else {
                return ApplyOutcome::ignored(format!("unknown route {id}"));
            };
            if !route.active {
                return ApplyOutcome::ignored(format!("route {id} is closed"));
            }
            let Some(path) = routes.path(id.as_str()) else {
                return ApplyOutcome::ignored(format!("route {id} has no path"));
            };
            let tail = match path.iter().position(|n| *n == truck.current_node) {
                Some(at) => &path[at + 1..],
                None     => path,
            };
            if tail.is_empty() {
                return ApplyOutcome::ignored(format!("already at the end of {id}"));
            }
            (tail.to_vec(), ActiveRoute::Catalog(id.clone()), route.duration_minutes)
        }
        Impact::None => return ApplyOutcome::ignored("reroute without a path"),
    };

    let mut plan = Vec::with_capacity(tail.len() + 1);
    plan.push(truck.current_node.clone());
    plan.extend(tail);

    let summary = describe(&plan);
    if let Err(e) = truck.replace_plan(plan, active_route, eta, nodes) {
        return ApplyOutcome::ignored(e.to_string());
    }
    truck.alert(format!("Rerouting on {}: {summary}", truck.active_route));
    info!(truck = %truck.truck_id, route = %truck.active_route, eta, "rerouted");
    ApplyOutcome::Rerouted
}

fn stop_for_fuel(truck: &mut TruckState, nodes: &NodeCatalog, params: &MovementParams) -> ApplyOutcome {
    let at_station = nodes.is_fuel_station(truck.current_node.as_str())
        && nodes
            .coordinate(truck.current_node.as_str())
            .is_some_and(|c| c.same_point(truck.location));
    if !at_station || truck.status == TruckStatus::Refueling {
        return ApplyOutcome::Traced;
    }
    truck.status = TruckStatus::Refueling;
    truck.wait_time_ticks = params.refuel_wait_ticks;
    truck.alert(format!("Stopping to refuel at {}", truck.current_node));
    ApplyOutcome::Refueling
}

/// `path` without a leading `current`.
fn strip_current<'a>(current: &NodeId, path: &'a [NodeId]) -> &'a [NodeId] {
    match path.split_first() {
        Some((first, rest)) if first == current => rest,
        _ => path,
    }
}

fn describe(plan: &[NodeId]) -> String {
    plan.iter().map(NodeId::as_str).collect::<Vec<_>>().join(" → ")
}
