//! The per-tick movement step.
//!
//! # Model
//!
//! Trucks move in straight lines between waypoints at a fixed step per tick,
//! measured in degrees.  A truck within one step of its next waypoint snaps
//! onto it and consumes it.  Reaching a fuel station parks the truck for a
//! fixed refuelling wait; reaching the last waypoint ends the trip.
//!
//! Fuel burns once per tick of physical progress, faster when loaded:
//!
//!   consumption = base_fuel_rate × (1 + capacity_used_percent / 100)

use tracing::{debug, info, warn};

use fleet_core::NodeId;
use fleet_network::NodeCatalog;

use crate::{TruckState, TruckStatus};

// ── MovementParams ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovementParams {
    /// Distance covered per tick, in degrees.  Default: 0.005 (≈ 550 m).
    pub step_degrees: f64,
    /// Fuel percent burned per moving tick when empty.  Default: 0.2.
    pub base_fuel_rate: f64,
    /// Fuel percent below which a low-fuel event is raised.  Default: 20.
    pub low_fuel_threshold: f64,
    /// Ticks parked at a fuel station.  Default: 5.
    pub refuel_wait_ticks: u32,
    /// ETA estimate per remaining node for ad-hoc plans.  Default: 15.
    pub minutes_per_node: u32,
    /// Entries kept in each truck's alert and thought history.  Default: 20.
    pub history_limit: usize,
}

impl Default for MovementParams {
    fn default() -> Self {
        Self {
            step_degrees:       0.005,
            base_fuel_rate:     0.2,
            low_fuel_threshold: 20.0,
            refuel_wait_ticks:  5,
            minutes_per_node:   15,
            history_limit:      20,
        }
    }
}

impl MovementParams {
    #[inline]
    pub fn consumption(&self, capacity_used_percent: f64) -> f64 {
        self.base_fuel_rate * (1.0 + capacity_used_percent / 100.0)
    }
}

// ── MoveOutcome ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum MoveOutcome {
    /// Not in a moving state; nothing changed.
    Held,
    /// Still parked at a fuel station.
    Refueling { remaining: u32 },
    /// Fewer than two plan nodes; the truck went idle.
    NoPlan,
    /// Moved toward the next waypoint without reaching it.
    Moved,
    /// Reached an intermediate waypoint.
    ReachedNode(NodeId),
    /// Reached a fuel station and started refuelling.
    ReachedFuelStation(NodeId),
    /// Reached the final waypoint.
    Arrived(NodeId),
    /// Ran dry this tick.
    Stranded,
}

/// Result of one [`advance`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct StepReport {
    pub outcome:  MoveOutcome,
    /// Refuelling finished at the start of this tick.
    pub refueled: bool,
}

// ── advance ───────────────────────────────────────────────────────────────────

/// Advance `truck` by one tick.
///
/// Does not check route closures; the caller skips this step for trucks
/// holding on a closed route.
pub fn advance(
    truck: &mut TruckState,
    nodes: &NodeCatalog,
    params: &MovementParams,
    minutes_per_tick: u32,
) -> StepReport {
    let mut refueled = false;

    if truck.status == TruckStatus::Refueling {
        truck.wait_time_ticks = truck.wait_time_ticks.saturating_sub(1);
        if truck.wait_time_ticks > 0 {
            return StepReport {
                outcome: MoveOutcome::Refueling { remaining: truck.wait_time_ticks },
                refueled,
            };
        }
        truck.fuel_percent = 100.0;
        truck.status = TruckStatus::EnRoute;
        truck.pending.low_fuel = false;
        truck.alert(format!("Refuelled to 100% at {}", truck.current_node));
        info!(truck = %truck.truck_id, node = %truck.current_node, "refuelling complete");
        refueled = true;
    }

    let outcome = step(truck, nodes, params, minutes_per_tick, refueled);
    StepReport { outcome, refueled }
}

fn step(
    truck: &mut TruckState,
    nodes: &NodeCatalog,
    params: &MovementParams,
    minutes_per_tick: u32,
    refueled: bool,
) -> MoveOutcome {
    if !truck.status.is_moving() {
        return MoveOutcome::Held;
    }
    if truck.route_nodes.len() < 2 || !truck.plan_is_aligned() {
        truck.status = TruckStatus::Idle;
        return MoveOutcome::NoPlan;
    }
    if truck.fuel_percent <= 0.0 {
        return strand(truck);
    }

    let target = truck.route_coordinates[1];
    let remaining = truck.location.planar_distance(target);

    let mut outcome = if remaining <= params.step_degrees {
        truck.location = target;
        truck.route_nodes.remove(0);
        truck.route_coordinates.remove(0);
        truck.current_node = truck.route_nodes[0].clone();
        if truck.status == TruckStatus::Rerouting {
            truck.status = TruckStatus::EnRoute;
        }
        debug!(truck = %truck.truck_id, node = %truck.current_node, "reached waypoint");
        MoveOutcome::ReachedNode(truck.current_node.clone())
    } else {
        truck.location = truck.location.lerp(target, params.step_degrees / remaining);
        MoveOutcome::Moved
    };

    // The refuel-completion tick runs on a full tank.
    if !refueled {
        let burn = params.consumption(truck.capacity_used_percent);
        truck.fuel_percent = (truck.fuel_percent - burn).max(0.0);
    }
    truck.eta_minutes = truck.eta_minutes.saturating_sub(minutes_per_tick);

    if let MoveOutcome::ReachedNode(node) = &outcome {
        let node = node.clone();
        if truck.route_nodes.len() == 1 {
            truck.status = TruckStatus::Arrived;
            truck.eta_minutes = 0;
            truck.alert(format!("Arrived at {node}"));
            info!(truck = %truck.truck_id, node = %node, "arrived");
            return MoveOutcome::Arrived(node);
        }
        if nodes.is_fuel_station(node.as_str()) {
            truck.status = TruckStatus::Refueling;
            truck.wait_time_ticks = params.refuel_wait_ticks;
            truck.alert(format!("Refuelling at {node} for {} ticks", params.refuel_wait_ticks));
            info!(truck = %truck.truck_id, node = %node, "refuelling started");
            outcome = MoveOutcome::ReachedFuelStation(node);
        }
    }

    if truck.fuel_percent <= 0.0 && truck.status.is_moving() {
        return strand(truck);
    }
    outcome
}

fn strand(truck: &mut TruckState) -> MoveOutcome {
    truck.status = TruckStatus::StoppedForFuel;
    truck.alert(format!("Out of fuel near {}", truck.current_node));
    warn!(truck = %truck.truck_id, node = %truck.current_node, "truck ran out of fuel");
    MoveOutcome::Stranded
}

/// `true` when `truck` should raise a low-fuel event now.
///
/// Trucks already rerouting, refuelling, stranded, idle or arrived are
/// excluded, as is a truck with an outstanding low-fuel request.
pub fn needs_fuel_event(truck: &TruckState, params: &MovementParams) -> bool {
    truck.fuel_percent < params.low_fuel_threshold
        && truck.status == TruckStatus::EnRoute
        && !truck.pending.low_fuel
}
