//! Fleet composition and per-run tuning.

use std::collections::BTreeMap;

use fleet_core::{RouteId, TruckId};
use fleet_mobility::{ActiveRoute, MovementParams, TruckState};
use fleet_network::{NetworkError, NodeCatalog, RouteCatalog};

use crate::SimResult;

// ── TruckSpec ─────────────────────────────────────────────────────────────────

/// How a truck starts a run: at the origin of a catalog route.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TruckSpec {
    pub truck_id:              TruckId,
    pub route_id:              RouteId,
    pub fuel_percent:          f64,
    pub capacity_used_percent: f64,
}

impl TruckSpec {
    pub fn new(truck_id: &str, route_id: &str, fuel_percent: f64, capacity_used_percent: f64) -> Self {
        Self {
            truck_id: TruckId::from(truck_id),
            route_id: RouteId::from(route_id),
            fuel_percent,
            capacity_used_percent,
        }
    }

    /// Build the initial state, with `setup` overriding fuel and load.
    ///
    /// The ETA starts at the route's own duration estimate.
    pub fn spawn(
        &self,
        setup:  Option<&TruckSetup>,
        nodes:  &NodeCatalog,
        routes: &RouteCatalog,
        params: &MovementParams,
    ) -> SimResult<TruckState> {
        let route = routes
            .get(self.route_id.as_str())
            .ok_or_else(|| NetworkError::RouteNotFound(self.route_id.clone()))?;
        let path = routes
            .path(self.route_id.as_str())
            .ok_or_else(|| NetworkError::RouteNotFound(self.route_id.clone()))?
            .to_vec();

        let (fuel, capacity) = match setup {
            Some(s) => (s.fuel_percent, s.capacity_used_percent),
            None    => (self.fuel_percent, self.capacity_used_percent),
        };

        Ok(TruckState::new(
            self.truck_id.clone(),
            path,
            ActiveRoute::Catalog(self.route_id.clone()),
            fuel,
            capacity,
            route.duration_minutes,
            params.history_limit,
            nodes,
        )?)
    }
}

/// The three-truck Pune fleet; pairs with [`fleet_network::demo::world`].
pub fn demo_fleet() -> Vec<TruckSpec> {
    vec![
        TruckSpec::new("T1", "R_SW_HWY",    50.0, 70.0),
        TruckSpec::new("T2", "R_EN_HWY",    80.0, 30.0),
        TruckSpec::new("T3", "R_NENW_MAIN", 18.0, 90.0),
    ]
}

// ── FleetConfig ───────────────────────────────────────────────────────────────

/// Operator-set starting fuel and load for one truck.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TruckSetup {
    pub fuel_percent:          f64,
    pub capacity_used_percent: f64,
}

/// Per-truck overrides applied by [`FleetSim::reset`][crate::FleetSim::reset].
///
/// Trucks not listed restart with their [`TruckSpec`] values.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FleetConfig {
    pub trucks: BTreeMap<TruckId, TruckSetup>,
}

impl FleetConfig {
    pub fn with(mut self, truck_id: &str, fuel_percent: f64, capacity_used_percent: f64) -> Self {
        self.trucks.insert(
            TruckId::from(truck_id),
            TruckSetup { fuel_percent, capacity_used_percent },
        );
        self
    }
}

// ── RandomEventParams ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RandomEventParams {
    /// Per-truck, per-tick chance of a random event.  Default: 0.005.
    pub probability: f64,
}

impl Default for RandomEventParams {
    fn default() -> Self {
        Self { probability: 0.005 }
    }
}
