//! Built-in Pune demo world.
//!
//! Three hubs, three destinations, four junctions and two fuel stations, with
//! two competing routes for each hub → destination pair.

use fleet_core::{NodeId, RouteId};

use crate::{Node, NodeCatalog, NodeCategory, NetworkResult, Route, RouteCatalog, RouteDefinition};

use NodeCategory::{City, FuelStation, Junction, Warehouse};

pub fn nodes() -> Vec<Node> {
    vec![
        Node::new("HUB_SOUTH",       18.4466, 73.8567, Warehouse),
        Node::new("HUB_EAST",        18.5089, 73.9260, Warehouse),
        Node::new("HUB_NORTH_EAST",  18.5793, 73.9787, Warehouse),
        Node::new("J_CENTRAL",       18.5204, 73.8567, Junction),
        Node::new("J_BYPASS",        18.4865, 73.7890, Junction),
        Node::new("J_NORTH",         18.6100, 73.8600, Junction),
        Node::new("J_WEST",          18.5586, 73.7890, Junction),
        Node::new("DEST_WEST",       18.5913, 73.7389, City),
        Node::new("DEST_NORTH",      18.6519, 73.8645, City),
        Node::new("DEST_NORTH_WEST", 18.6298, 73.7997, City),
        Node::new("FUEL_A",          18.5642, 73.7769, FuelStation),
        Node::new("FUEL_B",          18.4881, 73.8570, FuelStation),
    ]
}

#[allow(clippy::too_many_arguments)]
fn route(
    id: &str,
    distance_km: f64,
    duration_minutes: u32,
    fuel_cost: f64,
    toll_cost: f64,
    congestion_risk: f64,
    path: &[&str],
) -> RouteDefinition {
    let path: Vec<NodeId> = path.iter().copied().map(NodeId::from).collect();
    let origin = path.first().cloned().unwrap_or_default();
    let destination = path.last().cloned().unwrap_or_default();
    RouteDefinition::new(
        Route {
            id: RouteId::from(id),
            origin,
            destination,
            distance_km,
            duration_minutes,
            fuel_cost,
            toll_cost,
            congestion_risk,
            active: true,
        },
        path,
    )
}

pub fn routes() -> Vec<RouteDefinition> {
    vec![
        route("R_SW_HWY",     22.0, 30, 290.0, 60.0, 0.30, &["HUB_SOUTH", "J_BYPASS", "DEST_WEST"]),
        route("R_SW_CITY",    26.0, 45, 330.0,  0.0, 0.60, &["HUB_SOUTH", "J_CENTRAL", "J_WEST", "DEST_WEST"]),
        route("R_EN_HWY",     32.0, 70, 410.0, 90.0, 0.40, &["HUB_EAST", "J_CENTRAL", "J_NORTH", "DEST_NORTH"]),
        route("R_EN_RING",    36.0, 65, 460.0, 40.0, 0.20, &["HUB_EAST", "HUB_NORTH_EAST", "J_NORTH", "DEST_NORTH"]),
        route("R_NENW_MAIN",  28.0, 60, 360.0, 50.0, 0.35, &["HUB_NORTH_EAST", "J_NORTH", "DEST_NORTH_WEST"]),
        route("R_NENW_SOUTH", 38.0, 80, 470.0,  0.0, 0.50, &["HUB_NORTH_EAST", "J_CENTRAL", "J_WEST", "DEST_NORTH_WEST"]),
    ]
}

/// Both demo catalogs, validated.
pub fn world() -> NetworkResult<(NodeCatalog, RouteCatalog)> {
    let nodes = NodeCatalog::new(nodes())?;
    let routes = RouteCatalog::new(routes(), &nodes)?;
    Ok((nodes, routes))
}
