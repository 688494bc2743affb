//! CSV loaders for the node and route catalogs.
//!
//! # Node CSV
//!
//! ```csv
//! node_id,lat,lng,category
//! HUB_SOUTH,18.4466,73.8567,WAREHOUSE
//! FUEL_A,18.5642,73.7769,FUEL_STATION
//! ```
//!
//! # Route CSV
//!
//! One row per route.  `path` lists waypoint node ids separated by `|`.
//! `active` is optional and defaults to `true`.
//!
//! ```csv
//! route_id,origin,destination,distance_km,duration_min,fuel_cost,toll_cost,congestion_risk,active,path
//! R_SW_HWY,HUB_SOUTH,DEST_WEST,24.5,40,310,85,0.2,true,HUB_SOUTH|J_BYPASS|DEST_WEST
//! ```

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use fleet_core::{NodeId, RouteId};

use crate::{Node, NodeCatalog, NetworkError, NetworkResult, Route, RouteCatalog, RouteDefinition};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    node_id:  String,
    lat:      f64,
    lng:      f64,
    category: String,
}

#[derive(Deserialize)]
struct RouteRecord {
    route_id:        String,
    origin:          String,
    destination:     String,
    distance_km:     f64,
    duration_min:    u32,
    fuel_cost:       f64,
    toll_cost:       f64,
    congestion_risk: f64,
    #[serde(default)]
    active:          Option<bool>,
    path:            String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`NodeCatalog`] from a CSV file.
pub fn load_nodes_csv(path: &Path) -> NetworkResult<NodeCatalog> {
    let file = std::fs::File::open(path)?;
    load_nodes_reader(file)
}

/// Like [`load_nodes_csv`] but accepts any `Read` source.
pub fn load_nodes_reader<R: Read>(reader: R) -> NetworkResult<NodeCatalog> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut nodes = Vec::new();

    for result in csv_reader.deserialize::<NodeRecord>() {
        let row = result.map_err(|e| NetworkError::Parse(e.to_string()))?;
        let category = row.category.parse()?;
        nodes.push(Node::new(row.node_id, row.lat, row.lng, category));
    }

    NodeCatalog::new(nodes)
}

/// Load a [`RouteCatalog`] from a CSV file, validating against `nodes`.
pub fn load_routes_csv(path: &Path, nodes: &NodeCatalog) -> NetworkResult<RouteCatalog> {
    let file = std::fs::File::open(path)?;
    load_routes_reader(file, nodes)
}

/// Like [`load_routes_csv`] but accepts any `Read` source.
pub fn load_routes_reader<R: Read>(reader: R, nodes: &NodeCatalog) -> NetworkResult<RouteCatalog> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut defs = Vec::new();

    for result in csv_reader.deserialize::<RouteRecord>() {
        let row = result.map_err(|e| NetworkError::Parse(e.to_string()))?;
        if !(0.0..=1.0).contains(&row.congestion_risk) {
            return Err(NetworkError::Parse(format!(
                "route {}: congestion_risk {} outside [0, 1]",
                row.route_id, row.congestion_risk
            )));
        }
        let path = parse_path(&row.path);
        defs.push(RouteDefinition::new(
            Route {
                id:               RouteId::from(row.route_id),
                origin:           NodeId::from(row.origin),
                destination:      NodeId::from(row.destination),
                distance_km:      row.distance_km,
                duration_minutes: row.duration_min,
                fuel_cost:        row.fuel_cost,
                toll_cost:        row.toll_cost,
                congestion_risk:  row.congestion_risk,
                active:           row.active.unwrap_or(true),
            },
            path,
        ));
    }

    RouteCatalog::new(defs, nodes)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_path(s: &str) -> Vec<NodeId> {
    s.split('|')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(NodeId::from)
        .collect()
}
