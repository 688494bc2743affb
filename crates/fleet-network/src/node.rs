//! World-graph nodes and the node catalog.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lng)` to node entries.  It answers
//! "which node is closest to this truck" and, filtered by category, "which
//! fuel station is closest", without scanning the whole catalog.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use fleet_core::{Coordinate, NodeId};

use crate::{NetworkError, NetworkResult};

// ── NodeCategory ──────────────────────────────────────────────────────────────

/// What kind of place a node is.  Fuel stations trigger refuelling on arrival.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum NodeCategory {
    City,
    Warehouse,
    FuelStation,
    Junction,
}

impl NodeCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeCategory::City        => "CITY",
            NodeCategory::Warehouse   => "WAREHOUSE",
            NodeCategory::FuelStation => "FUEL_STATION",
            NodeCategory::Junction    => "JUNCTION",
        }
    }
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeCategory {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "CITY"         => Ok(NodeCategory::City),
            "WAREHOUSE"    => Ok(NodeCategory::Warehouse),
            "FUEL_STATION" => Ok(NodeCategory::FuelStation),
            "JUNCTION"     => Ok(NodeCategory::Junction),
            other => Err(NetworkError::Parse(format!(
                "invalid node category {other:?}: expected CITY, WAREHOUSE, FUEL_STATION or JUNCTION"
            ))),
        }
    }
}

// ── Node ──────────────────────────────────────────────────────────────────────

/// A named point in the world graph.  Immutable after load.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub id:         NodeId,
    pub coordinate: Coordinate,
    pub category:   NodeCategory,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, lat: f64, lng: f64, category: NodeCategory) -> Self {
        Self {
            id: id.into(),
            coordinate: Coordinate::new(lat, lng),
            category,
        }
    }

    #[inline]
    pub fn is_fuel_station(&self) -> bool {
        self.category == NodeCategory::FuelStation
    }
}

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a `[lat, lng]` point plus an index into
/// `NodeCatalog::nodes`.
struct NodeEntry {
    point: [f64; 2],
    index: usize,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in degree space, consistent with the
    /// planar movement model.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlng = self.point[1] - point[1];
        dlat * dlat + dlng * dlng
    }
}

// ── NodeCatalog ───────────────────────────────────────────────────────────────

/// Read-only lookup of every node in the world, by id and by position.
pub struct NodeCatalog {
    /// Nodes in load order.
    nodes:       Vec<Node>,
    by_id:       HashMap<NodeId, usize>,
    spatial_idx: RTree<NodeEntry>,
}

impl NodeCatalog {
    /// Build a catalog, rejecting duplicate ids and out-of-range coordinates.
    pub fn new(nodes: Vec<Node>) -> NetworkResult<Self> {
        let mut by_id = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            node.coordinate
                .validated()
                .map_err(|source| NetworkError::InvalidCoordinate { id: node.id.clone(), source })?;
            if by_id.insert(node.id.clone(), i).is_some() {
                return Err(NetworkError::DuplicateNode(node.id.clone()));
            }
        }

        let entries: Vec<NodeEntry> = nodes
            .iter()
            .enumerate()
            .map(|(index, n)| NodeEntry {
                point: [n.coordinate.lat, n.coordinate.lng],
                index,
            })
            .collect();

        Ok(Self {
            nodes,
            by_id,
            spatial_idx: RTree::bulk_load(entries),
        })
    }

    pub fn empty() -> Self {
        Self {
            nodes:       Vec::new(),
            by_id:       HashMap::new(),
            spatial_idx: RTree::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.by_id.get(id).map(|&i| &self.nodes[i])
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    #[inline]
    pub fn coordinate(&self, id: &str) -> Option<Coordinate> {
        self.get(id).map(|n| n.coordinate)
    }

    pub fn is_fuel_station(&self, id: &str) -> bool {
        self.get(id).is_some_and(Node::is_fuel_station)
    }

    /// Resolve an ordered node-id path into coordinates, 1:1.
    ///
    /// Fails on the first id not present in the catalog.
    pub fn resolve_path(&self, path: &[NodeId]) -> NetworkResult<Vec<Coordinate>> {
        path.iter()
            .map(|id| {
                self.coordinate(id.as_str())
                    .ok_or_else(|| NetworkError::NodeNotFound(id.clone()))
            })
            .collect()
    }

    pub fn of_category(&self, category: NodeCategory) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.category == category)
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The node closest to `pos`.  `None` only if the catalog is empty.
    pub fn nearest(&self, pos: Coordinate) -> Option<&Node> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lng])
            .map(|e| &self.nodes[e.index])
    }

    /// The closest node of `category` to `pos`.
    pub fn nearest_of(&self, pos: Coordinate, category: NodeCategory) -> Option<&Node> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.lat, pos.lng])
            .map(|e| &self.nodes[e.index])
            .find(|n| n.category == category)
    }
}
