//! Named catalog routes and their node paths.
//!
//! Several routes may share an `(origin, destination)` pair; each models a
//! different real-world path choice with its own cost profile.  Paths are
//! fixed at load time.  The `active` flag is the only mutable field and is
//! flipped by an operator while the simulation reads it every tick, so the
//! route table sits behind a `parking_lot::RwLock`.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use tracing::info;

use fleet_core::{NodeId, RouteId};

use crate::{NetworkError, NetworkResult, NodeCatalog};

// ── Route ─────────────────────────────────────────────────────────────────────

/// Cost attributes of one named route option.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    pub id:               RouteId,
    pub origin:           NodeId,
    pub destination:      NodeId,
    pub distance_km:      f64,
    pub duration_minutes: u32,
    pub fuel_cost:        f64,
    pub toll_cost:        f64,
    /// 0 (free-flowing) to 1 (routinely jammed).
    pub congestion_risk:  f64,
    pub active:           bool,
}

/// A route together with its ordered waypoint path, as loaded.
#[derive(Clone, Debug)]
pub struct RouteDefinition {
    pub route: Route,
    pub path:  Vec<NodeId>,
}

impl RouteDefinition {
    pub fn new(route: Route, path: Vec<NodeId>) -> Self {
        Self { route, path }
    }
}

// ── RouteCatalog ──────────────────────────────────────────────────────────────

/// Every named route in the world, keyed by globally unique id.
///
/// Shared between the simulation and the operator as `Arc<RouteCatalog>`.
/// Reads always see the latest flag value; there is no snapshot caching.
pub struct RouteCatalog {
    routes: RwLock<BTreeMap<RouteId, Route>>,
    paths:  HashMap<RouteId, Vec<NodeId>>,
}

impl RouteCatalog {
    /// Build a catalog, validating id uniqueness and that every endpoint and
    /// path waypoint exists in `nodes`.
    pub fn new(defs: Vec<RouteDefinition>, nodes: &NodeCatalog) -> NetworkResult<Self> {
        let mut routes = BTreeMap::new();
        let mut paths = HashMap::with_capacity(defs.len());

        for RouteDefinition { route, path } in defs {
            let endpoints = [&route.origin, &route.destination];
            if let Some(missing) = endpoints
                .into_iter()
                .chain(path.iter())
                .find(|n| !nodes.contains(n.as_str()))
            {
                return Err(NetworkError::UnknownPathNode {
                    route: route.id.clone(),
                    node:  missing.clone(),
                });
            }
            if path.is_empty() {
                return Err(NetworkError::Parse(format!("route {} has an empty path", route.id)));
            }
            if routes.contains_key(&route.id) {
                return Err(NetworkError::DuplicateRoute(route.id.clone()));
            }
            paths.insert(route.id.clone(), path);
            routes.insert(route.id.clone(), route);
        }

        Ok(Self { routes: RwLock::new(routes), paths })
    }

    pub fn empty() -> Self {
        Self { routes: RwLock::new(BTreeMap::new()), paths: HashMap::new() }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Current attributes of `id`, including the live active flag.
    pub fn get(&self, id: &str) -> Option<Route> {
        self.routes.read().get(id).cloned()
    }

    /// The fixed waypoint path for `id`.
    pub fn path(&self, id: &str) -> Option<&[NodeId]> {
        self.paths.get(id).map(Vec::as_slice)
    }

    /// `false` for unknown ids as well as inactive routes.
    pub fn is_active(&self, id: &str) -> bool {
        self.routes.read().get(id).is_some_and(|r| r.active)
    }

    /// Operator toggle.  Takes effect on the next read.
    pub fn set_active(&self, id: &str, active: bool) -> NetworkResult<()> {
        let mut routes = self.routes.write();
        let route = routes
            .get_mut(id)
            .ok_or_else(|| NetworkError::RouteNotFound(RouteId::from(id)))?;
        if route.active != active {
            route.active = active;
            info!(route = %route.id, active, "route status changed");
        }
        Ok(())
    }

    /// All routes in id order.
    pub fn all(&self) -> Vec<Route> {
        self.routes.read().values().cloned().collect()
    }

    /// All routes, active or not, between `origin` and `destination`.
    pub fn routes_between(&self, origin: &str, destination: &str) -> Vec<Route> {
        self.routes
            .read()
            .values()
            .filter(|r| r.origin == origin && r.destination == destination)
            .cloned()
            .collect()
    }

    /// Active routes ending at `destination`, other than `excluding`, best
    /// first (shortest duration, then lowest congestion risk).
    pub fn alternatives(&self, destination: &str, excluding: Option<&str>) -> Vec<Route> {
        let mut found: Vec<Route> = self
            .routes
            .read()
            .values()
            .filter(|r| r.active && r.destination == destination)
            .filter(|r| excluding.is_none_or(|ex| r.id != ex))
            .cloned()
            .collect();

        found.sort_by(|a, b| {
            a.duration_minutes
                .cmp(&b.duration_minutes)
                .then_with(|| {
                    a.congestion_risk
                        .partial_cmp(&b.congestion_risk)
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| a.id.cmp(&b.id))
        });
        found
    }
}
