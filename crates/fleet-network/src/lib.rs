//! `fleet-network` — the static world the fleet drives through.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                       |
//! |------------|----------------------------------------------------------------|
//! | [`node`]   | `Node`, `NodeCategory`, `NodeCatalog` (lookup + R-tree index)  |
//! | [`route`]  | `Route`, `RouteCatalog` (paths + operator-toggled active flags)|
//! | [`loader`] | CSV loaders for node and route catalogs                        |
//! | [`demo`]   | Built-in Pune demo world                                       |
//! | [`error`]  | `NetworkError`, `NetworkResult<T>`                             |
//!
//! Nodes and route paths are immutable after load.  The only mutable piece is
//! each route's active flag, which an operator flips while the simulation
//! reads it every tick; `RouteCatalog` is therefore shared as an
//! `Arc<RouteCatalog>` with interior locking.

pub mod demo;
pub mod error;
pub mod loader;
pub mod node;
pub mod route;


pub use error::{NetworkError, NetworkResult};
pub use loader::{load_nodes_csv, load_nodes_reader, load_routes_csv, load_routes_reader};
pub use node::{Node, NodeCatalog, NodeCategory};
pub use route::{Route, RouteCatalog, RouteDefinition};
