//! `fleet-core` — foundational types for the fleet simulation workspace.
//!
//! This crate is a dependency of every other `fleet-*` crate.  It has no
//! `fleet-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `TruckId`, `NodeId`, `RouteId`                        |
//! | [`geo`]         | `Coordinate`, epsilon comparison, distances           |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                       |
//! | [`clock`]       | `Clock` trait, `SystemClock`, `ManualClock`           |
//! | [`rng`]         | `SimRng` (seeded, deterministic)                      |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod clock;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, CoreResult};
pub use geo::{COORD_EPSILON, Coordinate};
pub use ids::{NodeId, RouteId, TruckId};
pub use rng::SimRng;
pub use time::{SimClock, SimConfig, Tick};
