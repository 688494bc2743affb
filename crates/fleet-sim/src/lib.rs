//! `fleet-sim` — the fleet tick loop.
//!
//! # Tick loop
//!
//! ```text
//! every tick:
//!   ① Clock:     advance the virtual clock (one simulated minute by default).
//!   ② Movement:  per truck (parallel with the `parallel` feature):
//!                   closed catalog route → hold, raise ROAD_CLOSED once
//!                   otherwise            → movement step, then LOW_FUEL check
//!   ③ Random:    one seeded draw per truck (TRAFFIC_JAM, NEW_LOAD_OFFER, …)
//!   ④ Dispatch:  in truck order, for each raised event:
//!                   DecisionSource::decide   (HeuristicFallback on error)
//!                   apply_decision
//!                   LOW_FUEL without a reroute → heuristic safety override
//! ```
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`sim`]      | `FleetSim`: state and tick loop                              |
//! | [`builder`]  | `FleetSimBuilder`                                             |
//! | [`apply`]    | `apply_decision`, `ApplyOutcome`                              |
//! | [`config`]   | `TruckSpec`, `FleetConfig`, `RandomEventParams`, `demo_fleet` |
//! | [`events`]   | `RandomEvents`, `SeededEvents`, `ScriptedEvents`              |
//! | [`record`]   | `DecisionRecord`, `FleetSnapshot`                             |
//! | [`observer`] | `SimObserver`, `TickSummary`                                  |
//! | [`runner`]   | `SharedSim`, `TickerHandle`: paced background loop           |
//! | [`error`]    | `SimError`, `SimResult<T>`                                    |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the movement phase on Rayon's thread pool.        |
//! | `serde`    | Serde derives on configs, snapshots and records.       |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fleet_decision::{ContinueSource, SafetyHeuristic};
//! use fleet_sim::{FleetSimBuilder, NoopObserver, demo_fleet};
//!
//! let (nodes, routes) = fleet_network::demo::world()?;
//! let mut sim = FleetSimBuilder::new(
//!     config, Arc::new(nodes), Arc::new(routes), ContinueSource, SafetyHeuristic::new(),
//! )
//! .trucks(demo_fleet())
//! .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod apply;
pub mod builder;
pub mod config;
pub mod error;
pub mod events;
pub mod observer;
pub mod record;
pub mod runner;
pub mod sim;

#[cfg(test)]
mod tests;

pub use apply::{ApplyOutcome, apply_decision};
pub use builder::FleetSimBuilder;
pub use config::{FleetConfig, RandomEventParams, TruckSetup, TruckSpec, demo_fleet};
pub use error::{SimError, SimResult};
pub use events::{NoRandomEvents, RandomEvents, ScriptedEvents, SeededEvents};
pub use observer::{NoopObserver, SimObserver, TickSummary};
pub use record::{DecisionOrigin, DecisionRecord, FleetSnapshot};
pub use runner::{SharedSim, TickerHandle};
pub use sim::FleetSim;
