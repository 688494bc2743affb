//! `fleet-mobility` — truck state and the movement step.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`state`]    | `TruckState`, `TruckStatus`, `ActiveRoute`, `PendingEvents`     |
//! | [`history`]  | `History<T>`, the bounded alert/thought log                     |
//! | [`movement`] | `MovementParams`, `advance`, low-fuel detection                 |
//! | [`error`]    | `MobilityError`, `MobilityResult<T>`                            |
//!
//! # State machine
//!
//! ```text
//!            reroute applied              next waypoint
//!   EN_ROUTE ───────────────► REROUTING ───────────────► EN_ROUTE
//!      │  │                                                  
//!      │  └─ fuel station reached ─► REFUELING ─(wait = 0)─► EN_ROUTE (fuel 100)
//!      ├──── last waypoint reached ─► ARRIVED
//!      ├──── plan exhausted ────────► IDLE
//!      └──── fuel hits 0 ───────────► STOPPED_FOR_FUEL
//! ```

pub mod error;
pub mod history;
pub mod movement;
pub mod state;


pub use error::{MobilityError, MobilityResult};
pub use history::History;
pub use movement::{MoveOutcome, MovementParams, StepReport, advance, needs_fuel_event};
pub use state::{ActiveRoute, PendingEvents, TruckState, TruckStatus};
