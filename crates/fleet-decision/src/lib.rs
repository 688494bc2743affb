//! `fleet-decision` — decisions, the sources that produce them, and the local
//! safety rules used when a source cannot answer.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                          |
//! |---------------|-------------------------------------------------------------------|
//! | [`decision`]  | `Action`, `Impact`, `Decision`, `DecisionReply`                   |
//! | [`event`]     | `EventKind`, `TruckEvent`                                         |
//! | [`context`]   | `DecisionContext<'a>`, `TruckSnapshot`                            |
//! | [`source`]    | `DecisionSource` and `HeuristicFallback` traits                   |
//! | [`heuristic`] | `SafetyHeuristic`: fuel diversion and closed-road alternatives   |
//! | [`cooldown`]  | `CooldownSource<S>`: mutes a rate-limited source                 |
//! | [`reply`]     | `parse_agent_reply`: JSON agent replies to `DecisionReply`       |
//! | [`noop`]      | `ContinueSource`, always `CONTINUE`                              |
//! | [`error`]     | `DecisionError`, `DecisionResult<T>`                              |
//!
//! # Design notes
//!
//! fleet-sim only ever *applies* decisions.  A source is asked once per
//! event; if it fails the [`HeuristicFallback`] answers instead, and for
//! `LOW_FUEL` the fallback is consulted again whenever the applied decision
//! did not reroute the truck.

pub mod context;
pub mod cooldown;
pub mod decision;
pub mod error;
pub mod event;
pub mod heuristic;
pub mod noop;
pub mod reply;
pub mod source;


pub use context::{DecisionContext, TruckSnapshot};
pub use cooldown::CooldownSource;
pub use decision::{Action, Decision, DecisionReply, Impact};
pub use error::{DecisionError, DecisionResult};
pub use event::{EventKind, TruckEvent};
pub use heuristic::SafetyHeuristic;
pub use noop::ContinueSource;
pub use reply::parse_agent_reply;
pub use source::{DecisionSource, HeuristicFallback};
