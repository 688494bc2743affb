//! `fleet-routing` — road distance and duration lookups for the fleet.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`provider`] | `RoutingProvider` trait, `OsrmProvider` (HTTP)              |
//! | [`guard`]    | `ProviderGuard`: call spacing + circuit breaker            |
//! | [`cache`]    | `RouteCache`: process-lifetime memo of provider answers    |
//! | [`fallback`] | Great-circle estimate used when the provider is unavailable |
//! | [`client`]   | `RoutingClient`: cache → guard → provider → fallback       |
//! | [`ordering`] | Stop ordering over a duration matrix                        |
//! | [`error`]    | `ProviderError`, `RoutingError`                             |
//!
//! # Failure model
//!
//! Provider failures never leave this crate.  `RoutingClient::get_route` and
//! `get_matrix` always return an answer; a fallback estimate is tagged with
//! [`RouteSource::Fallback`] so callers can tell it apart from a real one, but
//! it is a valid answer for the tick, not an error to retry.
//!
//! # Feature flags
//!
//! | Flag      | Effect                                          |
//! |-----------|-------------------------------------------------|
//! | `fx-hash` | FxHash maps for the caches                      |
//! | `serde`   | `Serialize`/`Deserialize` on config and results |

pub mod cache;
pub mod client;
pub mod error;
pub mod fallback;
pub mod guard;
pub mod ordering;
pub mod provider;


pub use cache::RouteCache;
pub use client::{DurationMatrix, RouteEstimate, RouteSource, RoutingClient};
pub use error::{ProviderError, RoutingError, RoutingResult};
pub use fallback::{AVERAGE_SPEED_KMH, fallback_distance_km, fallback_estimate};
pub use guard::{GuardConfig, ProviderGuard};
pub use ordering::greedy_ordering;
pub use provider::{DEFAULT_OSRM_URL, OsrmProvider, ProviderRoute, RoutingProvider};
