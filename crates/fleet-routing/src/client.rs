//! The routing client: cache, then guarded provider, then fallback.

use std::sync::Arc;

use tracing::{debug, warn};

use fleet_core::Coordinate;

use crate::fallback::{fallback_distance_km, fallback_duration_min};
use crate::{
    GuardConfig, ProviderError, ProviderGuard, RouteCache, RoutingError, RoutingProvider,
    RoutingResult, fallback_estimate,
};

// ── Results ───────────────────────────────────────────────────────────────────

/// Where an answer came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RouteSource {
    /// Fresh from the provider.
    Provider,
    /// A previously fetched provider answer.
    Cache,
    /// Local straight-line estimate; the provider was unavailable.
    Fallback,
    /// Start and end are the same point; nothing was looked up.
    Trivial,
}

/// Distance, duration and geometry between two points.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteEstimate {
    pub distance_km:  f64,
    pub duration_min: f64,
    pub path:         Vec<Coordinate>,
    pub source:       RouteSource,
}

impl RouteEstimate {
    pub fn trivial(at: Coordinate) -> Self {
        Self {
            distance_km:  0.0,
            duration_min: 0.0,
            path:         vec![at],
            source:       RouteSource::Trivial,
        }
    }

    #[inline]
    pub fn is_fallback(&self) -> bool {
        self.source == RouteSource::Fallback
    }
}

/// N×N driving durations in minutes; `durations[i][j]` is `points[i] → points[j]`.
#[derive(Clone, Debug, PartialEq)]
pub struct DurationMatrix {
    pub durations: Vec<Vec<f64>>,
    pub source:    RouteSource,
}

// ── RoutingClient ─────────────────────────────────────────────────────────────

/// Shared routing front door.  Cheap to share as `Arc<RoutingClient>`; all
/// interior state is synchronised.
pub struct RoutingClient {
    /// `None` runs fully offline: every lookup is a fallback estimate.
    provider:     Option<Arc<dyn RoutingProvider>>,
    guard:        ProviderGuard,
    cache:        RouteCache,
    max_attempts: u32,
}

impl RoutingClient {
    pub fn new(provider: Arc<dyn RoutingProvider>, guard: ProviderGuard) -> Self {
        let max_attempts = guard.config().max_attempts.max(1);
        Self {
            provider: Some(provider),
            guard,
            cache: RouteCache::new(),
            max_attempts,
        }
    }

    /// A client with no provider.  Answers are always fallback estimates.
    pub fn offline() -> Self {
        let config = GuardConfig::default();
        let max_attempts = config.max_attempts;
        Self {
            provider: None,
            guard: ProviderGuard::new(config, Arc::new(fleet_core::SystemClock::new())),
            cache: RouteCache::new(),
            max_attempts,
        }
    }

    pub fn cache(&self) -> &RouteCache {
        &self.cache
    }

    pub fn guard(&self) -> &ProviderGuard {
        &self.guard
    }

    /// Route from `start` to `end`.  Never fails.
    ///
    /// Identical points (within `COORD_EPSILON`) short-circuit to a zero-cost
    /// answer without touching cache or provider.
    pub fn get_route(&self, start: Coordinate, end: Coordinate) -> RouteEstimate {
        if start.same_point(end) {
            return RouteEstimate::trivial(start);
        }
        if let Some(hit) = self.cache.get(start, end) {
            debug!(%start, %end, "route cache hit");
            return hit;
        }

        match self.call_provider(|p| p.route(start, end)) {
            Ok(route) => {
                let estimate = RouteEstimate {
                    distance_km:  route.distance_km,
                    duration_min: route.duration_min,
                    path:         route.path,
                    source:       RouteSource::Provider,
                };
                self.cache.insert(start, end, estimate.clone());
                estimate
            }
            Err(err) => {
                if self.provider.is_some() {
                    warn!(%start, %end, error = %err, "routing provider unavailable; using fallback estimate");
                }
                fallback_estimate(start, end)
            }
        }
    }

    /// Duration matrix over `points`.  Never fails.
    pub fn get_matrix(&self, points: &[Coordinate]) -> DurationMatrix {
        if points.len() < 2 {
            return DurationMatrix {
                durations: vec![vec![0.0; points.len()]; points.len()],
                source:    RouteSource::Trivial,
            };
        }
        if let Some(durations) = self.cache.get_table(points) {
            return DurationMatrix { durations, source: RouteSource::Cache };
        }

        match self.call_provider(|p| p.table(points)) {
            Ok(durations) => {
                self.cache.insert_table(points, durations.clone());
                DurationMatrix { durations, source: RouteSource::Provider }
            }
            Err(err) => {
                if self.provider.is_some() {
                    warn!(n = points.len(), error = %err, "duration table unavailable; using fallback matrix");
                }
                DurationMatrix {
                    durations: fallback_matrix(points),
                    source:    RouteSource::Fallback,
                }
            }
        }
    }

    /// Best visiting order for `stops` starting from `start`.
    ///
    /// `solve` receives the duration matrix over `[start] + stops` and must
    /// return a permutation of its indices beginning with 0.  The result
    /// indexes into `stops`.
    pub fn order_stops<F>(&self, start: Coordinate, stops: &[Coordinate], solve: F) -> RoutingResult<Vec<usize>>
    where
        F: FnOnce(&[Vec<f64>]) -> Vec<usize>,
    {
        let mut points = Vec::with_capacity(stops.len() + 1);
        points.push(start);
        points.extend_from_slice(stops);

        let matrix = self.get_matrix(&points);
        let order = solve(&matrix.durations);

        let mut seen = vec![false; points.len()];
        for &i in &order {
            if i >= points.len() || std::mem::replace(&mut seen[i], true) {
                return Err(RoutingError::InvalidOrdering(format!(
                    "index {i} out of range or repeated in {order:?}"
                )));
            }
        }
        if seen.iter().any(|s| !s) {
            return Err(RoutingError::InvalidOrdering(format!(
                "{order:?} does not visit all {} points",
                points.len()
            )));
        }

        Ok(order.into_iter().filter(|&i| i != 0).map(|i| i - 1).collect())
    }

    /// Up to `max_attempts` guarded calls.  Stops early once the circuit is
    /// open; a rate-limit response opens it.
    fn call_provider<T>(
        &self,
        call: impl Fn(&dyn RoutingProvider) -> Result<T, ProviderError>,
    ) -> Result<T, ProviderError> {
        let Some(provider) = self.provider.as_deref() else {
            return Err(ProviderError::Http("no routing provider configured".into()));
        };

        let mut last_err = ProviderError::CircuitOpen;
        for attempt in 1..=self.max_attempts {
            self.guard.acquire()?;
            match call(provider) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    debug!(attempt, error = %err, "provider call failed");
                    if err == ProviderError::RateLimited {
                        self.guard.record_rate_limited();
                    }
                    last_err = err;
                }
            }
        }
        Err(last_err)
    }
}

fn fallback_matrix(points: &[Coordinate]) -> Vec<Vec<f64>> {
    points
        .iter()
        .map(|&a| {
            points
                .iter()
                .map(|&b| fallback_duration_min(fallback_distance_km(a, b)))
                .collect()
        })
        .collect()
}
