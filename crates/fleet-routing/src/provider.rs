//! External routing providers.
//!
//! The client talks to providers only through [`RoutingProvider`], so tests
//! substitute scripted doubles and deployments can point at any OSRM-compatible
//! server.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;

use fleet_core::Coordinate;

use crate::ProviderError;

/// A route as reported by the provider.
#[derive(Clone, Debug, PartialEq)]
pub struct ProviderRoute {
    pub distance_km:  f64,
    pub duration_min: f64,
    pub path:         Vec<Coordinate>,
}

/// A road-routing backend.
///
/// Implementations must be `Send + Sync`: one provider instance is shared by
/// every caller of the routing client.
pub trait RoutingProvider: Send + Sync {
    /// Driving route from `start` to `end`.
    fn route(&self, start: Coordinate, end: Coordinate) -> Result<ProviderRoute, ProviderError>;

    /// Full N×N driving-duration matrix over `points`, in minutes.
    fn table(&self, points: &[Coordinate]) -> Result<Vec<Vec<f64>>, ProviderError>;
}

// ── OSRM ──────────────────────────────────────────────────────────────────────

pub const DEFAULT_OSRM_URL: &str = "http://router.project-osrm.org";

/// OSRM HTTP API client (`/route/v1` and `/table/v1`, driving profile).
pub struct OsrmProvider {
    base_url: String,
    client:   Client,
}

impl OsrmProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ProviderError::Http(err.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn get(&self, url: &str) -> Result<String, ProviderError> {
        let response = self.client.get(url).send().map_err(map_reqwest_error)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }
        response.text().map_err(map_reqwest_error)
    }
}

impl RoutingProvider for OsrmProvider {
    fn route(&self, start: Coordinate, end: Coordinate) -> Result<ProviderRoute, ProviderError> {
        let url = format!(
            "{}/route/v1/driving/{}?overview=full&geometries=geojson",
            self.base_url,
            coordinate_list(&[start, end]),
        );
        decode_route(&self.get(&url)?)
    }

    fn table(&self, points: &[Coordinate]) -> Result<Vec<Vec<f64>>, ProviderError> {
        let url = format!(
            "{}/table/v1/driving/{}?annotations=duration",
            self.base_url,
            coordinate_list(points),
        );
        decode_table(&self.get(&url)?, points.len())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else if err.status() == Some(StatusCode::TOO_MANY_REQUESTS) {
        ProviderError::RateLimited
    } else {
        ProviderError::Http(err.to_string())
    }
}

/// OSRM wants `lng,lat` pairs joined by `;`.
pub(crate) fn coordinate_list(points: &[Coordinate]) -> String {
    points
        .iter()
        .map(|p| format!("{:.6},{:.6}", p.lng, p.lat))
        .collect::<Vec<_>>()
        .join(";")
}

// ── Response decoding ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct OsrmRouteResponse {
    code:   String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Deserialize)]
struct OsrmRoute {
    /// Metres.
    distance: f64,
    /// Seconds.
    duration: f64,
    geometry: OsrmGeometry,
}

#[derive(Deserialize)]
struct OsrmGeometry {
    /// GeoJSON order: `[lng, lat]`.
    coordinates: Vec<[f64; 2]>,
}

#[derive(Deserialize)]
struct OsrmTableResponse {
    code:      String,
    #[serde(default)]
    durations: Vec<Vec<Option<f64>>>,
}

pub(crate) fn decode_route(body: &str) -> Result<ProviderRoute, ProviderError> {
    let parsed: OsrmRouteResponse =
        serde_json::from_str(body).map_err(|err| ProviderError::Decode(err.to_string()))?;
    if parsed.code != "Ok" {
        return Err(ProviderError::NoRoute(parsed.code));
    }
    let route = parsed
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::NoRoute("empty route list".into()))?;

    Ok(ProviderRoute {
        distance_km:  route.distance / 1_000.0,
        duration_min: route.duration / 60.0,
        path: route
            .geometry
            .coordinates
            .into_iter()
            .map(|[lng, lat]| Coordinate::new(lat, lng))
            .collect(),
    })
}

pub(crate) fn decode_table(body: &str, n: usize) -> Result<Vec<Vec<f64>>, ProviderError> {
    let parsed: OsrmTableResponse =
        serde_json::from_str(body).map_err(|err| ProviderError::Decode(err.to_string()))?;
    if parsed.code != "Ok" {
        return Err(ProviderError::NoRoute(parsed.code));
    }
    if parsed.durations.len() != n || parsed.durations.iter().any(|row| row.len() != n) {
        return Err(ProviderError::Decode(format!("expected a {n}x{n} duration table")));
    }

    parsed
        .durations
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|secs| {
                    secs.map(|s| s / 60.0)
                        .ok_or_else(|| ProviderError::NoRoute("unreachable table entry".into()))
                })
                .collect()
        })
        .collect()
}
