//! Local distance estimate for when the provider cannot answer.
//!
//! A flat-earth approximation: one degree of latitude is 111 km and one
//! degree of longitude is 111 km scaled by a fixed 0.9 (≈ cos 25°, close
//! enough for the Indian subcontinent).  Duration assumes a steady average
//! speed.

use fleet_core::Coordinate;

use crate::{RouteEstimate, RouteSource};

/// Assumed average road speed for fallback durations.
pub const AVERAGE_SPEED_KMH: f64 = 48.0;

const KM_PER_DEGREE: f64 = 111.0;
const LNG_SCALE: f64 = 0.9;

pub fn fallback_distance_km(start: Coordinate, end: Coordinate) -> f64 {
    let dlat_km = (end.lat - start.lat) * KM_PER_DEGREE;
    let dlng_km = (end.lng - start.lng) * KM_PER_DEGREE * LNG_SCALE;
    (dlat_km * dlat_km + dlng_km * dlng_km).sqrt()
}

#[inline]
pub(crate) fn fallback_duration_min(distance_km: f64) -> f64 {
    distance_km / AVERAGE_SPEED_KMH * 60.0
}

/// Straight-line estimate from `start` to `end`.  Never cached.
pub fn fallback_estimate(start: Coordinate, end: Coordinate) -> RouteEstimate {
    let distance_km = fallback_distance_km(start, end);
    RouteEstimate {
        distance_km,
        duration_min: fallback_duration_min(distance_km),
        path: vec![start, end],
        source: RouteSource::Fallback,
    }
}
