//! Geographic coordinate type and spatial utilities.
//!
//! `Coordinate` uses `f64` latitude/longitude in degrees.  Movement in the
//! simulation is planar (degrees are treated as a flat grid), which is exact
//! enough for a metro-scale road network and keeps interpolation trivial.

use crate::{CoreError, CoreResult};

/// Tolerance, in degrees, under which two coordinates are the same point.
///
/// ≈ 11 m of latitude.  All "same coordinate" checks in the workspace go
/// through [`Coordinate::approx_eq`]; never compare `f64`s with `==`.
pub const COORD_EPSILON: f64 = 1e-4;

/// Scale applied before rounding coordinates into integer cache keys
/// (5 decimal places).
const KEY_SCALE: f64 = 1e5;

/// A WGS-84 coordinate in degrees.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    #[inline]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `true` when both components are finite and inside the valid range.
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// `self`, or `InvalidCoordinate` if it fails [`is_valid`](Self::is_valid).
    pub fn validated(self) -> CoreResult<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(CoreError::InvalidCoordinate { lat: self.lat, lng: self.lng })
        }
    }

    /// `true` if `other` lies within `eps` degrees on both axes.
    #[inline]
    pub fn approx_eq(self, other: Coordinate, eps: f64) -> bool {
        (self.lat - other.lat).abs() <= eps && (self.lng - other.lng).abs() <= eps
    }

    /// [`approx_eq`](Self::approx_eq) with the workspace default [`COORD_EPSILON`].
    #[inline]
    pub fn same_point(self, other: Coordinate) -> bool {
        self.approx_eq(other, COORD_EPSILON)
    }

    /// Euclidean distance in degree space.  Used for per-tick movement.
    #[inline]
    pub fn planar_distance(self, other: Coordinate) -> f64 {
        let dlat = other.lat - self.lat;
        let dlng = other.lng - self.lng;
        (dlat * dlat + dlng * dlng).sqrt()
    }

    /// Point `ratio` of the way from `self` toward `target` (0 = self, 1 = target).
    #[inline]
    pub fn lerp(self, target: Coordinate, ratio: f64) -> Coordinate {
        Coordinate {
            lat: self.lat + (target.lat - self.lat) * ratio,
            lng: self.lng + (target.lng - self.lng) * ratio,
        }
    }

    /// Integer key for this coordinate rounded to 5 decimal places.
    #[inline]
    pub fn rounded_key(self) -> (i64, i64) {
        (
            (self.lat * KEY_SCALE).round() as i64,
            (self.lng * KEY_SCALE).round() as i64,
        )
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lng)
    }
}
