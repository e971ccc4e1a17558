//! Great-circle proximity checks.
//!
//! Distances are computed with the haversine formula over a spherical Earth
//! of mean radius [`EARTH_RADIUS_KM`]. Out-of-range coordinates still produce
//! a distance; validating them is the caller's job.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Inclusive radius within which two points count as nearby.
pub const NEARBY_RADIUS_KM: f64 = 1.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate from latitude and longitude in degrees.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in kilometres.
    ///
    /// # Examples
    /// ```
    /// use neighborguard::domain::Coordinate;
    ///
    /// let origin = Coordinate::new(0.0, 0.0);
    /// assert_eq!(origin.distance_km(&origin), 0.0);
    /// ```
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }
}

/// Whether `a` and `b` lie within [`NEARBY_RADIUS_KM`] of each other.
#[must_use]
pub fn is_nearby(a: &Coordinate, b: &Coordinate) -> bool {
    a.distance_km(b) <= NEARBY_RADIUS_KM
}
