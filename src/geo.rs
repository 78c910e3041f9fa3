//! Geographic primitives shared by the grid, placement, and collection code.
//!
//! Distances come in two flavors: the haversine great-circle distance used
//! for proximity checks, and a flat equirectangular offset used when
//! projecting a polar (distance, bearing) step onto coordinates. Both rely
//! on the same meters-per-degree approximation so they stay consistent with
//! the grid indexing in `grid`.

use serde::{Deserialize, Serialize};

/// Meters per degree of latitude at the equator (fixed approximation).
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Total surface of the Earth in km², for exploration-percentage stats.
pub const EARTH_SURFACE_KM2: f64 = 510_072_000.0;

/// Mean Earth radius in meters, used by the haversine distance.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A latitude/longitude pair in degrees. Immutable value type.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, [-90, 90]
    pub lat: f64,
    /// Longitude in degrees, [-180, 180]
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True when both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Great-circle (haversine) distance to another point, in meters.
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlng = (other.lng - self.lng).to_radians();

        let a = (dlat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }

    /// Offset this point by a polar step (distance in meters, bearing in
    /// radians) using the flat meters-per-degree approximation.
    ///
    /// This intentionally matches the grid's projection rather than a true
    /// geodesic step, so offset points land in the cells the indexer
    /// expects. The longitude correction uses the *origin* latitude.
    pub fn offset_polar(&self, distance_m: f64, bearing_rad: f64) -> GeoPoint {
        let dlat = distance_m * bearing_rad.cos() / METERS_PER_DEGREE;
        let dlng = distance_m * bearing_rad.sin()
            / (METERS_PER_DEGREE * self.lat.to_radians().cos());
        GeoPoint::new(self.lat + dlat, self.lng + dlng)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}
