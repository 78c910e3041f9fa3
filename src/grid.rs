//! World grid indexing.
//!
//! Divides the world into fixed-size square cells (1000m x 1000m) and maps
//! between GPS coordinates and cell identifiers. The mapping trades exact
//! equal-area cells for an O(1), allocation-free computation: east-west cell
//! width shrinks with latitude, but the partition stays consistent and
//! reversible, which is all the gameplay needs.

use crate::geo::{GeoPoint, METERS_PER_DEGREE};

/// Edge length of one grid cell, in meters.
pub const GRID_SIZE_M: f64 = 1000.0;

/// Identifier of one square cell of the world grid.
///
/// Canonical textual form is `"x:y"`. Every finite GeoPoint maps to exactly
/// one CellId, and every CellId maps back to one axis-aligned quadrilateral
/// of corner points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId {
    pub x: i32,
    pub y: i32,
}

/// Result of indexing a point into the grid.
///
/// Degenerate inputs (NaN/infinite coordinates) are an expected hazard of a
/// long-running GPS session, so indexing never errors: `Invalid` records
/// that the input was unusable, and `or_origin` collapses it to the
/// documented `0:0` fallback for callers that just need a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellLookup {
    Valid(CellId),
    Invalid,
}

impl CellLookup {
    /// The looked-up cell, falling back to the origin cell `0:0`.
    pub fn or_origin(self) -> CellId {
        match self {
            CellLookup::Valid(id) => id,
            CellLookup::Invalid => CellId::ORIGIN,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, CellLookup::Valid(_))
    }
}

/// The four corners of a cell, ordered SW, NW, NE, SE.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellBounds {
    pub corners: [GeoPoint; 4],
}

impl CellBounds {
    pub fn south_west(&self) -> GeoPoint {
        self.corners[0]
    }

    pub fn north_east(&self) -> GeoPoint {
        self.corners[2]
    }

    /// Approximate center of the cell.
    pub fn center(&self) -> GeoPoint {
        let sw = self.south_west();
        let ne = self.north_east();
        GeoPoint::new((sw.lat + ne.lat) / 2.0, (sw.lng + ne.lng) / 2.0)
    }

    /// Whether a point lies within the closed bounding box of the cell.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        let sw = self.south_west();
        let ne = self.north_east();
        point.lat >= sw.lat && point.lat <= ne.lat && point.lng >= sw.lng && point.lng <= ne.lng
    }
}

impl CellId {
    /// Fallback cell for unusable inputs.
    pub const ORIGIN: CellId = CellId { x: 0, y: 0 };

    /// Index a point into the grid.
    ///
    /// Latitude converts directly through the meters-per-degree constant;
    /// longitude is corrected by cos(lat) so cells keep roughly their
    /// nominal width away from the equator.
    pub fn of_point(point: GeoPoint) -> CellLookup {
        if !point.is_finite() {
            return CellLookup::Invalid;
        }

        let x = (point.lat * METERS_PER_DEGREE / GRID_SIZE_M).floor();
        let y = (point.lng * METERS_PER_DEGREE * point.lat.to_radians().cos() / GRID_SIZE_M)
            .floor();

        if !x.is_finite() || !y.is_finite() {
            return CellLookup::Invalid;
        }

        CellLookup::Valid(CellId {
            x: x as i32,
            y: y as i32,
        })
    }

    /// Parse the canonical `"x:y"` form. Returns `None` for anything that
    /// is not exactly two integer tokens.
    pub fn parse(s: &str) -> Option<CellId> {
        let mut parts = s.split(':');
        let x = parts.next()?.parse::<i32>().ok()?;
        let y = parts.next()?.parse::<i32>().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(CellId { x, y })
    }

    /// Corner coordinates of this cell, ordered SW, NW, NE, SE.
    ///
    /// The inverse of `of_point`: latitude bounds come straight from the
    /// x index, and the longitude correction factor is evaluated at the
    /// cell's mid latitude.
    pub fn bounds(&self) -> CellBounds {
        let lat_south = self.x as f64 * GRID_SIZE_M / METERS_PER_DEGREE;
        let lat_north = (self.x + 1) as f64 * GRID_SIZE_M / METERS_PER_DEGREE;

        let mid_lat = (lat_south + lat_north) / 2.0;
        let lng_factor = METERS_PER_DEGREE * mid_lat.to_radians().cos();

        let lng_west = self.y as f64 * GRID_SIZE_M / lng_factor;
        let lng_east = (self.y + 1) as f64 * GRID_SIZE_M / lng_factor;

        CellBounds {
            corners: [
                GeoPoint::new(lat_south, lng_west),
                GeoPoint::new(lat_north, lng_west),
                GeoPoint::new(lat_north, lng_east),
                GeoPoint::new(lat_south, lng_east),
            ],
        }
    }
}

impl std::fmt::Display for CellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.x, self.y)
    }
}

/// Bounds for a raw cell-id string, as stored in snapshots.
///
/// Malformed strings fail soft: the fallback is a ±0.01° box centered at
/// the origin, so a single bad record cannot take down a session.
pub fn bounds_of_str(cell_id: &str) -> CellBounds {
    match CellId::parse(cell_id) {
        Some(id) => id.bounds(),
        None => CellBounds {
            corners: [
                GeoPoint::new(-0.01, -0.01),
                GeoPoint::new(0.01, -0.01),
                GeoPoint::new(0.01, 0.01),
                GeoPoint::new(-0.01, 0.01),
            ],
        },
    }
}
