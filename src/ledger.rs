//! Exploration ledger: which cells have been visited, in what order, and
//! how much surface that covers.
//!
//! The ledger is the single authority over the discovered-cell set.
//! `mark_explored` is the only mutation entry point; no other component may
//! insert cells directly. The cached surface value is always recomputable
//! from the cell count and is never the source of truth.

use std::collections::HashSet;

use crate::geo::{GeoPoint, EARTH_SURFACE_KM2};
use crate::grid::{CellId, GRID_SIZE_M};

/// Outcome of feeding a position into the ledger.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DiscoveryOutcome {
    /// The position fell in a cell already discovered. No side effects.
    AlreadyExplored(CellId),
    /// A new cell was discovered; carries the recomputed total surface.
    NewlyExplored { cell: CellId, surface_km2: f64 },
}

impl DiscoveryOutcome {
    pub fn cell(&self) -> CellId {
        match *self {
            DiscoveryOutcome::AlreadyExplored(cell) => cell,
            DiscoveryOutcome::NewlyExplored { cell, .. } => cell,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, DiscoveryOutcome::NewlyExplored { .. })
    }
}

/// The set of visited cells, the chronological position history, and the
/// derived explored-surface statistic.
#[derive(Clone, Debug, Default)]
pub struct ExplorationLedger {
    /// Discovered cells, for O(1) membership.
    cells: HashSet<CellId>,
    /// Same cells in discovery order (observable for replay/debugging).
    discovery_order: Vec<CellId>,
    /// Append-only history of positions that triggered discoveries.
    positions: Vec<GeoPoint>,
    /// Cached total explored surface in km².
    surface_km2: f64,
}

impl ExplorationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a position. If its cell is new, insert it, append the point
    /// to the position history, and recompute the surface.
    ///
    /// Unusable coordinates index to the origin cell (see
    /// [`crate::grid::CellLookup`]), so a malformed GPS sample can at worst
    /// discover `0:0` once.
    pub fn mark_explored(&mut self, point: GeoPoint) -> DiscoveryOutcome {
        let cell = CellId::of_point(point).or_origin();

        if self.cells.contains(&cell) {
            return DiscoveryOutcome::AlreadyExplored(cell);
        }

        self.cells.insert(cell);
        self.discovery_order.push(cell);
        self.positions.push(point);
        self.surface_km2 = self.compute_surface_km2();

        DiscoveryOutcome::NewlyExplored {
            cell,
            surface_km2: self.surface_km2,
        }
    }

    /// Surface in km² derived purely from the cell count. Each cell is
    /// nominally GRID_SIZE² m², i.e. 1 km² at the default grid size.
    fn compute_surface_km2(&self) -> f64 {
        self.cells.len() as f64 * (GRID_SIZE_M * GRID_SIZE_M) / 1_000_000.0
    }

    pub fn surface_km2(&self) -> f64 {
        self.surface_km2
    }

    /// Fraction of the Earth's surface explored so far.
    pub fn surface_fraction(&self) -> f64 {
        self.surface_km2 / EARTH_SURFACE_KM2
    }

    pub fn contains(&self, cell: &CellId) -> bool {
        self.cells.contains(cell)
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Discovered cells in discovery order.
    pub fn cells_in_order(&self) -> &[CellId] {
        &self.discovery_order
    }

    /// Positions that triggered each discovery, oldest first.
    pub fn positions(&self) -> &[GeoPoint] {
        &self.positions
    }

    /// Rebuild the ledger from persisted data. The surface is recomputed
    /// here, never read from storage. Duplicate cells in the input are
    /// collapsed, keeping first occurrence order.
    pub fn from_saved(cells: Vec<CellId>, positions: Vec<GeoPoint>) -> Self {
        let mut ledger = ExplorationLedger {
            positions,
            ..Default::default()
        };
        for cell in cells {
            if ledger.cells.insert(cell) {
                ledger.discovery_order.push(cell);
            }
        }
        ledger.surface_km2 = ledger.compute_surface_km2();
        ledger
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.discovery_order.clear();
        self.positions.clear();
        self.surface_km2 = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_visit_discovers() {
        let mut ledger = ExplorationLedger::new();
        let outcome = ledger.mark_explored(GeoPoint::new(48.0, 2.0));
        assert!(outcome.is_new());
        assert_eq!(ledger.cell_count(), 1);
        assert_eq!(ledger.surface_km2(), 1.0);
        assert_eq!(ledger.positions().len(), 1);
    }

    #[test]
    fn test_mark_explored_is_idempotent() {
        let mut ledger = ExplorationLedger::new();
        let p = GeoPoint::new(48.0, 2.0);
        let first = ledger.mark_explored(p);
        // A nearby point in the same cell must not re-discover.
        let second = ledger.mark_explored(GeoPoint::new(48.0001, 2.0001));
        assert!(first.is_new());
        assert_eq!(second, DiscoveryOutcome::AlreadyExplored(first.cell()));
        assert_eq!(ledger.cell_count(), 1);
        assert_eq!(ledger.surface_km2(), 1.0);
        assert_eq!(ledger.positions().len(), 1);
    }

    #[test]
    fn test_surface_tracks_cell_count() {
        let mut ledger = ExplorationLedger::new();
        for i in 0..5 {
            // Steps of ~0.01° latitude land in distinct cells.
            ledger.mark_explored(GeoPoint::new(48.0 + i as f64 * 0.01, 2.0));
            let expected = ledger.cell_count() as f64 * (GRID_SIZE_M * GRID_SIZE_M) / 1e6;
            assert_eq!(ledger.surface_km2(), expected);
        }
        assert_eq!(ledger.cell_count(), 5);
    }

    #[test]
    fn test_surface_fraction() {
        let mut ledger = ExplorationLedger::new();
        ledger.mark_explored(GeoPoint::new(48.0, 2.0));
        let frac = ledger.surface_fraction();
        assert!((frac - 1.0 / EARTH_SURFACE_KM2).abs() < 1e-18);
    }

    #[test]
    fn test_from_saved_recomputes_surface_and_dedups() {
        let a = CellId { x: 1, y: 1 };
        let b = CellId { x: 2, y: 2 };
        let ledger = ExplorationLedger::from_saved(vec![a, b, a], vec![]);
        assert_eq!(ledger.cell_count(), 2);
        assert_eq!(ledger.surface_km2(), 2.0);
        assert_eq!(ledger.cells_in_order(), &[a, b]);
    }

    #[test]
    fn test_discovery_order_is_preserved() {
        let mut ledger = ExplorationLedger::new();
        let p1 = GeoPoint::new(48.0, 2.0);
        let p2 = GeoPoint::new(48.02, 2.0);
        let c1 = ledger.mark_explored(p1).cell();
        let c2 = ledger.mark_explored(p2).cell();
        assert_eq!(ledger.cells_in_order(), &[c1, c2]);
    }
}
