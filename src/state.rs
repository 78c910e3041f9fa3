//! Game state: the single owning context threaded through every component.
//!
//! Placement and collection are stateless services over this struct; the
//! only orchestration logic lives in `record_location`, which fixes the
//! order of operations for a location update. Rendering is an external
//! collaborator: the core never draws, it queues `GameEvent` facts for the
//! caller to drain.

use rand::Rng;

use crate::collect;
use crate::geo::GeoPoint;
use crate::grid::{CellBounds, CellId};
use crate::ledger::ExplorationLedger;
use crate::placement::{self, PlacementParams};

/// Default fill/stroke color for explored zones (ARGB).
pub const DEFAULT_ZONE_COLOR: u32 = 0x2200_FF00;

/// An uncollected reward token.
///
/// The render handle identifies the marker the rendering collaborator
/// created for this piece, kept on the piece itself so removal can never
/// desync a position from its marker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Piece {
    pub position: GeoPoint,
    pub handle: Option<u64>,
}

impl Piece {
    pub fn at(position: GeoPoint) -> Self {
        Piece {
            position,
            handle: None,
        }
    }
}

/// Facts the core reports to the rendering collaborator.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    /// A new cell was discovered; carries its corners for polygon drawing.
    CellDiscovered { cell: CellId, bounds: CellBounds },
    /// A piece was placed at this position (marker creation).
    PiecePlaced { position: GeoPoint },
    /// The piece at this index was removed (marker teardown). The handle is
    /// whatever the collaborator registered for it, if anything.
    PieceRemoved { index: usize, handle: Option<u64> },
    /// The zone color changed (restyle existing shapes).
    ColorChanged { color: u32 },
}

/// What happened while processing one location update.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocationOutcome {
    /// The newly discovered cell, if this update entered one.
    pub discovered: Option<CellId>,
    /// Pieces collected this update (proximity + in-cell sweep).
    pub collected: usize,
    /// Pieces spawned by the rebalance this update.
    pub spawned: usize,
}

impl LocationOutcome {
    /// True when the update changed state the caller must persist.
    pub fn changed_durable_state(&self) -> bool {
        self.discovered.is_some() || self.collected > 0 || self.spawned > 0
    }
}

/// All mutable game state: exploration ledger, active pieces, collection
/// statistics, zone color, and the pending event queue.
#[derive(Clone, Debug)]
pub struct GameState {
    pub ledger: ExplorationLedger,
    pub pieces: Vec<Piece>,
    pub collected_count: u32,
    /// Positions of collected pieces, kept for statistics only. Never
    /// persisted and never re-enters the active set.
    pub collected_log: Vec<GeoPoint>,
    pub zone_color: u32,
    events: Vec<GameEvent>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        GameState {
            ledger: ExplorationLedger::new(),
            pieces: Vec::new(),
            collected_count: 0,
            collected_log: Vec::new(),
            zone_color: DEFAULT_ZONE_COLOR,
            events: Vec::new(),
        }
    }

    /// Process one location update.
    ///
    /// The order is fixed: mark the cell explored first, then sweep pieces
    /// inside a newly discovered cell, then rebalance (which reads the
    /// updated surface), and always run the proximity check. Callers must
    /// persist afterwards when `changed_durable_state()` reports true.
    pub fn record_location(&mut self, point: GeoPoint, rng: &mut impl Rng) -> LocationOutcome {
        let mut outcome = LocationOutcome::default();

        let discovery = self.ledger.mark_explored(point);
        if discovery.is_new() {
            let cell = discovery.cell();
            outcome.discovered = Some(cell);
            self.push_event(GameEvent::CellDiscovered {
                cell,
                bounds: cell.bounds(),
            });

            outcome.collected += collect::collect_all_in_cell(self, cell);
            outcome.spawned = placement::rebalance(self, point, &PlacementParams::default(), rng);
        }

        outcome.collected +=
            collect::collect_by_proximity(self, point, collect::COLLECTION_RADIUS_M);

        outcome
    }

    /// Seed the board with an initial batch of pieces around the player.
    /// Intended for a fresh session with no active pieces.
    pub fn spawn_initial_batch(&mut self, origin: GeoPoint, rng: &mut impl Rng) -> usize {
        placement::spawn_initial_batch(self, origin, &PlacementParams::default(), rng)
    }

    /// Change the zone display color. Durable; callers persist afterwards.
    pub fn set_zone_color(&mut self, color: u32) {
        if self.zone_color == color {
            return;
        }
        self.zone_color = color;
        self.push_event(GameEvent::ColorChanged { color });
    }

    /// Attach the rendering collaborator's handle to the piece at `index`.
    pub fn set_piece_handle(&mut self, index: usize, handle: u64) {
        if let Some(piece) = self.pieces.get_mut(index) {
            piece.handle = Some(handle);
        }
    }

    /// Clear everything back to a fresh session. Callers also delete the
    /// durable snapshot via `persist::delete_save`.
    pub fn reset(&mut self) {
        self.ledger.clear();
        self.pieces.clear();
        self.collected_count = 0;
        self.collected_log.clear();
        self.zone_color = DEFAULT_ZONE_COLOR;
        self.events.clear();
    }

    /// Take all pending render events, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_first_update_discovers_and_rebalances() {
        let mut state = GameState::new();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let outcome = state.record_location(GeoPoint::new(48.0, 2.0), &mut rng);

        assert!(outcome.discovered.is_some());
        assert!(outcome.changed_durable_state());
        // Rebalance runs against the post-discovery surface: 1 km²
        // explored means a target of floor(1 * 3) = 3 pieces, minus any
        // placements that failed rejection sampling.
        assert_eq!(state.ledger.surface_km2(), 1.0);
        assert!(state.pieces.len() <= 3);
    }

    #[test]
    fn test_repeat_update_in_same_cell_is_quiet() {
        let mut state = GameState::new();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let p = GeoPoint::new(48.0, 2.0);

        state.record_location(p, &mut rng);
        state.drain_events();
        let before = state.pieces.len();

        let outcome = state.record_location(p, &mut rng);
        assert!(outcome.discovered.is_none());
        assert_eq!(outcome.spawned, 0);
        assert_eq!(state.pieces.len(), before);
        // No discovery, no collection in an already-swept cell.
        assert!(state
            .drain_events()
            .iter()
            .all(|e| !matches!(e, GameEvent::CellDiscovered { .. })));
    }

    #[test]
    fn test_discovery_emits_cell_event_with_bounds() {
        let mut state = GameState::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let p = GeoPoint::new(48.0, 2.0);

        let outcome = state.record_location(p, &mut rng);
        let cell = outcome.discovered.unwrap();

        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::CellDiscovered { cell: c, bounds } if *c == cell && bounds.contains(&p)
        )));
        // Draining empties the queue.
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_set_zone_color() {
        let mut state = GameState::new();
        state.set_zone_color(0xFF11_2233);
        assert_eq!(state.zone_color, 0xFF11_2233);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::ColorChanged { color: 0xFF11_2233 }]
        );

        // Setting the same color again is not a change.
        state.set_zone_color(0xFF11_2233);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut state = GameState::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        state.record_location(GeoPoint::new(48.0, 2.0), &mut rng);
        state.set_zone_color(0xFF00_0000);
        state.collected_count = 9;

        state.reset();

        assert_eq!(state.ledger.cell_count(), 0);
        assert!(state.ledger.positions().is_empty());
        assert!(state.pieces.is_empty());
        assert_eq!(state.collected_count, 0);
        assert!(state.collected_log.is_empty());
        assert_eq!(state.zone_color, DEFAULT_ZONE_COLOR);
        assert!(state.drain_events().is_empty());
    }
}
