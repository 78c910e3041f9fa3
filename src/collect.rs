//! Piece collection: proximity pickup around the player and the full-cell
//! sweep that runs when a cell is first discovered.
//!
//! Both sweeps walk the piece list in reverse index order so removals can
//! never shift an index under a piece that has not been examined yet.

use crate::geo::GeoPoint;
use crate::grid::CellId;
use crate::state::{GameEvent, GameState};

/// Pickup radius around the player, meters. The boundary is inclusive: a
/// piece at exactly this distance is collected.
pub const COLLECTION_RADIUS_M: f64 = 20.0;

/// Collect every active piece within `radius_m` (geodesic) of the player.
/// Returns the number collected; 0 is a normal outcome.
pub fn collect_by_proximity(state: &mut GameState, player: GeoPoint, radius_m: f64) -> usize {
    let mut collected = 0;

    for i in (0..state.pieces.len()).rev() {
        if state.pieces[i].position.distance_m(&player) <= radius_m {
            remove_piece(state, i);
            collected += 1;
        }
    }

    collected
}

/// Collect every active piece inside the closed bounding box of `cell`.
///
/// Runs exactly once per discovery, right after the ledger records the new
/// cell, so a piece can never be orphaned inside fully explored territory.
pub fn collect_all_in_cell(state: &mut GameState, cell: CellId) -> usize {
    let bounds = cell.bounds();
    let mut collected = 0;

    for i in (0..state.pieces.len()).rev() {
        if bounds.contains(&state.pieces[i].position) {
            remove_piece(state, i);
            collected += 1;
        }
    }

    collected
}

fn remove_piece(state: &mut GameState, index: usize) {
    let piece = state.pieces.remove(index);
    state.collected_count += 1;
    state.collected_log.push(piece.position);
    state.push_event(GameEvent::PieceRemoved {
        index,
        handle: piece.handle,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Piece;

    fn state_with_pieces(positions: &[GeoPoint]) -> GameState {
        let mut state = GameState::new();
        for (i, p) in positions.iter().enumerate() {
            state.pieces.push(Piece::at(*p));
            state.set_piece_handle(i, 100 + i as u64);
        }
        state
    }

    #[test]
    fn test_piece_at_player_position_is_collected() {
        let player = GeoPoint::new(48.0, 2.0);
        let mut state = state_with_pieces(&[player]);

        let collected = collect_by_proximity(&mut state, player, COLLECTION_RADIUS_M);
        assert_eq!(collected, 1);
        assert!(state.pieces.is_empty());
        assert_eq!(state.collected_count, 1);
        assert_eq!(state.collected_log, vec![player]);
    }

    #[test]
    fn test_piece_at_21m_is_not_collected() {
        let player = GeoPoint::new(48.0, 2.0);
        // 21m due north.
        let piece = GeoPoint::new(48.0 + 21.0 / 111_320.0, 2.0);
        assert!(player.distance_m(&piece) > 20.0);

        let mut state = state_with_pieces(&[piece]);
        let collected = collect_by_proximity(&mut state, player, COLLECTION_RADIUS_M);
        assert_eq!(collected, 0);
        assert_eq!(state.pieces.len(), 1);
        assert_eq!(state.collected_count, 0);
    }

    #[test]
    fn test_adjacent_removals_do_not_skip() {
        // Two pieces both in range, plus one far away between them in the
        // list. Reverse iteration must collect both without double
        // processing or skipping across the removal.
        let player = GeoPoint::new(48.0, 2.0);
        let near1 = GeoPoint::new(48.00005, 2.0);
        let far = GeoPoint::new(48.01, 2.0);
        let near2 = GeoPoint::new(48.0, 2.00005);
        let mut state = state_with_pieces(&[near1, far, near2]);

        let collected = collect_by_proximity(&mut state, player, COLLECTION_RADIUS_M);
        assert_eq!(collected, 2);
        assert_eq!(state.pieces.len(), 1);
        assert_eq!(state.pieces[0].position, far);
    }

    #[test]
    fn test_removal_events_carry_index_and_handle() {
        let player = GeoPoint::new(48.0, 2.0);
        let near = GeoPoint::new(48.0, 2.0);
        let far = GeoPoint::new(48.01, 2.0);
        let mut state = state_with_pieces(&[far, near]);
        state.drain_events();

        collect_by_proximity(&mut state, player, COLLECTION_RADIUS_M);

        assert_eq!(
            state.drain_events(),
            vec![GameEvent::PieceRemoved {
                index: 1,
                handle: Some(101),
            }]
        );
    }

    #[test]
    fn test_collect_all_in_cell() {
        let inside = GeoPoint::new(48.0, 2.0);
        let cell = CellId::of_point(inside).or_origin();
        // ~2 cells north, well outside.
        let outside = GeoPoint::new(48.02, 2.0);
        let mut state = state_with_pieces(&[outside, inside, inside]);

        let collected = collect_all_in_cell(&mut state, cell);
        assert_eq!(collected, 2);
        assert_eq!(state.pieces.len(), 1);
        assert_eq!(state.pieces[0].position, outside);
        assert_eq!(state.collected_count, 2);
    }

    #[test]
    fn test_collect_in_empty_cell_is_a_noop() {
        let outside = GeoPoint::new(48.02, 2.0);
        let mut state = state_with_pieces(&[outside]);
        state.drain_events();

        let cell = CellId::of_point(GeoPoint::new(48.0, 2.0)).or_origin();
        let collected = collect_all_in_cell(&mut state, cell);

        assert_eq!(collected, 0);
        assert_eq!(state.pieces.len(), 1);
        assert_eq!(state.collected_count, 0);
        assert!(state.drain_events().is_empty());
    }
}
