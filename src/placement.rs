//! Piece placement: bounded rejection sampling over an annulus around the
//! player, constrained to unexplored territory.
//!
//! Candidates are drawn with the flat polar offset (matching the grid's
//! projection) but the minimum-distance rejection test uses the haversine
//! distance. The two models disagree slightly, so accepted points are only
//! approximately at the drawn distance; this mixing is kept deliberately
//! because it shapes the piece density players actually see.

use rand::Rng;

use crate::geo::GeoPoint;
use crate::grid::CellId;
use crate::ledger::ExplorationLedger;
use crate::state::{GameEvent, GameState, Piece};

/// Target piece density: pieces per km² of explored surface.
pub const PIECES_PER_KM2: f64 = 3.0;

/// Maximum pieces in an initial spawn batch.
pub const INITIAL_BATCH_MAX: u32 = 10;

/// Tunables for the rejection sampler. Defaults match live gameplay;
/// tests override them to force specific outcomes.
#[derive(Clone, Copy, Debug)]
pub struct PlacementParams {
    /// Inner radius of the sampling annulus, meters.
    pub min_radius_m: f64,
    /// Outer radius of the sampling annulus, meters (exclusive).
    pub max_radius_m: f64,
    /// Hard cap on rejection-sampling attempts per piece.
    pub max_attempts: u32,
    /// Minimum geodesic distance from every discovered cell's center.
    pub min_distance_from_explored_m: f64,
}

impl Default for PlacementParams {
    fn default() -> Self {
        PlacementParams {
            min_radius_m: 500.0,
            max_radius_m: 2000.0,
            max_attempts: 30,
            min_distance_from_explored_m: 500.0,
        }
    }
}

/// Draw one candidate piece position around `origin`, or `None` if no
/// candidate survives within `max_attempts`.
///
/// A candidate is accepted only if its cell is undiscovered AND it keeps
/// the minimum geodesic distance from the center of every discovered cell.
/// `None` is the expected outcome under dense exploration, not a failure:
/// callers simply place fewer pieces this round and retry on the next
/// rebalance.
pub fn sample_placement(
    ledger: &ExplorationLedger,
    origin: GeoPoint,
    params: &PlacementParams,
    rng: &mut impl Rng,
) -> Option<GeoPoint> {
    for _ in 0..params.max_attempts {
        let distance =
            params.min_radius_m + rng.gen::<f64>() * (params.max_radius_m - params.min_radius_m);
        let bearing = rng.gen::<f64>() * std::f64::consts::TAU;

        let candidate = origin.offset_polar(distance, bearing);

        let cell = CellId::of_point(candidate).or_origin();
        if ledger.contains(&cell) {
            continue;
        }

        if clears_explored_cells(ledger, candidate, params.min_distance_from_explored_m) {
            return Some(candidate);
        }
    }

    None
}

/// Whether a position keeps the minimum distance from the centers of all
/// discovered cells.
fn clears_explored_cells(ledger: &ExplorationLedger, position: GeoPoint, min_m: f64) -> bool {
    ledger
        .cells_in_order()
        .iter()
        .all(|cell| position.distance_m(&cell.bounds().center()) >= min_m)
}

/// Spawn a random batch of 1..=10 pieces around the player. Returns how
/// many actually landed.
pub fn spawn_initial_batch(
    state: &mut GameState,
    origin: GeoPoint,
    params: &PlacementParams,
    rng: &mut impl Rng,
) -> usize {
    let count = rng.gen_range(1..=INITIAL_BATCH_MAX);
    place_up_to(state, origin, count as usize, params, rng)
}

/// Top the active piece set up toward the surface-derived target:
/// floor(surface_km2 * PIECES_PER_KM2). Never removes excess pieces; only
/// collection shrinks the set. Returns how many pieces were added.
pub fn rebalance(
    state: &mut GameState,
    origin: GeoPoint,
    params: &PlacementParams,
    rng: &mut impl Rng,
) -> usize {
    let target = (state.ledger.surface_km2() * PIECES_PER_KM2).floor() as usize;
    let current = state.pieces.len();
    if current >= target {
        return 0;
    }
    place_up_to(state, origin, target - current, params, rng)
}

fn place_up_to(
    state: &mut GameState,
    origin: GeoPoint,
    count: usize,
    params: &PlacementParams,
    rng: &mut impl Rng,
) -> usize {
    let mut placed = 0;
    for _ in 0..count {
        if let Some(position) = sample_placement(&state.ledger, origin, params, rng) {
            state.pieces.push(Piece::at(position));
            state.push_event(GameEvent::PiecePlaced { position });
            placed += 1;
        }
    }
    placed
}
