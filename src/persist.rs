//! Durable snapshots of the game state.
//!
//! Saves the full state as JSON behind a versioned wrapper, replacing the
//! previous snapshot atomically (temp file + rename) so a crash mid-write
//! can never leave a half-written file as the current save. Loading treats
//! an absent file as a fresh session and self-heals from corrupt data by
//! resetting to defaults and deleting the broken snapshot.

use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::grid::CellId;
use crate::ledger::ExplorationLedger;
use crate::state::{GameState, Piece, DEFAULT_ZONE_COLOR};

/// Snapshot format version, bumped on incompatible changes.
const SAVE_VERSION: u32 = 1;

/// The externally persisted form of the game state.
///
/// The explored surface is deliberately absent: it is recomputed from
/// `explored_cells` on every load and never trusted from storage.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameData {
    version: u32,
    saved_at: DateTime<Utc>,
    /// Discovered cells in discovery order, canonical `"x:y"` form.
    explored_cells: Vec<String>,
    /// Append-only history of discovery positions.
    player_positions: Vec<GeoPoint>,
    collected_pieces_count: u32,
    /// Active, uncollected pieces.
    pieces: Vec<GeoPoint>,
    /// Zone display color, ARGB.
    #[serde(default = "default_zone_color")]
    zone_color: u32,
}

fn default_zone_color() -> u32 {
    DEFAULT_ZONE_COLOR
}

/// How a load attempt went.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    /// A snapshot existed and was applied.
    Loaded,
    /// No snapshot on disk; a fresh session. Counts as success.
    NoSave,
    /// The snapshot was unreadable or structurally invalid. State was
    /// reset to defaults and the broken file removed.
    Failed,
}

/// Save the game state, atomically replacing any prior snapshot.
pub fn save_game(state: &GameState, path: &Path) -> io::Result<()> {
    let data = GameData {
        version: SAVE_VERSION,
        saved_at: Utc::now(),
        explored_cells: state
            .ledger
            .cells_in_order()
            .iter()
            .map(|c| c.to_string())
            .collect(),
        player_positions: state.ledger.positions().to_vec(),
        collected_pieces_count: state.collected_count,
        pieces: state.pieces.iter().map(|p| p.position).collect(),
        zone_color: state.zone_color,
    };

    let json = serde_json::to_string(&data).map_err(|e| {
        io::Error::new(io::ErrorKind::Other, format!("Serialization failed: {}", e))
    })?;

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)
}

/// Load the game state from a snapshot.
///
/// Always returns a usable state: fresh defaults when no snapshot exists
/// or when the snapshot is corrupt. Corrupt snapshots are deleted so the
/// next session starts clean instead of tripping over them again.
pub fn load_game(path: &Path) -> (GameState, LoadStatus) {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return (GameState::new(), LoadStatus::NoSave);
        }
        Err(_) => return (GameState::new(), LoadStatus::Failed),
    };

    match parse_snapshot(&json) {
        Some(state) => (state, LoadStatus::Loaded),
        None => {
            // Discard the broken snapshot entirely rather than operate on
            // partially deserialized data.
            let _ = fs::remove_file(path);
            (GameState::new(), LoadStatus::Failed)
        }
    }
}

/// Delete the durable snapshot, e.g. after an explicit reset. A missing
/// file is fine.
pub fn delete_save(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Parse and validate a snapshot. `None` means structurally invalid.
fn parse_snapshot(json: &str) -> Option<GameState> {
    let data: GameData = serde_json::from_str(json).ok()?;

    if data.version > SAVE_VERSION {
        return None;
    }

    // Every stored cell id must parse; one bad record invalidates the
    // snapshot as a whole.
    let cells = data
        .explored_cells
        .iter()
        .map(|s| CellId::parse(s))
        .collect::<Option<Vec<_>>>()?;

    let mut state = GameState::new();
    state.ledger = ExplorationLedger::from_saved(cells, data.player_positions);
    state.collected_count = data.collected_pieces_count;
    state.pieces = data.pieces.into_iter().map(Piece::at).collect();
    state.zone_color = data.zone_color;

    Some(state)
}
