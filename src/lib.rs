//! Core of a GPS exploration game.
//!
//! Tracks real-world movement on a fixed 1km world grid, keeps a permanent
//! ledger of visited cells, and procedurally places and collects reward
//! pieces under geometric constraints. Rendering, location delivery, and UI
//! are external collaborators: the core consumes position samples and emits
//! facts (`state::GameEvent`) plus a persistence contract (`persist`).

pub mod collect;
pub mod geo;
pub mod grid;
pub mod ledger;
pub mod persist;
pub mod placement;
pub mod state;

pub use geo::GeoPoint;
pub use grid::{CellId, GRID_SIZE_M};
pub use ledger::{DiscoveryOutcome, ExplorationLedger};
pub use state::{GameEvent, GameState, LocationOutcome, Piece};
