//! Rules for the sliding-tile merge puzzle: the board, how a move slides and
//! merges tiles, tile spawning, win and loss detection, and undo.
//!
//! Rendering and input are left to the caller, which drives a [`Session`] and
//! draws the [`MoveResult`] it gets back.

pub mod config;
pub mod error;
pub mod grid;
pub mod history;
pub mod line;
pub mod moves;
pub mod session;
pub mod spawn;

pub use config::Config;
pub use error::EngineError;
pub use grid::{Grid, Position, MAX_TILE};
pub use history::{History, Snapshot};
pub use line::{slide_and_merge, LineOutcome};
pub use moves::{can_move, is_stuck, resolve, Direction, MoveOutcome};
pub use session::{
    BestScoreSink, GameState, MoveResult, NullSink, Session, SessionView, Transition,
};
pub use spawn::{spawn_tile, SpawnedTile, TileDistribution};
