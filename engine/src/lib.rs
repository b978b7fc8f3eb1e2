//! Rule engine for an infinite minesweeper board.
//!
//! The board is split into fixed-size chunks that are generated the first
//! time anything looks at them: a reveal, a mark, or a neighbor count near a
//! chunk edge. Three actions drive the game:
//!
//! - [`World::reveal`] uncovers a field and flood fills across zero counts,
//!   crossing chunk borders as if they were not there.
//! - [`World::toggle_mark`] cycles a field through flagged and questioned,
//!   keeping each neighbor's flag count current.
//! - [`World::chord`] uncovers the neighbors of a revealed field whose flags
//!   account for all its mines.
//!
//! Hitting a mine explodes the world: every hidden mine in the chunks
//! generated so far is revealed and further actions are ignored.
//!
//! ```rust
//! use infinisweeper_engine::{World, WorldParams, ChunkPos, LocalPos};
//!
//! let params = WorldParams { difficulty: 0.15, seed: Some(42), ..Default::default() };
//! let mut world = World::new(ChunkPos::ORIGIN, &params)?;
//!
//! let outcome = world.toggle_mark(ChunkPos::ORIGIN, LocalPos::new(3, 3))?;
//! assert_eq!(outcome.changed.len(), 1);
//! # Ok::<(), infinisweeper_engine::WorldError>(())
//! ```

pub mod coords;
pub mod data;
pub mod error;
pub mod neighbors;
pub mod store;
pub mod world;

pub use coords::FieldAddr;
pub use data::{Chunk, Difficulty, Field, FieldState, FieldValue};
pub use error::WorldError;
pub use world::{Outcome, World, create_world};

// Re-export common types for convenience
pub use infinisweeper_common::models::{
    Cell, ChunkPos, ChunkShape, ChunkView, LocalPos, WorldParams, WorldPos,
};
