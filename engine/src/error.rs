use infinisweeper_common::models::{ChunkPos, ChunkShape, LocalPos};
use thiserror::Error;

use crate::data::MAX_CHUNK_FIELDS;

/// Recoverable failures of the engine. The world is left untouched whenever
/// one of these is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    #[error("no field at {local} in chunk {chunk}")]
    InvalidTarget { chunk: ChunkPos, local: LocalPos },
    #[error("difficulty {0} is not a probability in [0, 1]")]
    InvalidDifficulty(f64),
    #[error("chunk shape {0} has no fields")]
    EmptyChunkShape(ChunkShape),
    #[error("chunk shape {0} exceeds {max} fields", max = MAX_CHUNK_FIELDS)]
    ChunkTooLarge(ChunkShape),
    #[error("chunk {pos} has shape {actual}, world uses {expected}")]
    ShapeMismatch {
        pos: ChunkPos,
        expected: ChunkShape,
        actual: ChunkShape,
    },
    #[error("layout for chunk {pos} has {actual} fields, expected {expected}")]
    LayoutSize {
        pos: ChunkPos,
        expected: usize,
        actual: usize,
    },
    #[error("chunk {0} already exists")]
    ChunkExists(ChunkPos),
}
