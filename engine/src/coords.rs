//! Conversions between world space, chunk space and linear field indices.
//!
//! World positions are split with floor division and Euclidean remainder, so
//! negative world coordinates land in negative chunks with non-negative local
//! offsets.

use infinisweeper_common::models::{ChunkPos, ChunkShape, LocalPos, WorldPos};

/// One field, addressed by its chunk and its offset inside that chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldAddr {
    pub chunk: ChunkPos,
    pub local: LocalPos,
}

impl FieldAddr {
    pub const fn new(chunk: ChunkPos, local: LocalPos) -> Self {
        Self { chunk, local }
    }
}

/// Row-major index of `local` inside a chunk.
///
/// # Panics
///
/// Panics if `local` lies outside `shape`.
pub fn to_linear(local: LocalPos, shape: ChunkShape) -> usize {
    assert!(
        shape.contains(local),
        "local position {local} outside {shape} chunk"
    );
    local.y * shape.width + local.x
}

/// Inverse of [`to_linear`].
///
/// # Panics
///
/// Panics if `index` is not below `shape.len()`.
pub fn to_local(index: usize, shape: ChunkShape) -> LocalPos {
    assert!(
        index < shape.len(),
        "field index {index} outside {shape} chunk"
    );
    LocalPos::new(index % shape.width, index / shape.width)
}

pub fn world_to_chunk(pos: WorldPos, shape: ChunkShape) -> ChunkPos {
    ChunkPos::new(
        pos.x.div_euclid(extent(shape.width)),
        pos.y.div_euclid(extent(shape.height)),
    )
}

pub fn world_to_local(pos: WorldPos, shape: ChunkShape) -> LocalPos {
    LocalPos::new(
        pos.x.rem_euclid(extent(shape.width)) as usize,
        pos.y.rem_euclid(extent(shape.height)) as usize,
    )
}

pub fn split(pos: WorldPos, shape: ChunkShape) -> FieldAddr {
    FieldAddr::new(world_to_chunk(pos, shape), world_to_local(pos, shape))
}

pub fn to_world(chunk: ChunkPos, local: LocalPos, shape: ChunkShape) -> WorldPos {
    WorldPos::new(
        chunk.x * extent(shape.width) + local.x as i64,
        chunk.y * extent(shape.height) + local.y as i64,
    )
}

fn extent(len: usize) -> i64 {
    len as i64
}
