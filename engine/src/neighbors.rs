use infinisweeper_common::models::{ChunkPos, ChunkShape, LocalPos};

use crate::coords::FieldAddr;

/// Moore neighborhood offsets, in the order neighbors are reported.
pub const MOORE_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// The 8 fields around `local`, each expressed in the chunk that holds it.
///
/// Offsets that leave the chunk continue on the facing edge of the adjacent
/// chunk, so chunk borders are invisible to callers.
pub fn neighbors_of(chunk: ChunkPos, local: LocalPos, shape: ChunkShape) -> [FieldAddr; 8] {
    MOORE_OFFSETS.map(|(dx, dy)| {
        let (cx, x) = step(chunk.x, local.x, dx, shape.width);
        let (cy, y) = step(chunk.y, local.y, dy, shape.height);
        FieldAddr::new(ChunkPos::new(cx, cy), LocalPos::new(x, y))
    })
}

fn step(chunk: i64, local: usize, delta: i64, extent: usize) -> (i64, usize) {
    match delta {
        -1 if local == 0 => (chunk - 1, extent - 1),
        -1 => (chunk, local - 1),
        1 if local + 1 >= extent => (chunk + 1, 0),
        1 => (chunk, local + 1),
        _ => (chunk, local),
    }
}
