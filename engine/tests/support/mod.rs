#![allow(dead_code)]

use std::collections::BTreeMap;

use infinisweeper_engine::{
    Chunk, ChunkPos, ChunkShape, Field, FieldAddr, FieldState, FieldValue, LocalPos, World,
    WorldParams, coords::to_world,
};

pub fn params(width: usize, height: usize, difficulty: f64) -> WorldParams {
    WorldParams {
        chunk_width: width,
        chunk_height: height,
        difficulty,
        seed: Some(7),
    }
}

/// `*` marks a mine, anything else a safe uncounted field.
pub fn layout(pos: ChunkPos, rows: &[&str]) -> Chunk {
    let shape = ChunkShape::new(rows[0].len(), rows.len());
    let fields = rows
        .iter()
        .flat_map(|row| row.chars())
        .map(|c| match c {
            '*' => Field::new(FieldValue::Mine),
            _ => Field::new(FieldValue::Uncounted),
        })
        .collect();
    Chunk::from_fields(pos, shape, fields).unwrap()
}

pub fn addr(cx: i64, cy: i64, x: usize, y: usize) -> FieldAddr {
    FieldAddr::new(ChunkPos::new(cx, cy), LocalPos::new(x, y))
}

pub fn field(world: &World, cx: i64, cy: i64, x: usize, y: usize) -> Field {
    *world.field(addr(cx, cy, x, y)).unwrap()
}

/// Every chunk keyed by position, for whole-board comparisons.
pub fn board(world: &World) -> BTreeMap<ChunkPos, Chunk> {
    world
        .chunks()
        .map(|chunk| (chunk.pos(), chunk.clone()))
        .collect()
}

/// Revealed fields keyed by world position.
pub fn revealed(world: &World) -> BTreeMap<(i64, i64), FieldValue> {
    let shape = world.shape();
    let mut revealed = BTreeMap::new();
    for chunk in world.chunks() {
        for (local, field) in chunk.iter() {
            if field.state() == FieldState::Revealed {
                let pos = to_world(chunk.pos(), local, shape);
                revealed.insert((pos.x, pos.y), field.value());
            }
        }
    }
    revealed
}

pub fn sorted(mut positions: Vec<ChunkPos>) -> Vec<ChunkPos> {
    positions.sort();
    positions
}
