use std::{
    collections::{HashMap, hash_map::Entry},
    sync::Arc,
};

use infinisweeper_common::models::{ChunkPos, ChunkShape};
use rand::rngs::StdRng;
use tracing::debug;

use crate::{
    data::{Chunk, Difficulty},
    error::WorldError,
};

/// Sparse map of chunks, generated on first reference and never removed.
///
/// Chunks sit behind `Arc` so a cloned store shares them; mutation goes
/// through [`Arc::make_mut`] and copies only the chunks it touches.
#[derive(Debug, Clone)]
pub struct ChunkStore {
    shape: ChunkShape,
    chunks: HashMap<ChunkPos, Arc<Chunk>>,
    rng: StdRng,
    generated: Vec<ChunkPos>,
}

impl ChunkStore {
    pub fn new(shape: ChunkShape, rng: StdRng) -> Self {
        Self {
            shape,
            chunks: HashMap::new(),
            rng,
            generated: Vec::new(),
        }
    }

    pub fn shape(&self) -> ChunkShape {
        self.shape
    }

    pub fn get(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&pos).map(Arc::as_ref)
    }

    /// The chunk at `pos`, generating it first if it does not exist yet.
    pub fn ensure(&mut self, pos: ChunkPos, difficulty: Difficulty) -> &Chunk {
        self.slot(pos, difficulty)
    }

    pub(crate) fn ensure_mut(&mut self, pos: ChunkPos, difficulty: Difficulty) -> &mut Chunk {
        Arc::make_mut(self.slot(pos, difficulty))
    }

    pub fn get_mut(&mut self, pos: ChunkPos) -> Option<&mut Chunk> {
        self.chunks.get_mut(&pos).map(Arc::make_mut)
    }

    /// Adds a chunk built elsewhere. Existing chunks are never replaced.
    pub fn insert(&mut self, chunk: Chunk) -> Result<(), WorldError> {
        let pos = chunk.pos();
        if chunk.shape() != self.shape {
            return Err(WorldError::ShapeMismatch {
                pos,
                expected: self.shape,
                actual: chunk.shape(),
            });
        }

        match self.chunks.entry(pos) {
            Entry::Occupied(_) => Err(WorldError::ChunkExists(pos)),
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(chunk));
                Ok(())
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chunk> + '_ {
        self.chunks.values().map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub(crate) fn slots_mut(&mut self) -> impl Iterator<Item = &mut Arc<Chunk>> + '_ {
        self.chunks.values_mut()
    }

    /// Positions of chunks generated since the last call.
    pub(crate) fn drain_generated(&mut self) -> Vec<ChunkPos> {
        std::mem::take(&mut self.generated)
    }

    fn slot(&mut self, pos: ChunkPos, difficulty: Difficulty) -> &mut Arc<Chunk> {
        match self.chunks.entry(pos) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                debug!("Generating chunk {}", pos);
                self.generated.push(pos);
                let chunk = Chunk::generate(pos, self.shape, difficulty, &mut self.rng);
                entry.insert(Arc::new(chunk))
            }
        }
    }
}
