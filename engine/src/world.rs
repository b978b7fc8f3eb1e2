use std::sync::Arc;

use infinisweeper_common::models::{
    Cell, ChunkPos, ChunkShape, ChunkView, LocalPos, WorldParams, WorldPos,
};
use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info, instrument, warn};

use crate::{
    coords::{FieldAddr, split},
    data::{Chunk, Difficulty, Field, FieldState, FieldValue, MAX_CHUNK_FIELDS},
    error::WorldError,
    neighbors::neighbors_of,
    store::ChunkStore,
};

/// What a single action changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Fields whose rendered cell changed, in the order they changed.
    pub changed: Vec<FieldAddr>,
    /// Chunks generated while the action ran.
    pub created: Vec<ChunkPos>,
    /// Whether this action set off a mine.
    pub exploded: bool,
}

impl Outcome {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.created.is_empty() && !self.exploded
    }
}

/// The whole board: every chunk generated so far and whether a mine went off.
///
/// Cloning is cheap and yields an independent snapshot, chunks are copied
/// only when a later action writes to them.
#[derive(Debug, Clone)]
pub struct World {
    store: ChunkStore,
    difficulty: Difficulty,
    exploded: bool,
}

impl World {
    /// A world holding exactly one generated chunk at `seed_chunk`.
    pub fn new(seed_chunk: ChunkPos, params: &WorldParams) -> Result<Self, WorldError> {
        let mut world = Self::empty(params)?;
        world.store.ensure(seed_chunk, world.difficulty);
        world.store.drain_generated();

        info!(
            "Created world at chunk {} with {} chunks and difficulty {}",
            seed_chunk,
            world.shape(),
            world.difficulty()
        );
        Ok(world)
    }

    /// A world made of prebuilt chunks. Chunks outside them are still
    /// generated on demand with the difficulty from `params`.
    pub fn from_chunks(
        params: &WorldParams,
        chunks: impl IntoIterator<Item = Chunk>,
    ) -> Result<Self, WorldError> {
        let mut world = Self::empty(params)?;
        for chunk in chunks {
            world.store.insert(chunk)?;
        }
        Ok(world)
    }

    fn empty(params: &WorldParams) -> Result<Self, WorldError> {
        let shape = params.shape();
        if shape.is_empty() {
            return Err(WorldError::EmptyChunkShape(shape));
        }
        if shape.checked_len().is_none_or(|len| len > MAX_CHUNK_FIELDS) {
            return Err(WorldError::ChunkTooLarge(shape));
        }
        let difficulty = Difficulty::new(params.difficulty)?;
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        Ok(Self {
            store: ChunkStore::new(shape, rng),
            difficulty,
            exploded: false,
        })
    }

    pub fn is_exploded(&self) -> bool {
        self.exploded
    }

    pub fn difficulty(&self) -> f64 {
        self.difficulty.probability()
    }

    pub fn shape(&self) -> ChunkShape {
        self.store.shape()
    }

    pub fn chunk(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.store.get(pos)
    }

    /// Every chunk generated so far, in no particular order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> + '_ {
        self.store.iter()
    }

    pub fn chunk_count(&self) -> usize {
        self.store.len()
    }

    pub fn field(&self, addr: FieldAddr) -> Option<&Field> {
        self.store.get(addr.chunk)?.field(addr.local)
    }

    pub fn field_at(&self, pos: WorldPos) -> Option<&Field> {
        self.field(split(pos, self.shape()))
    }

    pub fn cell(&self, addr: FieldAddr) -> Option<Cell> {
        self.field(addr).map(|field| field.view(self.exploded))
    }

    pub fn chunk_view(&self, pos: ChunkPos) -> Option<ChunkView> {
        self.store.get(pos).map(|chunk| chunk.view(self.exploded))
    }

    #[instrument(level = "trace", skip(self), fields(cx = chunk.x, cy = chunk.y, x = local.x, y = local.y))]
    pub fn reveal(&mut self, chunk: ChunkPos, local: LocalPos) -> Result<Outcome, WorldError> {
        if self.exploded {
            debug!("Ignoring reveal on exploded world");
            return Ok(Outcome::default());
        }

        let (target, _) = self.target(chunk, local)?;
        let mut outcome = Outcome::default();
        self.reveal_fields(vec![target], &mut outcome);
        Ok(self.finish(outcome))
    }

    /// Reveals the neighbors of a revealed field whose flags match its count,
    /// or reveals the field itself if it is not revealed yet.
    #[instrument(level = "trace", skip(self), fields(cx = chunk.x, cy = chunk.y, x = local.x, y = local.y))]
    pub fn chord(&mut self, chunk: ChunkPos, local: LocalPos) -> Result<Outcome, WorldError> {
        if self.exploded {
            debug!("Ignoring chord on exploded world");
            return Ok(Outcome::default());
        }

        let (target, field) = self.target(chunk, local)?;
        let mut outcome = Outcome::default();

        match (field.state(), field.value()) {
            (FieldState::Revealed, FieldValue::Counted(mines)) if field.flag_count() == mines => {
                let mut pending = neighbors_of(chunk, local, self.shape()).to_vec();
                pending.reverse();
                self.reveal_fields(pending, &mut outcome);
            }
            (FieldState::Revealed, _) => {
                debug!(
                    "Chord on {} in chunk {} not satisfied ({} flags)",
                    local,
                    chunk,
                    field.flag_count()
                );
            }
            (FieldState::Hidden | FieldState::Flagged | FieldState::Questioned, _) => {
                self.reveal_fields(vec![target], &mut outcome);
            }
        }

        Ok(self.finish(outcome))
    }

    /// Cycles `Hidden -> Flagged -> Questioned -> Hidden`, keeping the
    /// neighbors' flag counts in step.
    #[instrument(level = "trace", skip(self), fields(cx = chunk.x, cy = chunk.y, x = local.x, y = local.y))]
    pub fn toggle_mark(&mut self, chunk: ChunkPos, local: LocalPos) -> Result<Outcome, WorldError> {
        if self.exploded {
            debug!("Ignoring mark on exploded world");
            return Ok(Outcome::default());
        }

        let (target, field) = self.target(chunk, local)?;
        let mut outcome = Outcome::default();

        let (next, delta) = match field.state() {
            FieldState::Hidden => (FieldState::Flagged, 1),
            FieldState::Flagged => (FieldState::Questioned, -1),
            FieldState::Questioned => (FieldState::Hidden, 0),
            FieldState::Revealed => {
                debug!("Ignoring mark on revealed field {} in chunk {}", local, chunk);
                return Ok(outcome);
            }
        };

        self.field_mut(target).set_state(next);
        outcome.changed.push(target);
        debug!("Field {} in chunk {} is now {:?}", local, chunk, next);

        if delta != 0 {
            for neighbor in neighbors_of(chunk, local, self.shape()) {
                self.field_mut(neighbor).adjust_flag_count(delta);
            }
        }

        Ok(self.finish(outcome))
    }

    pub fn reveal_at(&mut self, pos: WorldPos) -> Result<Outcome, WorldError> {
        let addr = split(pos, self.shape());
        self.reveal(addr.chunk, addr.local)
    }

    pub fn chord_at(&mut self, pos: WorldPos) -> Result<Outcome, WorldError> {
        let addr = split(pos, self.shape());
        self.chord(addr.chunk, addr.local)
    }

    pub fn toggle_mark_at(&mut self, pos: WorldPos) -> Result<Outcome, WorldError> {
        let addr = split(pos, self.shape());
        self.toggle_mark(addr.chunk, addr.local)
    }

    /// Direct actions may only address chunks that already exist.
    fn target(&self, chunk: ChunkPos, local: LocalPos) -> Result<(FieldAddr, Field), WorldError> {
        match self.store.get(chunk).and_then(|found| found.field(local)) {
            Some(field) => Ok((FieldAddr::new(chunk, local), *field)),
            None => {
                warn!("Invalid target {} in chunk {}", local, chunk);
                Err(WorldError::InvalidTarget { chunk, local })
            }
        }
    }

    fn field_mut(&mut self, addr: FieldAddr) -> &mut Field {
        self.store
            .ensure_mut(addr.chunk, self.difficulty)
            .field_mut(addr.local)
    }

    /// Flood fill over an explicit stack. Fields are revealed in the order
    /// they are popped, so callers push in reverse to visit in order.
    fn reveal_fields(&mut self, mut pending: Vec<FieldAddr>, outcome: &mut Outcome) {
        let shape = self.shape();

        while let Some(addr) = pending.pop() {
            let value = {
                let field = self.field_mut(addr);
                if field.state() != FieldState::Hidden {
                    continue;
                }
                field.set_state(FieldState::Revealed);
                field.value()
            };
            outcome.changed.push(addr);

            match value {
                FieldValue::Mine => {
                    self.explode(addr, outcome);
                    return;
                }
                FieldValue::Counted(mines) => {
                    debug!(
                        "Field {} in chunk {} was already counted ({})",
                        addr.local, addr.chunk, mines
                    );
                }
                FieldValue::Uncounted => {
                    let mines = self.count_mines(addr);
                    self.field_mut(addr).set_value(FieldValue::counted(mines));
                    if mines == 0 {
                        let neighbors = neighbors_of(addr.chunk, addr.local, shape);
                        pending.extend(neighbors.into_iter().rev());
                    }
                }
            }
        }
    }

    fn count_mines(&mut self, addr: FieldAddr) -> u8 {
        let mut mines = 0;
        for neighbor in neighbors_of(addr.chunk, addr.local, self.shape()) {
            let chunk = self.store.ensure(neighbor.chunk, self.difficulty);
            if chunk.field(neighbor.local).is_some_and(Field::is_mine) {
                mines += 1;
            }
        }
        mines
    }

    /// Reveals the hidden mines of every existing chunk. Chunks that were
    /// never generated stay that way.
    fn explode(&mut self, trigger: FieldAddr, outcome: &mut Outcome) {
        warn!(
            "Mine hit at {} in chunk {} - world exploded",
            trigger.local, trigger.chunk
        );
        self.exploded = true;
        outcome.exploded = true;

        let before = outcome.changed.len();
        for slot in self.store.slots_mut() {
            let pos = slot.pos();
            outcome.changed.extend(
                slot.iter()
                    .filter(|(_, field)| field.state() == FieldState::Flagged && !field.is_mine())
                    .map(|(local, _)| FieldAddr::new(pos, local)),
            );

            let hidden_mine = |field: &Field| field.state() == FieldState::Hidden && field.is_mine();
            if !slot.fields().iter().any(hidden_mine) {
                continue;
            }

            let chunk = Arc::make_mut(slot);
            let locals: Vec<LocalPos> = chunk
                .iter()
                .filter(|(_, field)| hidden_mine(*field))
                .map(|(local, _)| local)
                .collect();
            for local in locals {
                chunk.field_mut(local).set_state(FieldState::Revealed);
                outcome.changed.push(FieldAddr::new(pos, local));
            }
        }

        info!(
            "Explosion exposed {} fields",
            outcome.changed.len() - before
        );
    }

    fn finish(&mut self, mut outcome: Outcome) -> Outcome {
        outcome.created = self.store.drain_generated();
        if !outcome.is_empty() {
            debug!(
                "Action changed {} fields and generated {} chunks",
                outcome.changed.len(),
                outcome.created.len()
            );
        }
        outcome
    }
}

/// Creates a world holding one chunk at `seed_chunk`.
pub fn create_world(seed_chunk: ChunkPos, params: &WorldParams) -> Result<World, WorldError> {
    World::new(seed_chunk, params)
}

/// Snapshot form of [`World::reveal`]: `world` is left as it was.
pub fn reveal(world: &World, chunk: ChunkPos, local: LocalPos) -> Result<World, WorldError> {
    let mut next = world.clone();
    next.reveal(chunk, local)?;
    Ok(next)
}

/// Snapshot form of [`World::chord`].
pub fn chord(world: &World, chunk: ChunkPos, local: LocalPos) -> Result<World, WorldError> {
    let mut next = world.clone();
    next.chord(chunk, local)?;
    Ok(next)
}

/// Snapshot form of [`World::toggle_mark`].
pub fn toggle_mark(world: &World, chunk: ChunkPos, local: LocalPos) -> Result<World, WorldError> {
    let mut next = world.clone();
    next.toggle_mark(chunk, local)?;
    Ok(next)
}
