use infinisweeper_common::models::{Cell, ChunkPos, ChunkShape, ChunkView, LocalPos};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    coords::{to_linear, to_local},
    error::WorldError,
};

/// Size of the Moore neighborhood, and so the largest possible count.
pub const NEIGHBORHOOD: u8 = 8;

/// Largest number of fields a single chunk may hold.
pub const MAX_CHUNK_FIELDS: usize = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    Mine,
    /// Not yet visited by a reveal, the mine count is unknown.
    Uncounted,
    Counted(u8),
}

impl FieldValue {
    /// # Panics
    ///
    /// Panics if `mines` exceeds the size of the neighborhood.
    pub fn counted(mines: u8) -> Self {
        assert!(
            mines <= NEIGHBORHOOD,
            "mine count {mines} exceeds neighborhood of {NEIGHBORHOOD}"
        );
        Self::Counted(mines)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldState {
    Hidden,
    Revealed,
    Flagged,
    Questioned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    value: FieldValue,
    state: FieldState,
    flag_count: u8,
}

impl Field {
    /// A hidden field with no flagged neighbors.
    pub const fn new(value: FieldValue) -> Self {
        Self {
            value,
            state: FieldState::Hidden,
            flag_count: 0,
        }
    }

    pub fn value(&self) -> FieldValue {
        self.value
    }

    pub fn state(&self) -> FieldState {
        self.state
    }

    /// Number of neighbors currently flagged.
    pub fn flag_count(&self) -> u8 {
        self.flag_count
    }

    pub fn is_mine(&self) -> bool {
        self.value == FieldValue::Mine
    }

    pub(crate) fn set_state(&mut self, state: FieldState) {
        self.state = state;
    }

    pub(crate) fn set_value(&mut self, value: FieldValue) {
        self.value = value;
    }

    /// # Panics
    ///
    /// Panics if the count would leave `0..=8`.
    pub(crate) fn adjust_flag_count(&mut self, delta: i8) {
        let next = i16::from(self.flag_count) + i16::from(delta);
        assert!(
            (0..=i16::from(NEIGHBORHOOD)).contains(&next),
            "flag count {next} outside 0..={NEIGHBORHOOD}"
        );
        self.flag_count = next as u8;
    }

    /// How a renderer should draw this field.
    pub fn view(&self, exploded: bool) -> Cell {
        match (self.state, self.value) {
            (FieldState::Hidden, _) => Cell::Hidden,
            (FieldState::Flagged, FieldValue::Mine) => Cell::Flagged,
            (FieldState::Flagged, _) if exploded => Cell::Misflagged,
            (FieldState::Flagged, _) => Cell::Flagged,
            (FieldState::Questioned, _) => Cell::Questioned,
            (FieldState::Revealed, FieldValue::Mine) => Cell::Mine,
            (FieldState::Revealed, FieldValue::Counted(adjacent)) => Cell::Revealed { adjacent },
            // reveals always count, so this only comes from hand-built data
            (FieldState::Revealed, FieldValue::Uncounted) => Cell::Hidden,
        }
    }
}

/// Probability that a freshly generated field is a mine.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Difficulty(f64);

impl Difficulty {
    pub fn new(probability: f64) -> Result<Self, WorldError> {
        if (0.0..=1.0).contains(&probability) {
            Ok(Self(probability))
        } else {
            Err(WorldError::InvalidDifficulty(probability))
        }
    }

    pub fn probability(self) -> f64 {
        self.0
    }
}

/// Dense grid of fields anchored at a chunk position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pos: ChunkPos,
    shape: ChunkShape,
    fields: Vec<Field>,
}

impl Chunk {
    /// Every field is independently a mine with the given probability.
    pub fn generate<R: Rng>(
        pos: ChunkPos,
        shape: ChunkShape,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Self {
        let fields = (0..shape.len())
            .map(|_| {
                if rng.random_bool(difficulty.probability()) {
                    Field::new(FieldValue::Mine)
                } else {
                    Field::new(FieldValue::Uncounted)
                }
            })
            .collect();

        Self { pos, shape, fields }
    }

    /// Chunk with a fixed layout, fields in row-major order.
    pub fn from_fields(
        pos: ChunkPos,
        shape: ChunkShape,
        fields: Vec<Field>,
    ) -> Result<Self, WorldError> {
        if fields.len() != shape.len() {
            return Err(WorldError::LayoutSize {
                pos,
                expected: shape.len(),
                actual: fields.len(),
            });
        }

        Ok(Self { pos, shape, fields })
    }

    pub fn pos(&self) -> ChunkPos {
        self.pos
    }

    pub fn shape(&self) -> ChunkShape {
        self.shape
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// `None` when `local` is outside the chunk.
    pub fn field(&self, local: LocalPos) -> Option<&Field> {
        if self.shape.contains(local) {
            self.fields.get(to_linear(local, self.shape))
        } else {
            None
        }
    }

    pub(crate) fn field_mut(&mut self, local: LocalPos) -> &mut Field {
        let index = to_linear(local, self.shape);
        &mut self.fields[index]
    }

    /// Fields paired with their local positions, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (LocalPos, &Field)> + '_ {
        let shape = self.shape;
        self.fields
            .iter()
            .enumerate()
            .map(move |(index, field)| (to_local(index, shape), field))
    }

    pub fn view(&self, exploded: bool) -> ChunkView {
        ChunkView {
            pos: self.pos,
            cells: self.fields.iter().map(|field| field.view(exploded)).collect(),
        }
    }
}
