use std::fmt;

use serde::{Deserialize, Serialize};

/// What a renderer draws for a single field.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "state")]
pub enum Cell {
    #[serde(rename = "hidden")]
    Hidden,
    #[serde(rename = "flagged")]
    Flagged,
    #[serde(rename = "questioned")]
    Questioned,
    #[serde(rename = "revealed")]
    Revealed { adjacent: u8 },
    #[serde(rename = "mine")]
    Mine,
    /// A flag left on a safe field, only shown once the world exploded.
    #[serde(rename = "misflagged")]
    Misflagged,
}

/// Absolute field position on the infinite board.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldPos {
    pub x: i64,
    pub y: i64,
}

impl WorldPos {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Position of a chunk in the chunk grid.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkPos {
    pub x: i64,
    pub y: i64,
}

impl ChunkPos {
    pub const ORIGIN: ChunkPos = ChunkPos { x: 0, y: 0 };

    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Position of a field inside its chunk, `0 <= x < width`, `0 <= y < height`.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LocalPos {
    pub x: usize,
    pub y: usize,
}

impl LocalPos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for WorldPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl fmt::Display for LocalPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Extent of every chunk in a world.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkShape {
    pub width: usize,
    pub height: usize,
}

impl ChunkShape {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Number of fields in one chunk.
    ///
    /// # Panics
    ///
    /// Panics on overflow. Use [`ChunkShape::checked_len`] for shapes that
    /// have not been validated.
    pub const fn len(&self) -> usize {
        self.width * self.height
    }

    /// Number of fields in one chunk, `None` if it does not fit in `usize`.
    pub const fn checked_len(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub const fn contains(&self, local: LocalPos) -> bool {
        local.x < self.width && local.y < self.height
    }
}

impl fmt::Display for ChunkShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl Default for ChunkShape {
    fn default() -> Self {
        Self::new(16, 16)
    }
}

/// Parameters a world is created with.
///
/// `difficulty` is the probability that any freshly generated field is a
/// mine. A `seed` makes mine placement reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WorldParams {
    pub chunk_width: usize,
    pub chunk_height: usize,
    pub difficulty: f64,
    pub seed: Option<u64>,
}

impl WorldParams {
    pub fn shape(&self) -> ChunkShape {
        ChunkShape::new(self.chunk_width, self.chunk_height)
    }
}

impl Default for WorldParams {
    fn default() -> Self {
        let shape = ChunkShape::default();
        Self {
            chunk_width: shape.width,
            chunk_height: shape.height,
            difficulty: 0.1,
            seed: None,
        }
    }
}

/// Rendered contents of one chunk, cells in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChunkView {
    pub pos: ChunkPos,
    pub cells: Vec<Cell>,
}
