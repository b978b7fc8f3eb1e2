use serde::{Deserialize, Serialize};

use crate::models::{Cell, ChunkView, WorldParams, WorldPos};

/// One request line read by the host.
#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "action")]
pub enum ClientMessage {
    #[serde(rename = "create")]
    Create {
        #[serde(default)]
        params: Option<WorldParams>,
    },
    #[serde(rename = "reveal")]
    Reveal { game: String, pos: WorldPos },
    #[serde(rename = "chord")]
    Chord { game: String, pos: WorldPos },
    #[serde(rename = "mark")]
    Mark { game: String, pos: WorldPos },
    #[serde(rename = "snapshot")]
    Snapshot { game: String },
    #[serde(rename = "close")]
    Close { game: String },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CellUpdate {
    pub pos: WorldPos,
    pub value: Cell,
}

/// One response line written by the host.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "created")]
    Created {
        game: String,
        chunk_width: usize,
        chunk_height: usize,
        chunks: Vec<ChunkView>,
    },
    #[serde(rename = "update")]
    Update {
        game: String,
        updates: Vec<CellUpdate>,
        /// Chunks generated by this action.
        chunks: Vec<ChunkView>,
        exploded: bool,
    },
    #[serde(rename = "snapshot")]
    Snapshot {
        game: String,
        exploded: bool,
        chunks: Vec<ChunkView>,
    },
    #[serde(rename = "closed")]
    Closed { game: String },
    #[serde(rename = "error")]
    Error { message: String },
}
