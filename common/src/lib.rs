//! Types shared between the infinite minesweeper engine, its host and any
//! renderer that consumes the host's line protocol.

pub mod models;
pub mod protocol;
