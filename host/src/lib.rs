//! Headless host for infinite minesweeper worlds.
//!
//! Each play session owns one [`World`](infinisweeper_engine::World) behind
//! an async mutex, so actions on a session run one at a time. Requests and
//! responses are the JSON messages of [`infinisweeper_common::protocol`],
//! one per line.

pub mod cleanup;
pub mod config;
pub mod routes;
pub mod session;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
