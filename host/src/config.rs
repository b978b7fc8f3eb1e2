use std::{env, str::FromStr, time::Duration};

use infinisweeper_common::models::WorldParams;

/// Smallest mine probability the host accepts. Below roughly this density
/// the zero fields of a generated board percolate and a single reveal never
/// finishes.
pub const MIN_DIFFICULTY: f64 = 0.1;

/// Largest chunk side the host accepts.
pub const MAX_CHUNK_EXTENT: usize = 256;

/// Host settings, read from the environment with fallbacks.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Used for `create` requests that carry no parameters.
    pub default_params: WorldParams,
    pub cleanup_interval: Duration,
    pub inactive_timeout: Duration,
}

impl HostConfig {
    pub fn from_env() -> Self {
        let defaults = WorldParams::default();
        let chunk_size: usize = env_or("INFINISWEEPER_CHUNK_SIZE", defaults.chunk_width);
        let difficulty: f64 = env_or("INFINISWEEPER_DIFFICULTY", defaults.difficulty);
        let cleanup_interval_secs: u64 = env_or("CLEANUP_INTERVAL_SECONDS", 60);
        let inactive_timeout_secs: u64 = env_or("INACTIVE_GAME_TIMEOUT_SECONDS", 600);

        Self {
            default_params: WorldParams {
                chunk_width: chunk_size,
                chunk_height: chunk_size,
                difficulty,
                seed: None,
            },
            cleanup_interval: Duration::from_secs(cleanup_interval_secs),
            inactive_timeout: Duration::from_secs(inactive_timeout_secs),
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            default_params: WorldParams::default(),
            cleanup_interval: Duration::from_secs(60),
            inactive_timeout: Duration::from_secs(600),
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
