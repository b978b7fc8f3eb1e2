use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::{DashMap, Entry};
use infinisweeper_common::{
    models::{ChunkView, WorldPos},
    protocol::{CellUpdate, ServerMessage},
};
use infinisweeper_engine::{Outcome, World, WorldError, coords::to_world};
use nanoid::nanoid;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

pub type Sessions = Arc<DashMap<String, Arc<Mutex<Session>>>>;

/// Player actions a session accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Reveal,
    Chord,
    Mark,
}

/// One world and the time it was last touched.
pub struct Session {
    world: World,
    last_activity: Instant,
}

impl Session {
    pub fn new(world: World) -> Self {
        Self {
            world,
            last_activity: Instant::now(),
        }
    }

    /// Independent copy of the world, cheap to take.
    pub fn snapshot(&self) -> World {
        self.world.clone()
    }

    #[instrument(level = "trace", skip(self), fields(x = pos.x, y = pos.y))]
    pub fn apply(&mut self, action: Action, pos: WorldPos) -> Result<Outcome, WorldError> {
        self.last_activity = Instant::now();
        match action {
            Action::Reveal => self.world.reveal_at(pos),
            Action::Chord => self.world.chord_at(pos),
            Action::Mark => self.world.toggle_mark_at(pos),
        }
    }

    /// Update message describing `outcome`.
    pub fn update_message(&self, game: String, outcome: &Outcome) -> ServerMessage {
        let shape = self.world.shape();
        let exploded = self.world.is_exploded();

        let updates = outcome
            .changed
            .iter()
            .filter_map(|addr| {
                self.world.field(*addr).map(|field| CellUpdate {
                    pos: to_world(addr.chunk, addr.local, shape),
                    value: field.view(exploded),
                })
            })
            .collect();
        let chunks = outcome
            .created
            .iter()
            .filter_map(|pos| self.world.chunk_view(*pos))
            .collect();

        ServerMessage::Update {
            game,
            updates,
            chunks,
            exploded,
        }
    }

    pub fn should_cleanup(&self, inactive_timeout: Duration) -> bool {
        self.last_activity.elapsed() > inactive_timeout
    }
}

/// Views of every chunk in `world`, ordered by position.
pub fn render_chunks(world: &World) -> Vec<ChunkView> {
    let mut positions: Vec<_> = world.chunks().map(|chunk| chunk.pos()).collect();
    positions.sort();
    positions
        .into_iter()
        .filter_map(|pos| world.chunk_view(pos))
        .collect()
}

/// Stores `session` under a fresh id, growing the id on repeated collisions.
pub fn add_session(sessions: &Sessions, session: Session) -> String {
    let mut id_length = 5;
    let max_attempts_per_length = 10;

    loop {
        for _ in 0..max_attempts_per_length {
            let id = nanoid!(id_length);
            match sessions.entry(id.clone()) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(entry) => {
                    entry.insert(Arc::new(Mutex::new(session)));
                    info!("Session {} added, total sessions: {}", id, sessions.len());
                    return id;
                }
            }
        }

        debug!("No free session id of length {}", id_length);
        id_length += 1;
    }
}

pub fn find_session(sessions: &Sessions, id: &str) -> Option<Arc<Mutex<Session>>> {
    sessions.get(id).map(|entry| entry.value().clone())
}
