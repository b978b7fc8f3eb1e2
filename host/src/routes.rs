use infinisweeper_common::{
    models::{ChunkPos, WorldParams, WorldPos},
    protocol::{ClientMessage, ServerMessage},
};
use infinisweeper_engine::World;
use tracing::{debug, info, instrument, warn};

use crate::{
    config::{HostConfig, MAX_CHUNK_EXTENT, MIN_DIFFICULTY},
    session::{Action, Session, Sessions, add_session, find_session, render_chunks},
};

/// Parses one request line and answers it. Malformed input yields an error
/// message instead of ending the stream.
pub async fn handle_line(sessions: &Sessions, config: &HostConfig, line: &str) -> ServerMessage {
    match serde_json::from_str::<ClientMessage>(line) {
        Ok(message) => {
            debug!("Received message: {:?}", message);
            handle_message(sessions, config, message).await
        }
        Err(e) => {
            warn!("Failed to parse request {:?}: {}", line, e);
            error(format!("invalid request: {e}"))
        }
    }
}

pub async fn handle_message(
    sessions: &Sessions,
    config: &HostConfig,
    message: ClientMessage,
) -> ServerMessage {
    match message {
        ClientMessage::Create { params } => {
            create_session(sessions, params.unwrap_or(config.default_params))
        }
        ClientMessage::Reveal { game, pos } => apply(sessions, game, Action::Reveal, pos).await,
        ClientMessage::Chord { game, pos } => apply(sessions, game, Action::Chord, pos).await,
        ClientMessage::Mark { game, pos } => apply(sessions, game, Action::Mark, pos).await,
        ClientMessage::Snapshot { game } => snapshot(sessions, game).await,
        ClientMessage::Close { game } => match sessions.remove(&game) {
            Some(_) => {
                info!("Closed session {}, remaining sessions: {}", game, sessions.len());
                ServerMessage::Closed { game }
            }
            None => unknown_game(&game),
        },
    }
}

#[instrument(level = "trace", skip(sessions), fields(width = params.chunk_width, height = params.chunk_height, difficulty = params.difficulty))]
fn create_session(sessions: &Sessions, params: WorldParams) -> ServerMessage {
    // Below the minimum a zero region can span the whole unbounded board.
    if params.difficulty.is_nan() || params.difficulty < MIN_DIFFICULTY {
        warn!("Rejected world with difficulty {}", params.difficulty);
        return error(format!(
            "difficulty must be at least {MIN_DIFFICULTY}, got {}",
            params.difficulty
        ));
    }
    if params.chunk_width > MAX_CHUNK_EXTENT || params.chunk_height > MAX_CHUNK_EXTENT {
        warn!(
            "Rejected world with {}x{} chunks",
            params.chunk_width, params.chunk_height
        );
        return error(format!(
            "chunk sides must be at most {MAX_CHUNK_EXTENT}, got {}x{}",
            params.chunk_width, params.chunk_height
        ));
    }

    let world = match World::new(ChunkPos::ORIGIN, &params) {
        Ok(world) => world,
        Err(e) => {
            warn!("Failed to create world: {}", e);
            return error(e.to_string());
        }
    };

    let chunks = render_chunks(&world);
    let game = add_session(sessions, Session::new(world));
    ServerMessage::Created {
        game,
        chunk_width: params.chunk_width,
        chunk_height: params.chunk_height,
        chunks,
    }
}

#[instrument(level = "trace", skip(sessions), fields(x = pos.x, y = pos.y))]
async fn apply(sessions: &Sessions, game: String, action: Action, pos: WorldPos) -> ServerMessage {
    // Clone the handle out so no map shard stays locked across the await.
    let Some(session) = find_session(sessions, &game) else {
        return unknown_game(&game);
    };

    let mut session = session.lock().await;
    match session.apply(action, pos) {
        Ok(outcome) => {
            if outcome.exploded {
                info!("Session {} exploded at {}", game, pos);
            }
            session.update_message(game, &outcome)
        }
        Err(e) => {
            warn!("Rejected {:?} at {} in session {}: {}", action, pos, game, e);
            error(e.to_string())
        }
    }
}

async fn snapshot(sessions: &Sessions, game: String) -> ServerMessage {
    let Some(session) = find_session(sessions, &game) else {
        return unknown_game(&game);
    };

    let world = session.lock().await.snapshot();
    ServerMessage::Snapshot {
        exploded: world.is_exploded(),
        chunks: render_chunks(&world),
        game,
    }
}

fn unknown_game(game: &str) -> ServerMessage {
    warn!("Request for non-existent session: {}", game);
    error(format!("unknown game: {game}"))
}

fn error(message: String) -> ServerMessage {
    ServerMessage::Error { message }
}
