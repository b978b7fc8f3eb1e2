use std::{sync::Arc, time::Duration};

use dashmap::DashMap;
use infinisweeper_common::{
    models::{Cell, ChunkPos, WorldParams, WorldPos},
    protocol::{CellUpdate, ClientMessage, ServerMessage},
};
use infinisweeper_host::{
    cleanup::cleanup_sessions,
    config::HostConfig,
    routes::{handle_line, handle_message},
    session::Sessions,
};

fn sessions() -> Sessions {
    Arc::new(DashMap::new())
}

fn params(difficulty: f64) -> WorldParams {
    WorldParams {
        chunk_width: 4,
        chunk_height: 4,
        difficulty,
        seed: Some(11),
    }
}

async fn create(sessions: &Sessions, params: WorldParams) -> String {
    let response = handle_message(
        sessions,
        &HostConfig::default(),
        ClientMessage::Create {
            params: Some(params),
        },
    )
    .await;
    match response {
        ServerMessage::Created { game, .. } => game,
        other => panic!("expected created, got {other:?}"),
    }
}

async fn send(sessions: &Sessions, message: ClientMessage) -> ServerMessage {
    handle_message(sessions, &HostConfig::default(), message).await
}

#[tokio::test]
async fn create_returns_hidden_origin_chunk() {
    let sessions = sessions();
    let response = send(
        &sessions,
        ClientMessage::Create {
            params: Some(params(0.2)),
        },
    )
    .await;

    let ServerMessage::Created {
        game,
        chunk_width,
        chunk_height,
        chunks,
    } = response
    else {
        panic!("expected created");
    };
    assert!(sessions.contains_key(&game));
    assert_eq!((chunk_width, chunk_height), (4, 4));
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].pos, ChunkPos::ORIGIN);
    assert!(chunks[0].cells.iter().all(|cell| *cell == Cell::Hidden));
}

#[tokio::test]
async fn mark_snapshot_and_close() {
    let sessions = sessions();
    let game = create(&sessions, params(0.2)).await;

    let response = send(
        &sessions,
        ClientMessage::Mark {
            game: game.clone(),
            pos: WorldPos::new(0, 0),
        },
    )
    .await;
    let ServerMessage::Update {
        updates,
        chunks,
        exploded,
        ..
    } = response
    else {
        panic!("expected update");
    };
    assert_eq!(
        updates,
        vec![CellUpdate {
            pos: WorldPos::new(0, 0),
            value: Cell::Flagged,
        }]
    );
    // neighbor counting pulls in the three chunks around the corner
    assert_eq!(chunks.len(), 3);
    assert!(!exploded);

    let ServerMessage::Snapshot {
        exploded, chunks, ..
    } = send(&sessions, ClientMessage::Snapshot { game: game.clone() }).await
    else {
        panic!("expected snapshot");
    };
    assert!(!exploded);
    assert_eq!(chunks.len(), 4);
    let origin = chunks
        .iter()
        .find(|chunk| chunk.pos == ChunkPos::ORIGIN)
        .expect("origin chunk");
    assert_eq!(origin.cells[0], Cell::Flagged);

    assert_eq!(
        send(&sessions, ClientMessage::Close { game: game.clone() }).await,
        ServerMessage::Closed { game: game.clone() }
    );
    assert!(sessions.is_empty());
    assert!(matches!(
        send(&sessions, ClientMessage::Snapshot { game }).await,
        ServerMessage::Error { .. }
    ));
}

#[tokio::test]
async fn reveal_on_mine_explodes_session() {
    let sessions = sessions();
    let game = create(&sessions, params(1.0)).await;

    let ServerMessage::Update {
        updates, exploded, ..
    } = send(
        &sessions,
        ClientMessage::Reveal {
            game: game.clone(),
            pos: WorldPos::new(1, 2),
        },
    )
    .await
    else {
        panic!("expected update");
    };
    assert!(exploded);
    assert_eq!(updates.len(), 16);
    assert!(updates.iter().all(|update| update.value == Cell::Mine));

    let after = send(
        &sessions,
        ClientMessage::Chord {
            game,
            pos: WorldPos::new(0, 0),
        },
    )
    .await;
    let ServerMessage::Update {
        updates, exploded, ..
    } = after
    else {
        panic!("expected update");
    };
    assert!(exploded);
    assert!(updates.is_empty());
}

#[tokio::test]
async fn actions_outside_known_chunks_are_errors() {
    let sessions = sessions();
    let game = create(&sessions, params(0.2)).await;

    let response = send(
        &sessions,
        ClientMessage::Reveal {
            game,
            pos: WorldPos::new(100, -100),
        },
    )
    .await;
    assert!(matches!(response, ServerMessage::Error { .. }));
}

#[tokio::test]
async fn unknown_game_is_an_error() {
    let sessions = sessions();
    let response = send(
        &sessions,
        ClientMessage::Mark {
            game: "missing".to_string(),
            pos: WorldPos::new(0, 0),
        },
    )
    .await;
    let ServerMessage::Error { message } = response else {
        panic!("expected error");
    };
    assert!(message.contains("missing"));
}

#[tokio::test]
async fn zero_difficulty_is_rejected() {
    let sessions = sessions();
    let response = send(
        &sessions,
        ClientMessage::Create {
            params: Some(params(0.0)),
        },
    )
    .await;
    assert!(matches!(response, ServerMessage::Error { .. }));
    assert!(sessions.is_empty());

    let response = send(
        &sessions,
        ClientMessage::Create {
            params: Some(params(1.5)),
        },
    )
    .await;
    assert!(matches!(response, ServerMessage::Error { .. }));
}

#[tokio::test]
async fn oversized_chunks_and_sparse_mines_are_rejected() {
    let sessions = sessions();
    let config = HostConfig::default();

    for line in [
        r#"{"action":"create","params":{"chunk_width":8589934592,"chunk_height":8589934592,"difficulty":0.2}}"#,
        r#"{"action":"create","params":{"chunk_width":1048576,"chunk_height":1048576,"difficulty":0.2}}"#,
        r#"{"action":"create","params":{"chunk_width":4,"chunk_height":257,"difficulty":0.2}}"#,
        r#"{"action":"create","params":{"chunk_width":4,"chunk_height":4,"difficulty":1e-12}}"#,
        r#"{"action":"create","params":{"chunk_width":4,"chunk_height":4,"difficulty":0.05}}"#,
    ] {
        let response = handle_line(&sessions, &config, line).await;
        assert!(
            matches!(response, ServerMessage::Error { .. }),
            "line {line:?} gave {response:?}"
        );
    }
    assert!(sessions.is_empty());

    let response = handle_line(
        &sessions,
        &config,
        r#"{"action":"create","params":{"chunk_width":256,"chunk_height":256,"difficulty":0.1}}"#,
    )
    .await;
    assert!(matches!(response, ServerMessage::Created { .. }));
}

#[tokio::test]
async fn seeded_worlds_replay_identically() {
    let first = sessions();
    let second = sessions();

    let mut rendered = Vec::new();
    for sessions in [&first, &second] {
        let game = create(sessions, params(0.3)).await;
        send(
            sessions,
            ClientMessage::Reveal {
                game: game.clone(),
                pos: WorldPos::new(2, 1),
            },
        )
        .await;
        let ServerMessage::Snapshot { chunks, .. } =
            send(sessions, ClientMessage::Snapshot { game }).await
        else {
            panic!("expected snapshot");
        };
        rendered.push(chunks);
    }

    assert_eq!(rendered[0], rendered[1]);
}

#[tokio::test]
async fn lines_are_parsed_and_malformed_lines_answered() {
    let sessions = sessions();
    let config = HostConfig::default();

    let response = handle_line(
        &sessions,
        &config,
        r#"{"action":"create","params":{"chunk_width":8,"chunk_height":8,"difficulty":0.1,"seed":3}}"#,
    )
    .await;
    assert!(matches!(
        response,
        ServerMessage::Created {
            chunk_width: 8,
            chunk_height: 8,
            ..
        }
    ));

    for line in ["not json", r#"{"action":"explode"}"#, r#"{"action":"reveal"}"#] {
        let response = handle_line(&sessions, &config, line).await;
        assert!(
            matches!(response, ServerMessage::Error { .. }),
            "line {line:?} gave {response:?}"
        );
    }
}

#[tokio::test]
async fn create_without_params_uses_configured_defaults() {
    let sessions = sessions();
    let mut config = HostConfig::default();
    config.default_params.chunk_width = 6;
    config.default_params.chunk_height = 5;

    let response = handle_line(&sessions, &config, r#"{"action":"create"}"#).await;
    let ServerMessage::Created {
        chunk_width,
        chunk_height,
        chunks,
        ..
    } = response
    else {
        panic!("expected created");
    };
    assert_eq!((chunk_width, chunk_height), (6, 5));
    assert_eq!(chunks[0].cells.len(), 30);
}

#[tokio::test]
async fn cleanup_drops_idle_sessions() {
    let sessions = sessions();
    create(&sessions, params(0.2)).await;
    create(&sessions, params(0.2)).await;

    assert_eq!(cleanup_sessions(&sessions, Duration::from_secs(600)), 0);
    assert_eq!(sessions.len(), 2);

    tokio::time::sleep(Duration::from_millis(5)).await;
    assert_eq!(cleanup_sessions(&sessions, Duration::ZERO), 2);
    assert!(sessions.is_empty());
}
