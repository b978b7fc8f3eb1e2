use std::sync::Arc;

use dashmap::DashMap;
use infinisweeper_host::{
    cleanup::start_cleanup_task, config::HostConfig, routes::handle_line, session::Sessions,
};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};

#[tokio::main]
async fn main() -> infinisweeper_host::Result<()> {
    // stdout carries the protocol, logs go to stderr
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    info!("Starting infinisweeper host");

    let config = HostConfig::from_env();
    let sessions: Sessions = Arc::new(DashMap::new());

    let sessions_for_cleanup = sessions.clone();
    let (interval, timeout) = (config.cleanup_interval, config.inactive_timeout);
    tokio::spawn(async move {
        start_cleanup_task(sessions_for_cleanup, interval, timeout).await;
    });

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_line(&sessions, &config, &line).await;
        match serde_json::to_string(&response) {
            Ok(json) => {
                stdout.write_all(json.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
            Err(e) => error!("Failed to serialize response: {}", e),
        }
    }

    info!("Input closed, shutting down");
    Ok(())
}
