use std::time::Duration;

use tokio::time;
use tracing::{debug, info};

use crate::session::Sessions;

pub async fn start_cleanup_task(sessions: Sessions, interval: Duration, inactive_timeout: Duration) {
    let mut ticker = time::interval(interval);

    info!(
        "Started session cleanup task: checking every {}s, inactive timeout: {}s",
        interval.as_secs(),
        inactive_timeout.as_secs()
    );

    loop {
        ticker.tick().await;
        cleanup_sessions(&sessions, inactive_timeout);
    }
}

/// Drops every session idle for longer than `inactive_timeout` and returns
/// how many went. Sessions locked by a running action are skipped.
pub fn cleanup_sessions(sessions: &Sessions, inactive_timeout: Duration) -> usize {
    let mut to_remove = Vec::new();

    for entry in sessions.iter() {
        if let Ok(session) = entry.value().try_lock()
            && session.should_cleanup(inactive_timeout)
        {
            to_remove.push(entry.key().clone());
        }
    }

    let removed = to_remove.len();
    for id in to_remove {
        sessions.remove(&id);
        debug!("Cleaned up session: {}", id);
    }

    if removed > 0 {
        info!("Cleaned up {} inactive sessions", removed);
    }
    removed
}
