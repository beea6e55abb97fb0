// Graceful shutdown module
// Waits for in-flight connections after the listener is closed

use std::time::Duration;
use tokio::time::Instant;

use crate::config::AppState;
use crate::logger;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Wait for active connections to finish, at most `grace`.
///
/// Returns the number of connections still open when the wait ended.
/// Connections left over are dropped when the runtime shuts down.
pub async fn drain_connections(state: &AppState, grace: Duration) -> usize {
    let mut remaining = state.active_connections();
    logger::log_shutdown_started(remaining);

    let deadline = Instant::now() + grace;
    while remaining > 0 && Instant::now() < deadline {
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
        remaining = state.active_connections();
    }

    logger::log_shutdown_complete(remaining);
    remaining
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::handler::build_routes;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn test_state() -> Arc<AppState> {
        let config = Config::load_from("definitely-not-a-config-file").unwrap();
        Arc::new(AppState::new(&config, build_routes().unwrap()))
    }

    #[tokio::test]
    async fn test_drain_returns_immediately_when_idle() {
        let state = test_state();
        let remaining = drain_connections(&state, Duration::from_secs(5)).await;
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn test_drain_waits_for_connections() {
        let state = test_state();
        state.active_connections.store(1, Ordering::SeqCst);

        let finisher = {
            let state = Arc::clone(&state);
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                state.active_connections.fetch_sub(1, Ordering::SeqCst);
            })
        };

        let remaining = drain_connections(&state, Duration::from_secs(5)).await;
        assert_eq!(remaining, 0);
        finisher.await.unwrap();
    }

    #[tokio::test]
    async fn test_drain_gives_up_after_grace() {
        let state = test_state();
        state.active_connections.store(2, Ordering::SeqCst);
        let remaining = drain_connections(&state, Duration::from_millis(120)).await;
        assert_eq!(remaining, 2);
    }
}
