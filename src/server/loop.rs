// Server loop module
// Accepts connections until shutdown is requested, then drains

use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::shutdown::drain_connections;
use super::signal::SignalHandler;
use crate::config::AppState;
use crate::logger;

/// Accept loop for the application listener
///
/// Returns once shutdown has been requested and active connections have
/// drained (or `performance.shutdown_timeout` has elapsed).
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    signals: Arc<SignalHandler>,
) {
    // Created before the flag check so a notification in between is not lost
    let shutdown = signals.shutdown.notified();
    tokio::pin!(shutdown);

    if !signals.is_shutdown_requested() {
        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, peer_addr)) => {
                            accept_connection(stream, peer_addr, &state, &signals);
                        }
                        Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                    }
                }

                () = &mut shutdown => break,
            }
        }
    }

    // Stop accepting before waiting on in-flight requests
    drop(listener);

    let grace = Duration::from_secs(state.config.performance.shutdown_timeout);
    drain_connections(&state, grace).await;
}
