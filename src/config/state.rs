// Application state module
// Holds configuration and the route table shared by every connection

use std::sync::atomic::{AtomicUsize, Ordering};

use super::types::Config;
use crate::routing::RouteTable;

/// Application state
///
/// Built once at startup and shared through an `Arc`; only the connection
/// counter changes after construction.
pub struct AppState {
    pub config: Config,
    pub routes: RouteTable,
    pub active_connections: AtomicUsize,
}

impl AppState {
    pub fn new(config: &Config, routes: RouteTable) -> Self {
        Self {
            config: config.clone(),
            routes,
            active_connections: AtomicUsize::new(0),
        }
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }

    pub fn active_connections(&self) -> usize {
        self.active_connections.load(Ordering::SeqCst)
    }
}
