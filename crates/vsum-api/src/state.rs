//! Application state.

use std::sync::Arc;

use vsum_queue::JobQueue;
use vsum_store::JobStore;

use crate::config::ApiConfig;

/// Shared application state.
///
/// The store and queue are constructed in `main` (or by tests) and
/// injected here; handlers never reach for ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: Arc<dyn JobStore>,
    pub queue: JobQueue,
}

impl AppState {
    pub fn new(config: ApiConfig, store: Arc<dyn JobStore>, queue: JobQueue) -> Self {
        Self {
            config,
            store,
            queue,
        }
    }
}
