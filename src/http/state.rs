use crate::config::Config;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Shared application state for HTTP handlers
///
/// Configuration is loaded once at startup and read-only thereafter; the
/// semaphore bounds concurrent call sessions.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub session_permits: Arc<Semaphore>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let max_sessions = config.session.max_sessions;
        Self {
            config: Arc::new(config),
            session_permits: Arc::new(Semaphore::new(max_sessions)),
        }
    }
}
