use std::sync::Arc;

use crate::config::AppConfig;
use crate::llm::MoveClient;

/// Shared application state passed to all handlers via Axum's State
/// extractor. Requests are otherwise stateless; nothing here is mutated
/// after startup.
pub struct AppState {
    pub config: AppConfig,
    pub start_time: std::time::Instant,
    /// Completion client (None when no provider key is configured).
    pub client: Option<Arc<MoveClient>>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: AppConfig) -> SharedState {
        let client = match MoveClient::from_config(&config.llm) {
            Ok(c) => Some(Arc::new(c)),
            Err(e) => {
                tracing::warn!(error = %e, "no completion provider configured, move endpoints will return 503");
                None
            }
        };

        Arc::new(AppState {
            config,
            start_time: std::time::Instant::now(),
            client,
        })
    }

    /// Build state around an explicit client; used by tests to inject stub
    /// providers.
    pub fn with_client(config: AppConfig, client: MoveClient) -> SharedState {
        Arc::new(AppState {
            config,
            start_time: std::time::Instant::now(),
            client: Some(Arc::new(client)),
        })
    }
}
