use std::sync::Arc;

use grokgen_core::generator::ImageGenerator;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (CORS, timeouts, output directory).
    pub config: Arc<ServerConfig>,
    /// Image generator shared by all requests, so the provider's HTTP
    /// connection pool is reused.
    pub generator: Arc<ImageGenerator>,
}

impl AppState {
    pub fn new(config: ServerConfig, generator: ImageGenerator) -> Self {
        Self {
            config: Arc::new(config),
            generator: Arc::new(generator),
        }
    }
}
