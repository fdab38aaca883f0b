//! Application state shared across handlers.

use std::sync::Arc;

use peeker_upstream::{UpstreamClient, UpstreamResult};

use crate::config::ServerConfig;

/// Application state shared across all handlers.
///
/// This is cloneable and can be extracted in handlers using `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    config: Arc<ServerConfig>,
    /// Upstream API client; clones share one connection pool.
    upstream: UpstreamClient,
}

impl AppState {
    /// Create new application state, building the upstream client.
    pub fn new(config: ServerConfig) -> UpstreamResult<Self> {
        let upstream = UpstreamClient::new(config.upstream.clone())?;
        Ok(Self {
            config: Arc::new(config),
            upstream,
        })
    }

    /// Get a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get a reference to the upstream client.
    pub fn upstream(&self) -> &UpstreamClient {
        &self.upstream
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
