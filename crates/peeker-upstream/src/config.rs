//! Upstream connection settings.

use std::time::Duration;

use crate::error::{UpstreamError, UpstreamResult};

/// Default address of the Joplin data API.
pub const DEFAULT_SERVER: &str = "http://localhost:41184";

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of retries for transient failures.
pub const DEFAULT_RETRIES: u32 = 2;

/// Default delay before the first retry; later retries wait proportionally longer.
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(200);

/// Default limit on pages fetched for one listing.
pub const DEFAULT_MAX_PAGES: u32 = 1000;

/// Configuration for talking to the upstream server.
#[derive(Clone)]
pub struct UpstreamConfig {
    /// Base URL of the upstream API.
    pub server: String,
    /// Access token, forwarded as the `token` query parameter.
    pub token: String,
    /// Timeout applied to each upstream call, body included.
    pub timeout: Duration,
    /// Retries after a transient failure (connection error, timeout, 5xx).
    pub retries: u32,
    /// Base delay between retries.
    pub retry_backoff: Duration,
    /// Maximum pages fetched for one paginated listing.
    pub max_pages: u32,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            token: String::new(),
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl UpstreamConfig {
    /// Create a configuration with default limits.
    pub fn new(server: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            token: token.into(),
            ..Self::default()
        }
    }

    /// Check the settings that would otherwise fail on first use.
    pub fn validate(&self) -> UpstreamResult<()> {
        if self.token.is_empty() {
            return Err(UpstreamError::Config("access token is missing".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(UpstreamError::Config("timeout must be positive".to_string()));
        }
        if self.max_pages == 0 {
            return Err(UpstreamError::Config("max_pages must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("server", &self.server)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("retries", &self.retries)
            .field("retry_backoff", &self.retry_backoff)
            .field("max_pages", &self.max_pages)
            .finish()
    }
}
