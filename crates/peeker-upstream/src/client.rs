//! HTTP transport to the upstream data API.
//!
//! Every call is a GET built from path segments and query pairs, with the
//! access token appended last. Path segments are percent-encoded one by one,
//! so an ID received from a gateway URL can never reach a different upstream
//! endpoint. Transient failures are retried with linear backoff.

use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::config::UpstreamConfig;
use crate::error::{UpstreamError, UpstreamResult};

/// Raw upstream response forwarded as-is to the gateway client.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Response body.
    pub body: Bytes,
    /// Upstream `Content-Type`, if it sent one.
    pub content_type: Option<String>,
    /// Body length in bytes.
    pub content_length: u64,
}

/// Client for the upstream server.
///
/// Cheap to clone; clones share the connection pool and configuration.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: Url,
    config: Arc<UpstreamConfig>,
}

impl UpstreamClient {
    /// Build a client from validated configuration.
    pub fn new(config: UpstreamConfig) -> UpstreamResult<Self> {
        config.validate()?;

        let base_url = Url::parse(&config.server).map_err(|e| {
            UpstreamError::Config(format!("invalid upstream server {:?}: {}", config.server, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::Config(format!(
                "upstream server {:?} cannot be used as a base URL",
                config.server
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("joplin-peeker/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpstreamError::Config(format!("failed to build HTTP client: {e}")))?;

        tracing::info!(
            server = %base_url,
            timeout_ms = config.timeout.as_millis() as u64,
            retries = config.retries,
            "Upstream client ready"
        );

        Ok(Self {
            http,
            base_url,
            config: Arc::new(config),
        })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// GET an endpoint and decode its JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> UpstreamResult<T> {
        let path = display_path(segments);
        let body = self.get_raw(segments, query).await?.body;
        serde_json::from_slice(&body).map_err(|source| UpstreamError::Decode { path, source })
    }

    /// GET an endpoint and return its body untouched.
    pub async fn get_raw(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> UpstreamResult<RawResponse> {
        let path = display_path(segments);
        let url = self.url_for(segments, query)?;
        let response = self.send_with_retry(&path, url).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await.map_err(|e| UpstreamError::Body {
            path: path.clone(),
            source: e.without_url(),
        })?;

        tracing::debug!(%path, bytes = body.len(), "Upstream response received");

        Ok(RawResponse {
            content_length: body.len() as u64,
            body,
            content_type,
        })
    }

    /// Build the full URL for `segments`, with the token as last query pair.
    pub(crate) fn url_for(&self, segments: &[&str], query: &[(&str, &str)]) -> UpstreamResult<Url> {
        // The URL parser silently drops dot segments instead of encoding them.
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(UpstreamError::InvalidId((*bad).to_string()));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::Config(format!("cannot extend base URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);

        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("token", &self.config.token);
        }
        Ok(url)
    }

    async fn send_with_retry(&self, path: &str, url: Url) -> UpstreamResult<reqwest::Response> {
        let mut attempt = 0u32;
        loop {
            match self.send_once(path, url.clone()).await {
                Err(error) if error.is_transient() && attempt < self.config.retries => {
                    attempt += 1;
                    let delay = self.config.retry_backoff * attempt;
                    tracing::warn!(
                        %path,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        %error,
                        "Upstream request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }

    async fn send_once(&self, path: &str, url: Url) -> UpstreamResult<reqwest::Response> {
        tracing::debug!(%path, "Upstream GET");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| UpstreamError::Unreachable {
                path: path.to_string(),
                source: e.without_url(),
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(UpstreamError::NotFound {
                path: path.to_string(),
            });
        }
        if !status.is_success() {
            return Err(UpstreamError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

/// Loggable form of an upstream path; never includes the query string.
pub(crate) fn display_path(segments: &[&str]) -> String {
    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(server: &str) -> UpstreamClient {
        UpstreamClient::new(UpstreamConfig::new(server, "tok")).unwrap()
    }

    #[test]
    fn url_appends_segments_and_token() {
        let url = client("http://localhost:41184")
            .url_for(&["notes", "abc"], &[("fields", "title,body")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:41184/notes/abc?fields=title%2Cbody&token=tok"
        );
    }

    #[test]
    fn url_keeps_base_path_prefix() {
        let url = client("http://example.com/joplin/")
            .url_for(&["folders"], &[("page", "2")])
            .unwrap();
        assert_eq!(url.as_str(), "http://example.com/joplin/folders?page=2&token=tok");
    }

    #[test]
    fn url_encodes_segment_separators() {
        let url = client("http://localhost:41184")
            .url_for(&["notes", "a/../../folders"], &[])
            .unwrap();
        assert_eq!(url.path(), "/notes/a%2F..%2F..%2Ffolders");
    }

    #[test]
    fn dot_segments_are_rejected() {
        let client = client("http://localhost:41184");
        for id in ["", ".", ".."] {
            let result = client.url_for(&["notes", id], &[]);
            assert!(matches!(result, Err(UpstreamError::InvalidId(_))), "{id:?}");
        }
    }

    #[test]
    fn url_encodes_query_values() {
        let url = client("http://localhost:41184")
            .url_for(&["search"], &[("query", "a&b c")])
            .unwrap();
        assert_eq!(url.query(), Some("query=a%26b+c&token=tok"));
    }

    #[test]
    fn invalid_server_is_config_error() {
        let result = UpstreamClient::new(UpstreamConfig::new("not a url", "tok"));
        assert!(matches!(result, Err(UpstreamError::Config(_))));

        let result = UpstreamClient::new(UpstreamConfig::new("mailto:x@example.com", "tok"));
        assert!(matches!(result, Err(UpstreamError::Config(_))));
    }

    #[test]
    fn display_path_has_no_query() {
        assert_eq!(display_path(&["resources", "r1", "file"]), "/resources/r1/file");
    }
}
