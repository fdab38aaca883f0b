//! Error types for the upstream layer.
//!
//! Messages carry the request path but never the query string, which holds
//! the access token.

use thiserror::Error;

/// Result type alias for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Coarse classification used at the request boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorKind {
    /// The upstream could not be reached or did not answer in time.
    Unreachable,
    /// The upstream answered, but not with what the protocol promises.
    Protocol,
    /// The upstream reports no such note, notebook or resource.
    NotFound,
    /// The caller passed an ID that cannot name an upstream object.
    InvalidInput,
    /// The client itself is misconfigured.
    Config,
}

/// Errors that can occur while talking to the upstream server.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection failure or timeout.
    #[error("upstream unreachable at {path}: {source}")]
    Unreachable {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream reports the requested object does not exist.
    #[error("not found upstream: {path}")]
    NotFound { path: String },

    /// Upstream answered with an unexpected HTTP status.
    #[error("upstream returned status {status} for {path}")]
    Status { path: String, status: u16 },

    /// Response body could not be read to the end.
    #[error("failed to read upstream response for {path}: {source}")]
    Body {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response body is not the JSON shape the endpoint promises.
    #[error("malformed JSON from upstream for {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A required field is missing or has the wrong type.
    #[error("upstream response for {path} lacks a valid `{field}` field")]
    MalformedResponse { path: String, field: &'static str },

    /// Upstream kept reporting more pages past the configured limit.
    #[error("upstream listing {path} still had more results after {max_pages} pages")]
    RunawayPagination { path: String, max_pages: u32 },

    /// An ID that would not stay a single path segment.
    #[error("invalid identifier {0:?}")]
    InvalidId(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl UpstreamError {
    /// Classify this error.
    pub fn kind(&self) -> UpstreamErrorKind {
        match self {
            Self::Unreachable { .. } | Self::Body { .. } => UpstreamErrorKind::Unreachable,
            Self::NotFound { .. } => UpstreamErrorKind::NotFound,
            Self::Status { .. }
            | Self::Decode { .. }
            | Self::MalformedResponse { .. }
            | Self::RunawayPagination { .. } => UpstreamErrorKind::Protocol,
            Self::InvalidId(_) => UpstreamErrorKind::InvalidInput,
            Self::Config(_) => UpstreamErrorKind::Config,
        }
    }

    /// Whether repeating the same GET could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unreachable { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_errors_classify_together() {
        let errors = [
            UpstreamError::Status {
                path: "/folders".into(),
                status: 500,
            },
            UpstreamError::MalformedResponse {
                path: "/notes/x".into(),
                field: "body",
            },
            UpstreamError::RunawayPagination {
                path: "/folders".into(),
                max_pages: 3,
            },
        ];
        for error in errors {
            assert_eq!(error.kind(), UpstreamErrorKind::Protocol);
        }
    }

    #[test]
    fn not_found_is_its_own_kind() {
        let error = UpstreamError::NotFound {
            path: "/notes/x".into(),
        };
        assert_eq!(error.kind(), UpstreamErrorKind::NotFound);
        assert!(!error.is_transient());
    }

    #[test]
    fn only_server_errors_are_transient_statuses() {
        let server = UpstreamError::Status {
            path: "/".into(),
            status: 503,
        };
        let client = UpstreamError::Status {
            path: "/".into(),
            status: 400,
        };
        assert!(server.is_transient());
        assert!(!client.is_transient());
    }

    #[test]
    fn messages_name_the_path() {
        let error = UpstreamError::MalformedResponse {
            path: "/notes/abc".into(),
            field: "body",
        };
        assert_eq!(
            error.to_string(),
            "upstream response for /notes/abc lacks a valid `body` field"
        );
    }
}
