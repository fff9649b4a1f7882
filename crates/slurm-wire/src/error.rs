//! Error types for the wire boundary.

use slurm_pool::PoolError;
use thiserror::Error;

/// Errors raised while moving a request across the wire.
///
/// HTTP status codes are not errors here; a response with any status is
/// returned to the caller for classification.
#[derive(Debug, Error)]
pub enum WireError {
    /// The endpoint or a request path could not be turned into a URL.
    #[error("invalid endpoint {endpoint}: {source}")]
    InvalidEndpoint {
        /// Offending endpoint or path.
        endpoint: String,
        /// Parse error.
        #[source]
        source: url::ParseError,
    },

    /// A default header name or value was rejected.
    #[error("invalid header {name}")]
    InvalidHeader {
        /// Header name.
        name: String,
    },

    /// The request did not complete in time.
    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// Connection, TLS or protocol failure.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// A response body was not valid JSON for the expected shape.
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// No connection slot could be obtained.
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// Failure reported by a non-HTTP wire client.
    #[error("{0}")]
    Other(String),
}

impl WireError {
    /// Classify a `reqwest` failure.
    #[must_use]
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else {
            Self::Transport(err)
        }
    }

    /// Returns true if the request may not have reached the server.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Transport(_) | Self::Other(_))
    }
}

/// Result type for wire operations.
pub type WireResult<T> = Result<T, WireError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let err: WireError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(err.to_string().starts_with("malformed response body"));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_other_is_transport() {
        let err = WireError::Other("connection reset".into());
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "connection reset");
    }

    #[test]
    fn test_invalid_endpoint_display() {
        let source = url::Url::parse("not a url").unwrap_err();
        let err = WireError::InvalidEndpoint {
            endpoint: "not a url".into(),
            source,
        };
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WireError>();
    }
}
