//! Error types for the client pool.

use thiserror::Error;

/// Errors that can occur in pool operations.
#[derive(Debug, Error)]
pub enum PoolError {
    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client for {endpoint}: {source}")]
    ClientBuild {
        /// Endpoint the client was for.
        endpoint: String,
        /// Builder error.
        #[source]
        source: reqwest::Error,
    },

    /// Configuration was rejected.
    #[error("invalid pool configuration: {0}")]
    InvalidConfig(String),

    /// The pool was closed while waiting for a connection slot.
    #[error("pool closed while acquiring a connection to {endpoint}")]
    Closed {
        /// Endpoint being acquired.
        endpoint: String,
    },
}

impl PoolError {
    /// Create a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

/// Result type for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_config() {
        let err = PoolError::config("max_conns_per_host must be positive");
        assert!(err.to_string().contains("max_conns_per_host"));
    }

    #[test]
    fn test_error_display_closed() {
        let err = PoolError::Closed {
            endpoint: "https://slurm:6820".into(),
        };
        assert!(err.to_string().contains("https://slurm:6820"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PoolError>();
    }
}
