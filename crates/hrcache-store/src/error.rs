//! Error types for cache store backends.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when talking to a cache store.
///
/// Every variant is operational: callers in the cache manager treat all of
/// them as "store unavailable" and fail open.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached or rejected the command.
    #[error("Cache store '{backend}' unavailable: {message}")]
    Unavailable {
        /// Backend name
        backend: String,
        /// Error message
        message: String,
        /// Underlying error
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An operation did not complete in time.
    #[error("Cache store operation '{operation}' timed out after {after:?}")]
    Timeout {
        /// Operation that timed out
        operation: String,
        /// Configured bound
        after: Duration,
    },

    /// A stored entry could not be read back.
    #[error("Corrupt cache entry '{key}': {message}")]
    Corrupt {
        /// Key or file of the entry
        key: String,
        /// What was wrong with it
        message: String,
    },

    /// The key pattern could not be compiled.
    #[error("Invalid key pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The pattern as given
        pattern: String,
        /// Compiler message
        message: String,
    },

    /// I/O error from a file-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Creates an Unavailable error without a cause.
    pub fn unavailable(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unavailable {
            backend: backend.into(),
            message: message.into(),
            cause: None,
        }
    }

    /// Creates an Unavailable error with a cause.
    pub fn unavailable_with_cause<E>(
        backend: impl Into<String>,
        message: impl Into<String>,
        cause: E,
    ) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Unavailable {
            backend: backend.into(),
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Creates a Timeout error.
    pub fn timeout(operation: impl Into<String>, after: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            after,
        }
    }

    /// Creates a Corrupt error.
    pub fn corrupt(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Corrupt {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates an InvalidPattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Returns true if the backend itself is down or unreachable.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Timeout { .. } | Self::Io(_))
    }

    /// Returns true for timeouts.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl From<redis::RedisError> for StoreError {
    fn from(e: redis::RedisError) -> Self {
        Self::unavailable_with_cause("redis", e.to_string(), e)
    }
}
