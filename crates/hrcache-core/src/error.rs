//! Error types for the hrcache cache layer.
//!
//! Two families of failures live here:
//! - programmer errors (`Configuration`, `CallerContract`) that must surface
//!   loudly to the caller,
//! - encoding errors (`Serialization`) that abort a single cache write.
//!
//! Store availability problems are not represented here: they belong to
//! the store crate and are absorbed by the manager (fail open).
//!
//! # Example
//!
//! ```
//! use hrcache_core::{CacheError, ResourceModel, Result};
//!
//! fn bind(name: &str) -> Result<ResourceModel> {
//!     ResourceModel::new(name)
//! }
//!
//! assert!(bind("Employee").is_ok());
//! assert!(bind("").unwrap_err().is_configuration_error());
//! ```

use thiserror::Error;

/// Main error type for cache-layer operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The manager has no model bound, or the bound model is unusable.
    #[error("Cache configuration error: {message}")]
    Configuration {
        /// Description of what is missing or invalid
        message: String,
    },

    /// A convenience accessor was called with an invalid combination of inputs.
    #[error("Caller contract violated in '{operation}': {message}")]
    CallerContract {
        /// Accessor that was misused
        operation: String,
        /// What the caller did wrong
        message: String,
    },

    /// A value could not be encoded to, or decoded from, its stored form.
    #[error("Failed to serialize cache entry for key '{key}'")]
    Serialization {
        /// Key being written or read
        key: String,
        /// Underlying serde error
        #[source]
        cause: serde_json::Error,
    },
}

impl CacheError {
    /// Creates a Configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a CallerContract error.
    pub fn caller_contract(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CallerContract {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Creates a Serialization error.
    pub fn serialization(key: impl Into<String>, cause: serde_json::Error) -> Self {
        Self::Serialization {
            key: key.into(),
            cause,
        }
    }

    /// Returns true if this error comes from a missing or invalid model binding.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Returns true if the caller misused an accessor.
    pub fn is_caller_contract_error(&self) -> bool {
        matches!(self, Self::CallerContract { .. })
    }

    /// Returns true if this is an encoding failure.
    pub fn is_serialization_error(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }
}

/// Type alias for Results with CacheError.
pub type Result<T> = std::result::Result<T, CacheError>;
