//! Model-scoped invalidation patterns.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::key::CacheKey;
use crate::model::ResourceModel;

/// Pattern matching every cache key of one model: `{MODEL}-*`.
///
/// Rendered with a trailing `*` so it can be handed to glob-style `KEYS`
/// implementations unchanged; matching itself is a prefix test.
///
/// # Example
///
/// ```
/// use hrcache_core::{CachePattern, ResourceModel};
///
/// let pattern = CachePattern::for_model(&ResourceModel::new("Payment").unwrap());
/// assert_eq!(pattern.to_string(), "PAYMENT-*");
/// assert!(pattern.matches("PAYMENT-/api/v1/payments:1:"));
/// assert!(!pattern.matches("PAYMENTPLAN-/api/v1/plans:1:"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CachePattern {
    prefix: String,
}

impl CachePattern {
    /// Returns the pattern for `model`.
    pub fn for_model(model: &ResourceModel) -> Self {
        Self {
            prefix: format!("{}-", model.cache_name()),
        }
    }

    /// Literal prefix shared by every matching key (pattern without `*`).
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns true if `key` belongs to this pattern.
    pub fn matches(&self, key: impl AsRef<str>) -> bool {
        key.as_ref().starts_with(&self.prefix)
    }

    /// Returns true if `key` belongs to this pattern.
    pub fn matches_key(&self, key: &CacheKey) -> bool {
        self.matches(key.as_str())
    }
}

impl fmt::Display for CachePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}*", self.prefix)
    }
}

/// Derives the invalidation pattern for `model`.
pub fn compute_pattern(model: &ResourceModel) -> CachePattern {
    CachePattern::for_model(model)
}
