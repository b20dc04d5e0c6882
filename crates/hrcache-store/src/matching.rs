//! Glob key matching shared by the local backends.

use glob::{MatchOptions, Pattern};

use crate::error::StoreError;

/// Compiled key pattern with Redis `KEYS` semantics: `*` also spans `/`.
#[derive(Debug, Clone)]
pub(crate) struct KeyMatcher {
    pattern: Pattern,
}

impl KeyMatcher {
    pub(crate) fn new(raw: &str) -> Result<Self, StoreError> {
        Pattern::new(raw)
            .map(|pattern| Self { pattern })
            .map_err(|e| StoreError::invalid_pattern(raw, e.to_string()))
    }

    pub(crate) fn matches(&self, key: &str) -> bool {
        self.pattern.matches_with(
            key,
            MatchOptions {
                case_sensitive: true,
                require_literal_separator: false,
                require_literal_leading_dot: false,
            },
        )
    }
}
