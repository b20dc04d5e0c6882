//! Cache key derivation.
//!
//! Key format: `{MODEL}-{path}:{user}:{canonical query}`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Write as _;

use crate::model::ResourceModel;
use crate::request::{QueryParams, RequestContext, UserId};

/// Key identifying one cached response.
///
/// Keys are usually derived with [`compute_key`] or [`CacheKey::for_request`];
/// [`CacheKey::from_raw`] exists for callers that already hold a key string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives the key for a request against `model`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hrcache_core::{CacheKey, RequestContext, ResourceModel, UserId};
    ///
    /// let model = ResourceModel::new("User").unwrap();
    /// let ctx = RequestContext::from_raw("/api/v1/users", None, UserId::from(5u64));
    ///
    /// let key = CacheKey::for_request(&model, &ctx);
    /// assert_eq!(key.as_str(), "USER-/api/v1/users:5:");
    /// ```
    pub fn for_request(model: &ResourceModel, request: &RequestContext) -> Self {
        compute_key(model, request.path(), request.user(), request.query())
    }

    /// Wraps an already rendered key. Control characters are escaped.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(escape_control(&raw.into()))
    }

    /// Returns the rendered key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key, returning the rendered string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        Self::from_raw(s)
    }
}

impl From<String> for CacheKey {
    fn from(s: String) -> Self {
        Self::from_raw(s)
    }
}

/// Derives the cache key for `(model, path, user, query)`.
///
/// Pure and deterministic: identical inputs give byte-identical keys, and
/// query parameters are encoded in canonical order so clients sending the
/// same parameters in a different order share an entry.
pub fn compute_key(
    model: &ResourceModel,
    endpoint_path: &str,
    user: &UserId,
    query: &QueryParams,
) -> CacheKey {
    CacheKey(format!(
        "{}-{}:{}:{}",
        model.cache_name(),
        escape_component(endpoint_path),
        escape_component(&user.to_string()),
        query.canonical_encode()
    ))
}

/// Escapes a path or user component so it cannot spill into its neighbours:
/// control characters, the `:` separator and `%` itself are percent-encoded.
fn escape_component(raw: &str) -> String {
    escape_where(raw, |c| c.is_control() || c == ':' || c == '%')
}

/// Percent-encodes control characters, leaving everything else untouched.
fn escape_control(raw: &str) -> String {
    escape_where(raw, char::is_control)
}

fn escape_where(raw: &str, escape: impl Fn(char) -> bool) -> String {
    if !raw.chars().any(&escape) {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len() + 8);
    for c in raw.chars() {
        if escape(c) {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).as_bytes() {
                let _ = write!(out, "%{:02X}", byte);
            }
        } else {
            out.push(c);
        }
    }
    out
}
