//! Stored cache values.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{CacheError, Result};
use crate::key::CacheKey;

/// Serialized response body as held by a store.
///
/// Entries are JSON; stores treat them as opaque bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    bytes: Vec<u8>,
}

impl CacheEntry {
    /// Encodes `value` for storage under `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hrcache_core::{CacheEntry, CacheKey};
    ///
    /// let key = CacheKey::from("USER-/api/v1/users/5:5:");
    /// let entry = CacheEntry::encode(&key, &serde_json::json!({"id": 5})).unwrap();
    /// let value: serde_json::Value = entry.decode(&key).unwrap();
    /// assert_eq!(value["id"], 5);
    /// ```
    pub fn encode<T: Serialize + ?Sized>(key: &CacheKey, value: &T) -> Result<Self> {
        serde_json::to_vec(value)
            .map(|bytes| Self { bytes })
            .map_err(|e| CacheError::serialization(key.as_str(), e))
    }

    /// Decodes the entry read back from `key`.
    pub fn decode<T: DeserializeOwned>(&self, key: &CacheKey) -> Result<T> {
        serde_json::from_slice(&self.bytes).map_err(|e| CacheError::serialization(key.as_str(), e))
    }

    /// Wraps raw bytes read from a store.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Raw stored bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the entry, returning the raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Size of the stored payload.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true for a zero-length payload.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Paginated listing envelope, cached as a whole.
///
/// Mirrors the `count/next/previous/results` shape returned by the listing
/// endpoints, so a cached page carries its own page metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of objects across all pages.
    pub count: u64,
    /// Link to the next page.
    pub next: Option<String>,
    /// Link to the previous page.
    pub previous: Option<String>,
    /// Objects on this page.
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Creates a page.
    pub fn new(results: Vec<T>, count: u64, next: Option<String>, previous: Option<String>) -> Self {
        Self {
            count,
            next,
            previous,
            results,
        }
    }

    /// Creates a single page holding every result.
    pub fn single(results: Vec<T>) -> Self {
        let count = results.len() as u64;
        Self::new(results, count, None, None)
    }
}
