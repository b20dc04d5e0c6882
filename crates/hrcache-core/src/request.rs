//! Request context consumed by key derivation.
//!
//! The HTTP layer is an external collaborator: it only has to hand over the
//! endpoint path, the requesting user and the query parameters.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Rendered form of an unauthenticated user inside cache keys.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Identity of the user a response was produced for.
///
/// Listings can be permission-filtered per user, so the user is part of the
/// cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UserId {
    /// A known user, by primary key.
    Authenticated(String),
    /// No authenticated user on the request.
    #[default]
    Anonymous,
}

impl UserId {
    /// Creates an authenticated user id.
    pub fn new(id: impl Into<String>) -> Self {
        Self::Authenticated(id.into())
    }

    /// Returns true for the anonymous sentinel.
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authenticated(id) => write!(f, "{}", id),
            Self::Anonymous => write!(f, "{}", ANONYMOUS_USER),
        }
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self::Authenticated(id.to_string())
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self::Authenticated(id.to_string())
    }
}

impl From<Option<u64>> for UserId {
    fn from(id: Option<u64>) -> Self {
        id.map(Self::from).unwrap_or_default()
    }
}

/// Multi-valued query parameters, kept in arrival order.
///
/// Arrival order is preserved here; canonical ordering is applied only when
/// the parameters are encoded for a cache key (see [`QueryParams::canonical_encode`]).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a parameter set from `(name, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parses a raw query string (`a=1&b=2&a=3`), without the leading `?`.
    ///
    /// `+` decodes to a space, blank values are kept, empty segments are
    /// skipped. Invalid UTF-8 after percent-decoding is replaced lossily.
    ///
    /// # Examples
    ///
    /// ```
    /// use hrcache_core::QueryParams;
    ///
    /// let params = QueryParams::parse("page=2&search=ana+maria&flag");
    /// assert_eq!(params.get("search"), Some("ana maria"));
    /// assert_eq!(params.get("flag"), Some(""));
    /// ```
    pub fn parse(raw: &str) -> Self {
        let pairs = raw
            .split('&')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                let (name, value) = segment.split_once('=').unwrap_or((segment, ""));
                (decode_component(name), decode_component(value))
            })
            .collect();

        Self { pairs }
    }

    /// Appends a value for `name`.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Returns the first value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns every value for `name`, in arrival order.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Number of `(name, value)` pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true when no parameters were supplied.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates the pairs in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encodes the parameters in canonical order.
    ///
    /// Pairs are stably sorted by name, so repeated values of one parameter
    /// keep their relative order. Names and values are percent-encoded.
    ///
    /// # Examples
    ///
    /// ```
    /// use hrcache_core::QueryParams;
    ///
    /// let a = QueryParams::parse("page=2&ordering=name");
    /// let b = QueryParams::parse("ordering=name&page=2");
    /// assert_eq!(a.canonical_encode(), "ordering=name&page=2");
    /// assert_eq!(a.canonical_encode(), b.canonical_encode());
    /// ```
    pub fn canonical_encode(&self) -> String {
        let mut sorted: Vec<&(String, String)> = self.pairs.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));

        sorted
            .into_iter()
            .map(|(name, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(name),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

fn decode_component(raw: &str) -> String {
    let spaced: Cow<'_, str> = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };

    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes()))
            .into_owned(),
    }
}

/// Everything key derivation needs to know about one incoming request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    path: String,
    user: UserId,
    query: QueryParams,
}

impl RequestContext {
    /// Creates a request context.
    pub fn new(path: impl Into<String>, user: UserId, query: QueryParams) -> Self {
        Self {
            path: path.into(),
            user,
            query,
        }
    }

    /// Creates a request context from a path and an optional raw query string.
    ///
    /// # Examples
    ///
    /// ```
    /// use hrcache_core::{RequestContext, UserId};
    ///
    /// let ctx = RequestContext::from_raw("/api/v1/users", Some("page=1"), UserId::from(5u64));
    /// assert_eq!(ctx.path(), "/api/v1/users");
    /// assert_eq!(ctx.query().get("page"), Some("1"));
    /// ```
    pub fn from_raw(path: impl Into<String>, raw_query: Option<&str>, user: UserId) -> Self {
        let query = raw_query.map(QueryParams::parse).unwrap_or_default();
        Self::new(path, user, query)
    }

    /// Endpoint path, without query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Requesting user.
    pub fn user(&self) -> &UserId {
        &self.user
    }

    /// Query parameters.
    pub fn query(&self) -> &QueryParams {
        &self.query
    }
}
