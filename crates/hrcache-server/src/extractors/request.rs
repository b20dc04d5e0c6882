//! Request context extractor.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::request::Parts,
};
use hrcache_core::{RequestContext, UserId};

/// Identity of the caller, inserted into request extensions by the
/// authentication middleware in front of the resource handlers.
///
/// When absent the request is treated as anonymous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

impl AuthenticatedUser {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self(id.into())
    }
}

/// Extracts the [`RequestContext`] a cache key is derived from.
///
/// Uses the path as the client sent it (before any router nesting
/// stripped a prefix), the raw query string, and the
/// [`AuthenticatedUser`] extension.
///
/// ```no_run
/// use axum::Json;
/// use hrcache_server::extractors::CacheRequest;
///
/// async fn list_users(CacheRequest(request): CacheRequest) -> Json<String> {
///     Json(request.path().to_string())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CacheRequest(pub RequestContext);

impl CacheRequest {
    pub fn into_inner(self) -> RequestContext {
        self.0
    }
}

impl<S> FromRequestParts<S> for CacheRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| original.0.clone())
            .unwrap_or_else(|| parts.uri.clone());

        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .map(|authenticated| authenticated.0.clone())
            .unwrap_or_default();

        Ok(CacheRequest(RequestContext::from_raw(
            uri.path(),
            uri.query(),
            user,
        )))
    }
}
