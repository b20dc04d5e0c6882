//! End to end scenarios of the cache layer behind CRUD handlers.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use http_body_util::BodyExt;
use hrcache_core::{CacheKey, Page, RequestContext, ResourceModel, UserId};
use hrcache_server::{AuthenticatedUser, CacheManager, CacheRequest};
use hrcache_store::{CacheStore, FileStore, MemoryStore};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower::ServiceExt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct User {
    id: u64,
    name: String,
}

fn ana() -> User {
    User {
        id: 5,
        name: "Ana".to_string(),
    }
}

fn users(store: Arc<dyn CacheStore>) -> CacheManager {
    CacheManager::builder()
        .store(store)
        .model(ResourceModel::new("User").unwrap())
        .build()
        .unwrap()
}

fn listing(user: u64) -> RequestContext {
    RequestContext::from_raw("/api/v1/users", None, UserId::from(user))
}

async fn stores() -> Vec<(Arc<dyn CacheStore>, Option<tempfile::TempDir>)> {
    let dir = tempfile::tempdir().unwrap();
    let memory: Arc<dyn CacheStore> = Arc::new(MemoryStore::default());
    let files: Arc<dyn CacheStore> =
        Arc::new(FileStore::open(dir.path().join("cache")).await.unwrap());
    vec![(memory, None), (files, Some(dir))]
}

// === Scenarios ===

#[tokio::test]
async fn miss_then_hit() {
    for (store, _dir) in stores().await {
        let manager = users(store.clone());
        let key = manager.cache_key(&listing(5));
        assert_eq!(key.as_str(), "USER-/api/v1/users:5:");

        assert!(manager.get::<User>(&key).await.is_none(), "{}", store.name());

        manager.set_with_ttl(&key, &ana(), 900).await.unwrap();

        assert_eq!(manager.get::<User>(&key).await, Some(ana()), "{}", store.name());
    }
}

#[tokio::test]
async fn write_invalidates_every_users_listing() {
    for (store, _dir) in stores().await {
        let manager = users(store.clone());
        let key5 = manager.cache_key(&listing(5));
        let key7 = manager.cache_key(&listing(7));
        manager.set(&key5, &Page::single(vec![ana()])).await.unwrap();
        manager.set(&key7, &Page::single(vec![ana()])).await.unwrap();

        let created: Result<User, String> = manager
            .write_then_invalidate(|| async {
                Ok(User {
                    id: 9,
                    name: "Marta".to_string(),
                })
            })
            .await;
        assert!(created.is_ok());

        assert!(manager.get::<Page<User>>(&key5).await.is_none(), "{}", store.name());
        assert!(manager.get::<Page<User>>(&key7).await.is_none(), "{}", store.name());
    }
}

#[tokio::test]
async fn per_user_isolation() {
    for (store, _dir) in stores().await {
        let manager = users(store.clone());
        manager
            .set(&manager.cache_key(&listing(5)), &vec![ana()])
            .await
            .unwrap();

        let other: Option<Vec<User>> = manager.get(&manager.cache_key(&listing(7))).await;

        assert!(other.is_none(), "{}", store.name());
    }
}

#[tokio::test]
async fn ttl_expiry() {
    for (store, _dir) in stores().await {
        let manager = users(store.clone());
        let key = CacheKey::from("USER-/api/v1/users/5:5:");

        manager.set_with_ttl(&key, &ana(), 1).await.unwrap();
        assert!(manager.get::<User>(&key).await.is_some(), "{}", store.name());

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert!(manager.get::<User>(&key).await.is_none(), "{}", store.name());
    }
}

#[tokio::test]
async fn query_order_does_not_split_entries() {
    let manager = users(Arc::new(MemoryStore::default()));
    let first =
        RequestContext::from_raw("/api/v1/users", Some("page=2&area=3"), UserId::from(5u64));
    let second =
        RequestContext::from_raw("/api/v1/users", Some("area=3&page=2"), UserId::from(5u64));

    manager.set(&manager.cache_key(&first), &vec![ana()]).await.unwrap();

    let cached: Option<Vec<User>> = manager.get(&manager.cache_key(&second)).await;
    assert_eq!(cached, Some(vec![ana()]));
}

// === Resource handlers wired through the extractor ===

#[derive(Clone)]
struct UsersApi {
    cache: CacheManager,
    rows: Arc<Mutex<Vec<User>>>,
    reads: Arc<AtomicUsize>,
}

async fn list_users(
    State(api): State<UsersApi>,
    CacheRequest(request): CacheRequest,
) -> Result<Json<Page<User>>, StatusCode> {
    let reads = Arc::clone(&api.reads);
    let rows = Arc::clone(&api.rows);
    let page = api
        .cache
        .list_through(&request, move || async move {
            reads.fetch_add(1, Ordering::SeqCst);
            let guard = rows.lock().await;
            Ok::<_, StatusCode>(Page::single(guard.to_vec()))
        })
        .await?;
    Ok(Json(page))
}

async fn create_user(
    State(api): State<UsersApi>,
    Json(user): Json<User>,
) -> Result<Json<User>, StatusCode> {
    let rows = Arc::clone(&api.rows);
    let created = api
        .cache
        .write_then_invalidate(move || async move {
            rows.lock().await.push(user.clone());
            Ok::<_, StatusCode>(user)
        })
        .await?;
    Ok(Json(created))
}

// Stands in for the authentication layer in front of resource handlers.
async fn fake_auth(mut request: Request<Body>, next: Next) -> Response {
    let user = request
        .headers()
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    if let Some(id) = user {
        request.extensions_mut().insert(AuthenticatedUser::new(id));
    }
    next.run(request).await
}

fn users_api() -> (Router, UsersApi) {
    let api = UsersApi {
        cache: users(Arc::new(MemoryStore::default())),
        rows: Arc::new(Mutex::new(vec![ana()])),
        reads: Arc::new(AtomicUsize::new(0)),
    };
    let router = Router::new()
        .route("/api/v1/users", get(list_users).post(create_user))
        .layer(middleware::from_fn(fake_auth))
        .with_state(api.clone());
    (router, api)
}

async fn call(
    router: &Router,
    method: &str,
    user: u64,
    body: Option<&User>,
) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder()
        .uri("/api/v1/users")
        .method(method)
        .header("x-user-id", user.to_string())
        .header("content-type", "application/json");
    let body = match body {
        Some(user) => Body::from(serde_json::to_vec(user).unwrap()),
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn listing_is_served_from_cache_until_a_write() {
    let (router, api) = users_api();

    let (status, first) = call(&router, "GET", 5, None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, second) = call(&router, "GET", 5, None).await;
    assert_eq!(first, second);
    assert_eq!(api.reads.load(Ordering::SeqCst), 1);

    let marta = User {
        id: 9,
        name: "Marta".to_string(),
    };
    let (status, _) = call(&router, "POST", 5, Some(&marta)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, after) = call(&router, "GET", 5, None).await;
    let page: Page<User> = serde_json::from_slice(&after).unwrap();
    assert_eq!(page.count, 2);
    assert_eq!(api.reads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn each_user_gets_its_own_entry() {
    let (router, api) = users_api();

    call(&router, "GET", 5, None).await;
    call(&router, "GET", 7, None).await;
    call(&router, "GET", 7, None).await;

    assert_eq!(api.reads.load(Ordering::SeqCst), 2);
    let key = api.cache.cache_key(&listing(7));
    assert!(api.cache.get::<Page<User>>(&key).await.is_some());
}
