//! Wrapper behavior against a live mock backend: deduplication, 401
//! recovery, login bypass, and envelope error extraction.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use axum::routing::{get, post};
use serde_json::{Value, json};

use crewdeck_api_client::{ApiClient, ApiConfig, ApiError};
use crewdeck_types::TokenPair;

#[derive(Default)]
struct Backend {
    me_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
    roles_calls: AtomicUsize,
    /// Bearer value `/me` and the protected route accept.
    accepted_token: std::sync::Mutex<String>,
    /// When false, `/api/auth/refresh` answers `success: false`.
    refresh_succeeds: std::sync::atomic::AtomicBool,
    /// When set, the protected route answers 401 for every bearer,
    /// refreshed or not (revoked account).
    lock_out: std::sync::atomic::AtomicBool,
}

impl Backend {
    fn new(accepted_token: &str, refresh_succeeds: bool) -> Arc<Self> {
        let backend = Self {
            accepted_token: std::sync::Mutex::new(accepted_token.to_string()),
            ..Default::default()
        };
        backend
            .refresh_succeeds
            .store(refresh_succeeds, Ordering::SeqCst);
        Arc::new(backend)
    }

    fn bearer_ok(&self, headers: &HeaderMap) -> bool {
        let expected = format!("Bearer {}", self.accepted_token.lock().unwrap());
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == expected)
    }
}

async fn me(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    backend.me_calls.fetch_add(1, Ordering::SeqCst);
    // Hold the request briefly so concurrent callers overlap.
    tokio::time::sleep(Duration::from_millis(50)).await;
    if !backend.bearer_ok(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Invalid token" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "user": { "id": "u1", "email": "owner@acme.test", "isVerified": true }
        })),
    )
}

async fn refresh(State(backend): State<Arc<Backend>>) -> (StatusCode, Json<Value>) {
    backend.refresh_calls.fetch_add(1, Ordering::SeqCst);
    if !backend.refresh_succeeds.load(Ordering::SeqCst) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Refresh token expired" })),
        );
    }
    *backend.accepted_token.lock().unwrap() = "fresh".to_string();
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": { "tokens": { "accessToken": "fresh", "refreshToken": "r2" } }
        })),
    )
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["password"] == "correct" {
        return (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "tokens": { "accessToken": "fresh", "refreshToken": "r1" },
                    "user": { "id": "u1", "email": "owner@acme.test" }
                }
            })),
        );
    }
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "success": false, "message": "Invalid credentials" })),
    )
}

async fn roles(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    backend.roles_calls.fetch_add(1, Ordering::SeqCst);
    if backend.lock_out.load(Ordering::SeqCst) || !backend.bearer_ok(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Invalid token" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({ "success": true, "data": ["member", "admin"] })),
    )
}

async fn create_product() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "success": false, "message": "Name is required" })),
    )
}

async fn spawn_backend(backend: Arc<Backend>) -> String {
    let _ = dotenvy::dotenv();
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let app = Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/auth/refresh", post(refresh))
        .route("/api/auth/login", post(login))
        .route("/api/rbac/users/me/roles", get(roles))
        .route("/api/products", post(create_product))
        .with_state(backend);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(ApiConfig::with_base_url(base_url)).unwrap()
}

#[tokio::test]
async fn concurrent_session_validations_share_one_request() {
    let backend = Backend::new("fresh", true);
    let base = spawn_backend(Arc::clone(&backend)).await;
    let client = client(&base);
    client.token_store().set_tokens(TokenPair::new("fresh", "r1"));

    let (a, b) = tokio::join!(client.validate_session(), client.validate_session());
    assert_eq!(a.unwrap().id, "u1");
    assert_eq!(b.unwrap().id, "u1");
    assert_eq!(backend.me_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn expired_token_triggers_one_refresh_and_one_retry() {
    let backend = Backend::new("fresh", true);
    let base = spawn_backend(Arc::clone(&backend)).await;
    let client = client(&base);
    // A stale bearer that the backend rejects until refresh replaces it.
    client.token_store().set_tokens(TokenPair::new("stale", "r1"));
    client.token_store().mark_validated();

    let roles = client.my_roles().await.unwrap();
    assert_eq!(roles, ["member", "admin"]);
    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        client.token_store().access_token().as_deref(),
        Some("fresh")
    );
}

#[tokio::test]
async fn failed_refresh_expires_the_session_and_clears_tokens() {
    let backend = Backend::new("valid-only", false);
    let base = spawn_backend(Arc::clone(&backend)).await;
    let client = client(&base);
    client.token_store().set_tokens(TokenPair::new("stale", "r1"));
    client.token_store().mark_validated();

    let err = client.my_roles().await.unwrap_err();
    assert_eq!(err, ApiError::SessionExpired);
    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 1);
    assert!(!client.token_store().has_tokens());
}

#[tokio::test]
async fn second_unauthorized_after_refresh_clears_the_session() {
    // Refresh succeeds, but the account is revoked: the retried call is
    // rejected too. Recovery must stop there and drop the tokens.
    let backend = Backend::new("fresh", true);
    backend.lock_out.store(true, Ordering::SeqCst);
    let base = spawn_backend(Arc::clone(&backend)).await;
    let client = client(&base);
    client.token_store().set_tokens(TokenPair::new("stale", "r1"));
    client.token_store().mark_validated();

    let err = client.my_roles().await.unwrap_err();
    assert_eq!(err, ApiError::Unauthorized("Invalid token".into()));
    // One refresh, one retry, nothing more.
    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 1);
    assert_eq!(backend.roles_calls.load(Ordering::SeqCst), 2);
    assert!(!client.token_store().has_tokens());
}

#[tokio::test]
async fn failed_login_surfaces_the_message_without_refreshing() {
    let backend = Backend::new("fresh", true);
    let base = spawn_backend(Arc::clone(&backend)).await;
    let client = client(&base);

    let err = client.login("owner@acme.test", "wrong").await.unwrap_err();
    assert_eq!(err, ApiError::Unauthorized("Invalid credentials".into()));
    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn successful_login_returns_tokens_and_user() {
    let backend = Backend::new("fresh", true);
    let base = spawn_backend(Arc::clone(&backend)).await;
    let client = client(&base);

    let payload = client.login("owner@acme.test", "correct").await.unwrap();
    assert_eq!(payload.token_pair(), Some(TokenPair::new("fresh", "r1")));
    assert_eq!(
        payload.into_user().map(|u| u.email),
        Some("owner@acme.test".to_string())
    );
}

#[tokio::test]
async fn envelope_message_is_extracted_from_error_bodies() {
    let backend = Backend::new("fresh", true);
    let base = spawn_backend(Arc::clone(&backend)).await;
    let client = client(&base);
    client.token_store().set_tokens(TokenPair::new("fresh", "r1"));
    client.token_store().mark_validated();

    let input = crewdeck_api_client::endpoints::products::ProductInput {
        name: String::new(),
        description: None,
        price: 10.0,
        unit: None,
        is_active: true,
    };
    let err = client.create_product(&input).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Status {
            status: 422,
            message: "Name is required".into()
        }
    );
}
