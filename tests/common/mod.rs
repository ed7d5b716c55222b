//! Common test utilities for the auth server test suite

#![allow(dead_code)]

pub mod flaky_store;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use rax_auth_server::auth::{CredentialHasher, Verifier};
use rax_auth_server::config::{HashingConfig, HttpConfig, InputLimits, StoreConfig};
use rax_auth_server::server::{LoginResponse, router};
use rax_auth_server::storage::{AccountStore, SqliteAccountStore};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// Cheap Argon2 parameters so tests stay fast
pub fn fast_hasher() -> CredentialHasher {
    CredentialHasher::new(&HashingConfig {
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap()
}

/// SQLite store in a fresh temporary directory
pub fn sqlite_store() -> (TempDir, Arc<SqliteAccountStore>) {
    let tmp = TempDir::new().unwrap();
    let config = StoreConfig {
        database_path: tmp.path().join("accounts.db").to_string_lossy().into_owned(),
        max_connections: 4,
        ..StoreConfig::default()
    };
    let store = SqliteAccountStore::open(&config).unwrap();
    (tmp, Arc::new(store))
}

/// Router over `store` with test limits
pub fn app<S: AccountStore>(store: Arc<S>, hasher: CredentialHasher) -> Router {
    let verifier = Arc::new(Verifier::new(store, hasher, InputLimits::default(), 500));
    router(verifier, &HttpConfig::default())
}

/// Like `app`, but a whole login must finish within `deadline_ms`
pub fn app_with_deadline<S: AccountStore>(
    store: Arc<S>,
    hasher: CredentialHasher,
    deadline_ms: u64,
) -> Router {
    let verifier = Verifier::new(store, hasher, InputLimits::default(), 5_000)
        .with_request_timeout_ms(deadline_ms);
    router(Arc::new(verifier), &HttpConfig::default())
}

/// POST a raw body to /api/login and decode the JSON reply
pub async fn post_login(app: &Router, body: &str) -> (StatusCode, LoginResponse) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/login")
        .header("content-type", "application/json")
        .header("content-length", body.len())
        .body(Body::from(body.to_owned()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let parsed = serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("status {status}: body is not a login response ({e})"));
    (status, parsed)
}

/// POST username/password as JSON
pub async fn login(app: &Router, username: &str, password: &str) -> (StatusCode, LoginResponse) {
    let body = serde_json::json!({ "username": username, "password": password }).to_string();
    post_login(app, &body).await
}
