//! HTTP boundary tests — requests go through the real router via
//! `tower::ServiceExt::oneshot`, backed by an in-memory store.

#![cfg(feature = "web")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use anyhow::Result;
use async_trait::async_trait;
use socialguard::db::memory::MemoryStore;
use socialguard::db::models::{ClaimOutcome, RecordCounts, SocialLinkRecord};
use socialguard::db::RegistryStore;
use socialguard::web::{build_router, AppState};

/// Backend detail that must reach the log but never a response body.
const BACKEND_FAILURE: &str = "db down: password authentication failed for user registry";

/// Every call fails the way an unreachable database would.
struct UnavailableStore;

#[async_trait]
impl RegistryStore for UnavailableStore {
    async fn lookup(&self, _normalized_link: &str) -> Result<Option<SocialLinkRecord>> {
        anyhow::bail!(BACKEND_FAILURE)
    }
    async fn insert_if_absent(&self, _record: &SocialLinkRecord) -> Result<ClaimOutcome> {
        anyhow::bail!(BACKEND_FAILURE)
    }
    async fn links_for_token(&self, _token_mint: &str) -> Result<Vec<SocialLinkRecord>> {
        anyhow::bail!(BACKEND_FAILURE)
    }
    async fn table_count(&self) -> Result<i64> {
        anyhow::bail!(BACKEND_FAILURE)
    }
    async fn record_counts(&self) -> Result<RecordCounts> {
        anyhow::bail!(BACKEND_FAILURE)
    }
    async fn all_records(&self) -> Result<Vec<SocialLinkRecord>> {
        anyhow::bail!(BACKEND_FAILURE)
    }
}

fn unavailable_app() -> Router {
    build_router(AppState {
        store: Arc::new(UnavailableStore),
    })
}

fn app(store: Arc<MemoryStore>) -> Router {
    build_router(AppState { store })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn json_post(path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn post_json(app: Router, path: &str, body: &str) -> (StatusCode, Value) {
    let (status, text) = send(app, json_post(path, body)).await;
    (status, serde_json::from_str(&text).unwrap_or(Value::Null))
}

async fn get(app: Router, path: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    let (status, text) = send(app, request).await;
    (status, serde_json::from_str(&text).unwrap_or(Value::Null))
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = get(app(Arc::new(MemoryStore::new())), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn verify_clean_then_copy_cat() {
    let store = Arc::new(MemoryStore::new());

    let (status, body) = post_json(
        app(store.clone()),
        "/verify-socials",
        r#"{"tokenMint":"TOKEN_A","socials":{"twitter":"https://twitter.com/foo/"}}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "CLEAN", "duplicateLinks": {} }));

    let (status, body) = post_json(
        app(store.clone()),
        "/api/verify-socials",
        r#"{"tokenMint":"TOKEN_B","socials":{"twitter":"https://twitter.com/foo"}}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "status": "COPY_CAT", "duplicateLinks": { "twitter": "TOKEN_A" } })
    );
}

#[tokio::test]
async fn empty_and_null_links_are_skipped() {
    let store = Arc::new(MemoryStore::new());
    let (status, body) = post_json(
        app(store.clone()),
        "/verify-socials",
        r#"{"tokenMint":"TOKEN_A","socials":{"telegram":"","website":null,"twitter":42}}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "CLEAN");
    assert_eq!(store.record_counts().await.unwrap().total(), 0);
}

#[tokio::test]
async fn missing_socials_is_clean() {
    let (status, body) = post_json(
        app(Arc::new(MemoryStore::new())),
        "/verify-socials",
        r#"{"tokenMint":"TOKEN_A"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "CLEAN", "duplicateLinks": {} }));
}

#[tokio::test]
async fn unknown_platform_is_400_with_no_writes() {
    let store = Arc::new(MemoryStore::new());
    let (status, body) = post_json(
        app(store.clone()),
        "/verify-socials",
        r#"{"tokenMint":"TOKEN_A","socials":{"twitter":"https://x.com/a","discord":"https://discord.gg/x"}}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("discord"));
    assert_eq!(store.record_counts().await.unwrap().total(), 0);
}

#[tokio::test]
async fn missing_token_mint_is_400() {
    for body in [
        r#"{"socials":{"twitter":"https://x.com/a"}}"#,
        r#"{"tokenMint":"","socials":{"twitter":"https://x.com/a"}}"#,
        r#"{"tokenMint":7,"socials":{"twitter":"https://x.com/a"}}"#,
    ] {
        let (status, response) =
            post_json(app(Arc::new(MemoryStore::new())), "/verify-socials", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(response["error"], "tokenMint is required", "{body}");
    }
}

#[tokio::test]
async fn malformed_json_is_400() {
    let (status, body) = post_json(
        app(Arc::new(MemoryStore::new())),
        "/verify-socials",
        "{not json",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn lookup_finds_normalized_record() {
    let store = Arc::new(MemoryStore::new());
    post_json(
        app(store.clone()),
        "/verify-socials",
        r#"{"tokenMint":"TOKEN_A","socials":{"website":"https://Project.xyz/"}}"#,
    )
    .await;

    let (status, body) = get(app(store.clone()), "/api/socials?link=https://project.xyz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["normalizedLink"], "https://project.xyz");
    assert_eq!(body["platformType"], "website");
    assert_eq!(body["firstSeenInToken"], "TOKEN_A");
    assert!(body["firstSeenAt"].is_string());

    let (status, _) = get(app(store.clone()), "/api/socials?link=https://other.xyz").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(app(store), "/api/socials").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_content_type_is_400() {
    let request = Request::builder()
        .method("POST")
        .uri("/verify-socials")
        .body(Body::from(r#"{"tokenMint":"TOKEN_A","socials":{}}"#))
        .unwrap();
    let (status, text) = send(app(Arc::new(MemoryStore::new())), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&text).unwrap();
    assert!(body["error"].is_string());
}

// ============================================================
// Storage failures: generic 500, backend detail stays in the log
// ============================================================

#[tokio::test]
async fn verify_storage_failure_is_generic_500() {
    let (status, text) = send(
        unavailable_app(),
        json_post(
            "/verify-socials",
            r#"{"tokenMint":"TOKEN_A","socials":{"twitter":"https://x.com/foo"}}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        serde_json::from_str::<Value>(&text).unwrap(),
        json!({ "error": "Internal server error" })
    );
    assert!(!text.contains("db down"), "leaked backend detail: {text}");
}

#[tokio::test]
async fn verify_validation_wins_over_storage_failure() {
    // Validation runs before any store access, so a broken store still
    // yields the caller-facing 400.
    let (status, body) = post_json(
        unavailable_app(),
        "/verify-socials",
        r#"{"tokenMint":"","socials":{"twitter":"https://x.com/foo"}}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "tokenMint is required");
}

#[tokio::test]
async fn lookup_storage_failure_is_generic_500() {
    let request = Request::builder()
        .uri("/api/socials?link=https://x.com/foo")
        .body(Body::empty())
        .unwrap();
    let (status, text) = send(unavailable_app(), request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        serde_json::from_str::<Value>(&text).unwrap(),
        json!({ "error": "Internal server error" })
    );
    assert!(!text.contains("db down"), "leaked backend detail: {text}");
}
