// Web server — Axum HTTP boundary for the social link registry.
//
// All endpoints serve JSON. The verification route is mounted both at the
// root and under /api, where existing front-ends already post to it.

use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::db::RegistryStore;

pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RegistryStore>,
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(store: Arc<dyn RegistryStore>, port: u16, bind: &str) -> Result<()> {
    let app = build_router(AppState { store });

    let addr = format!("{bind}:{port}");
    info!("socialguard listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/verify-socials", post(handlers::verify::verify_socials))
        .route("/api/verify-socials", post(handlers::verify::verify_socials))
        .route("/api/socials", get(handlers::lookup::lookup_link))
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check — always returns 200 OK.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}
