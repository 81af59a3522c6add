// GET /api/socials?link=... — who claimed this link first?
//
// The raw link is normalized the same way verification does, so any
// case/trailing-slash variant finds the record. Read-only: never claims.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::registry::normalize;
use crate::web::{api_error, AppState};

#[derive(Deserialize, Default)]
pub struct LookupQuery {
    pub link: Option<String>,
}

pub async fn lookup_link(
    State(state): State<AppState>,
    Query(params): Query<LookupQuery>,
) -> Response {
    let Some(key) = params.link.as_deref().and_then(normalize) else {
        return api_error(StatusCode::BAD_REQUEST, "link is required");
    };

    match state.store.lookup(&key).await {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => api_error(StatusCode::NOT_FOUND, "Link not claimed"),
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), link = %key, "DB error looking up link");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}
