// POST /verify-socials — check a token's socials for copy-cat reuse.
//
// Body: { "tokenMint": "...", "socials": { "twitter": "...", ... } }
//
// Returns 200 with { status, duplicateLinks } on success,
// 400 for malformed bodies and validation failures,
// 500 with a generic message for storage failures (detail goes to the log).

use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::registry::{self, VerifyError};
use crate::web::{api_error, AppState};

/// A non-string tokenMint reads as missing; a non-string link reads as
/// "not submitted".
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct VerifySocialsRequest {
    #[serde(default)]
    pub token_mint: Option<Value>,
    #[serde(default)]
    pub socials: Option<serde_json::Map<String, Value>>,
}

impl VerifySocialsRequest {
    fn token_mint(&self) -> &str {
        match &self.token_mint {
            Some(Value::String(s)) => s,
            _ => "",
        }
    }

    fn links(&self) -> BTreeMap<String, Option<String>> {
        self.socials
            .iter()
            .flatten()
            .map(|(platform, link)| {
                let link = match link {
                    Value::String(s) => Some(s.clone()),
                    _ => None,
                };
                (platform.clone(), link)
            })
            .collect()
    }
}

/// POST /verify-socials
pub async fn verify_socials(
    State(state): State<AppState>,
    payload: Result<Json<VerifySocialsRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            return api_error(StatusCode::BAD_REQUEST, &rejection.body_text());
        }
    };

    let links = request.links();
    match registry::verify_socials(state.store.as_ref(), request.token_mint(), &links).await {
        Ok(result) => Json(result).into_response(),
        Err(VerifyError::Validation(e)) => api_error(StatusCode::BAD_REQUEST, &e.to_string()),
        Err(e) => {
            tracing::error!(error = %e, token_mint = %request.token_mint(), "Error verifying socials");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}
