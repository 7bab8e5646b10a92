// HTTP request handlers
use crate::domain::dashboard::{DashboardState, Document};
use crate::domain::error::SubmitError;
use crate::domain::favicon::fallback_glyph;
use crate::infrastructure::http_response::no_cache_file_response;
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct FaviconQuery {
    pub url: String,
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FaviconAnswer {
    pub icon_url: Option<String>,
    pub glyph: String,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current whole-state document. Never fails: unreadable storage yields the default.
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<DashboardState> {
    let document = match state.repository.load().await {
        Ok(Some(mut document)) => {
            document.repair();
            document
        }
        Ok(None) => DashboardState::default(),
        Err(e) => {
            tracing::error!(error = %e, "Error loading state, serving the default");
            DashboardState::default()
        }
    };

    Json(document)
}

/// Whole-document replace
pub async fn post_state(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let document = match DashboardState::from_submitted(&body) {
        Ok(document) => document,
        Err(SubmitError::InvalidJson(e)) => {
            tracing::warn!(error = %e, "Invalid JSON received in POST request");
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Invalid JSON" })))
                .into_response();
        }
        Err(e) => {
            tracing::warn!(error = %e, "Invalid POST data");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("Bad Request: {}", e) })),
            )
                .into_response();
        }
    };

    match state.repository.save(&document).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Error saving state");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal Server Error" })),
            )
                .into_response()
        }
    }
}

/// Icon for a page url, plus the glyph to show when there is none
pub async fn get_favicon(
    Query(query): Query<FaviconQuery>,
    State(state): State<Arc<AppState>>,
) -> Json<FaviconAnswer> {
    let icon_url = state.favicons.resolve(&query.url).await;
    let glyph = fallback_glyph(query.name.as_deref().unwrap_or(&query.url));

    Json(FaviconAnswer { icon_url, glyph })
}

/// Wallpaper image, re-read from disk on every request
pub async fn get_wallpaper(State(state): State<Arc<AppState>>) -> Response {
    match no_cache_file_response(&state.wallpaper_path).await {
        Ok(response) => response,
        Err(status) => (status, "Wallpaper file not found").into_response(),
    }
}
