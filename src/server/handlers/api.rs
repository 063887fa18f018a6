//! Service status handlers.

use axum::{extract::State, response::IntoResponse, Json};

use super::super::AppState;

/// Health check, reporting which completion provider is active.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "provider": state.analysis.provider_name(),
    }))
}
