//! Document analysis handler.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info_span, Instrument};
use uuid::Uuid;

use super::super::AppState;
use crate::analysis::{document_from_body, AnalysisError};

/// Analyze a document submitted as `{"documentContent": "..."}`.
///
/// The body is taken raw so that malformed JSON is reported in the same
/// `500 {error}` shape as every other failure.
pub async fn analyze_document(State(state): State<AppState>, body: Bytes) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!("analyze", %request_id);

    let result = async {
        let document = document_from_body(&body)?;
        state.analysis.analyze(&document).await
    }
    .instrument(span.clone())
    .await;

    match result {
        Ok(analysis) => Json(analysis).into_response(),
        Err(e) => span.in_scope(|| error_response(&e)),
    }
}

/// Empty 200 for `OPTIONS` requests that are not CORS preflights.
pub async fn preflight() -> impl IntoResponse {
    StatusCode::OK
}

fn error_response(err: &AnalysisError) -> Response {
    error!("Analysis failed: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": err.public_message() })),
    )
        .into_response()
}
