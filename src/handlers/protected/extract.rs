use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extract::{extract_content, ExtractionOutcome};

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub url: String,
}

/// POST /api/extract - pull readable content out of a web page
///
/// Expected Input:
/// ```json
/// { "url": "https://example.com/article" }
/// ```
///
/// Always answers 200 once the request is well formed; collaborator
/// failures come back as `{ "success": false, "error": "..." }`.
pub async fn extract_post(
    State(state): State<AppState>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<ExtractionOutcome>, ApiError> {
    let Json(payload) = payload?;
    let url = payload.url.trim();
    if url.is_empty() {
        return Err(ApiError::bad_request("A URL is required"));
    }

    Ok(Json(extract_content(state.extractor.as_ref(), url).await))
}
