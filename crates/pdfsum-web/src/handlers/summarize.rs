use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use std::sync::Arc;

use pdfsum_core::{LengthRange, ModelId, SummarizerError, SummaryRequest};

use crate::error::ApiError;
use crate::models::{SummarizeRequest, SummarizeResponse};
use crate::state::AppState;

/// Summarize text previously returned by `/extract`.
///
/// Missing model or lengths fall back to the configured defaults. Length
/// bounds must stay within the range offered by the page.
pub async fn summarize(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let Json(req) = body.map_err(|e| SummarizerError::InvalidRequest(e.body_text()))?;

    let model = match req.model.as_deref() {
        Some(name) => name
            .parse::<ModelId>()
            .map_err(|e| SummarizerError::InvalidRequest(e.to_string()))?,
        None => state.config.default_model,
    };

    let defaults = state.config.default_lengths;
    let lengths = LengthRange::bounded(
        req.min_length.unwrap_or(defaults.min()),
        req.max_length.unwrap_or(defaults.max()),
    )?;

    let request = SummaryRequest::new(req.text.unwrap_or_default(), model, lengths)?;
    let outcome = pdfsum_core::summarize_text(&state.models, &request).await?;

    Ok(Json(SummarizeResponse::from(outcome)))
}
