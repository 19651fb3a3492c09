use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use pdfsum_core::SummarizerError;

use crate::models::ErrorEvent;

/// A [`SummarizerError`] rendered as a JSON error response.
#[derive(Debug)]
pub struct ApiError(pub SummarizerError);

impl From<SummarizerError> for ApiError {
    fn from(e: SummarizerError) -> Self {
        ApiError(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            SummarizerError::NoDocument | SummarizerError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            SummarizerError::EmptyDocument | SummarizerError::Extraction(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            SummarizerError::Model(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, "request rejected");
        }
        (status, Json(ErrorEvent::from(&self.0))).into_response()
    }
}
