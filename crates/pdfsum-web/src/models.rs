use axum::response::sse::Event;
use serde::{Deserialize, Serialize};

use pdfsum_core::{ExtractedText, MAX_INPUT_WORDS, PageProgress, SummarizerError, SummaryOutcome};

// ── SSE Event Structs ───────────────────────────────────────────────────

#[derive(Serialize)]
pub struct StartedEvent {
    pub filename: String,
    pub bytes: usize,
}

#[derive(Serialize)]
pub struct PageEvent {
    pub page: usize,
    pub total: usize,
}

impl From<PageProgress> for PageEvent {
    fn from(p: PageProgress) -> Self {
        PageEvent {
            page: p.page,
            total: p.total,
        }
    }
}

#[derive(Serialize)]
pub struct ExtractedEvent {
    pub text: String,
    pub pages: usize,
    pub words: usize,
    pub exceeds_limit: bool,
    pub max_words: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<ExtractedText> for ExtractedEvent {
    fn from(text: ExtractedText) -> Self {
        let exceeds_limit = text.exceeds_word_limit();
        ExtractedEvent {
            pages: text.pages(),
            words: text.word_count(),
            exceeds_limit,
            max_words: MAX_INPUT_WORDS,
            warning: exceeds_limit.then(pdfsum_core::truncation_notice),
            text: text.into_string(),
        }
    }
}

/// Error payload for SSE `error` events and JSON error responses.
#[derive(Debug, Serialize)]
pub struct ErrorEvent {
    pub kind: String,
    pub message: String,
}

impl From<&SummarizerError> for ErrorEvent {
    fn from(e: &SummarizerError) -> Self {
        ErrorEvent {
            kind: e.kind().to_string(),
            message: e.to_string(),
        }
    }
}

// ── Summarize DTOs ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub text: Option<String>,
    pub model: Option<String>,
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
}

#[derive(Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
    pub model: String,
    pub truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<SummaryOutcome> for SummarizeResponse {
    fn from(outcome: SummaryOutcome) -> Self {
        SummarizeResponse {
            warning: outcome.truncation_warning(),
            model: outcome.model.to_string(),
            truncated: outcome.truncated,
            summary: outcome.summary,
        }
    }
}

// ── SSE Helper ──────────────────────────────────────────────────────────

pub fn sse_event<T: Serialize>(event_type: &str, data: &T) -> Event {
    Event::default()
        .event(event_type)
        .data(serde_json::to_string(data).unwrap_or_default())
}
