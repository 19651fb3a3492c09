use std::borrow::Cow;

use crate::model::GenerationParams;
use crate::registry::ModelRegistry;
use crate::{SummarizerError, SummaryOutcome, SummaryRequest};

/// Word ceiling for model input. Longer texts are cut to this many words.
pub const MAX_INPUT_WORDS: usize = 1024;

/// Text after applying the word ceiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncated<'a> {
    pub text: Cow<'a, str>,
    pub truncated: bool,
    /// Whitespace-separated word count of the input before truncation.
    pub original_words: usize,
}

/// Keep the first `limit` whitespace-separated words of `text`.
///
/// Text within the limit is returned untouched. Longer text is rebuilt from
/// its first `limit` words joined by single spaces.
pub fn truncate_words(text: &str, limit: usize) -> Truncated<'_> {
    let original_words = text.split_whitespace().count();
    if original_words <= limit {
        return Truncated {
            text: Cow::Borrowed(text),
            truncated: false,
            original_words,
        };
    }

    let kept = text.split_whitespace().take(limit).collect::<Vec<_>>().join(" ");
    Truncated {
        text: Cow::Owned(kept),
        truncated: true,
        original_words,
    }
}

/// Summarize `request.text` with the requested model.
///
/// The text is cut to [`MAX_INPUT_WORDS`] first; the outcome records whether
/// that happened. Model failures come back as [`SummarizerError::Model`];
/// there is no fallback to another model.
pub async fn summarize_text(
    registry: &ModelRegistry,
    request: &SummaryRequest,
) -> Result<SummaryOutcome, SummarizerError> {
    if request.text.trim().is_empty() {
        return Err(SummarizerError::NoDocument);
    }

    let input = truncate_words(&request.text, MAX_INPUT_WORDS);
    if input.truncated {
        tracing::warn!(
            words = input.original_words,
            limit = MAX_INPUT_WORDS,
            "input exceeds word limit, truncating"
        );
    }

    let params = GenerationParams {
        min_length: request.lengths.min(),
        max_length: request.lengths.max(),
    };

    let model = registry.get(request.model).await?;
    tracing::debug!(
        model = model.name(),
        min_length = params.min_length,
        max_length = params.max_length,
        "summarizing"
    );

    let summary = model.summarize(&input.text, params).await.inspect_err(|e| {
        tracing::warn!(model = model.name(), error = %e, "summarization failed");
    })?;

    tracing::info!(model = model.name(), chars = summary.len(), "summarization complete");

    Ok(SummaryOutcome {
        summary,
        model: request.model,
        truncated: input.truncated,
    })
}
