use std::time::Duration;

use thiserror::Error;

pub mod backend;
pub mod config_file;
pub mod extract;
pub mod hf;
pub mod mock;
pub mod model;
pub mod registry;
pub mod summarize;

// Re-export for convenience
pub use backend::{BackendError, PdfBackend};
pub use extract::{extract_text_from_bytes, extract_text_from_pdf};
pub use model::{GenerationParams, ModelError, ModelId, SummarizationModel};
pub use registry::ModelRegistry;
pub use summarize::{MAX_INPUT_WORDS, Truncated, summarize_text, truncate_words};

/// Smallest summary length the interactive controls offer.
pub const MIN_LENGTH_BOUND: u32 = 50;
/// Largest summary length the interactive controls offer.
pub const MAX_LENGTH_BOUND: u32 = 200;
pub const DEFAULT_MIN_LENGTH: u32 = 75;
pub const DEFAULT_MAX_LENGTH: u32 = 100;

/// Default Hugging Face inference endpoint. Model ids are appended as path segments.
pub const DEFAULT_INFERENCE_ENDPOINT: &str = "https://router.huggingface.co/hf-inference/models";

#[derive(Error, Debug)]
pub enum SummarizerError {
    #[error("The uploaded PDF has no readable text.")]
    EmptyDocument,
    #[error("Failed to extract text from PDF: {0}")]
    Extraction(#[from] BackendError),
    #[error("Summarization failed: {0}")]
    Model(#[from] ModelError),
    #[error("No document available to summarize. Upload a PDF first.")]
    NoDocument,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl SummarizerError {
    /// Stable machine-readable name, used in JSON error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            SummarizerError::EmptyDocument => "empty_document",
            SummarizerError::Extraction(_) => "extraction",
            SummarizerError::Model(_) => "model",
            SummarizerError::NoDocument => "no_document",
            SummarizerError::InvalidRequest(_) => "invalid_request",
        }
    }
}

/// An uploaded PDF. Lives for the duration of one request.
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Per-page progress reported by a [`PdfBackend`] while it walks the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageProgress {
    /// 1-based index of the page that was just read.
    pub page: usize,
    pub total: usize,
}

/// Text recovered from a PDF: the page texts concatenated in page order.
///
/// Only constructed through [`ExtractedText::from_pages`], which rejects
/// documents without any non-whitespace character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    text: String,
    pages: usize,
}

impl ExtractedText {
    pub fn from_pages(pages: Vec<String>) -> Result<Self, SummarizerError> {
        let page_count = pages.len();
        let text = pages.concat();
        if text.trim().is_empty() {
            return Err(SummarizerError::EmptyDocument);
        }
        Ok(Self {
            text,
            pages: page_count,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Whether summarizing this text will truncate it to [`MAX_INPUT_WORDS`].
    pub fn exceeds_word_limit(&self) -> bool {
        self.word_count() > MAX_INPUT_WORDS
    }
}

/// Validated (min, max) summary length bounds, in model tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthRange {
    min: u32,
    max: u32,
}

impl LengthRange {
    /// Accepts any `1 <= min <= max`.
    pub fn new(min: u32, max: u32) -> Result<Self, SummarizerError> {
        if min == 0 {
            return Err(SummarizerError::InvalidRequest(
                "min_length must be positive".into(),
            ));
        }
        if min > max {
            return Err(SummarizerError::InvalidRequest(format!(
                "min_length ({min}) exceeds max_length ({max})"
            )));
        }
        Ok(Self { min, max })
    }

    /// Like [`LengthRange::new`], but also requires both ends to lie within
    /// [`MIN_LENGTH_BOUND`]..=[`MAX_LENGTH_BOUND`].
    pub fn bounded(min: u32, max: u32) -> Result<Self, SummarizerError> {
        let bounds = MIN_LENGTH_BOUND..=MAX_LENGTH_BOUND;
        if !bounds.contains(&min) || !bounds.contains(&max) {
            return Err(SummarizerError::InvalidRequest(format!(
                "summary length must be between {MIN_LENGTH_BOUND} and {MAX_LENGTH_BOUND}"
            )));
        }
        Self::new(min, max)
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }
}

impl Default for LengthRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_LENGTH,
            max: DEFAULT_MAX_LENGTH,
        }
    }
}

/// Everything needed for one summarization call.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub text: String,
    pub model: ModelId,
    pub lengths: LengthRange,
}

impl SummaryRequest {
    /// Fails with [`SummarizerError::NoDocument`] when `text` is blank.
    pub fn new(
        text: impl Into<String>,
        model: ModelId,
        lengths: LengthRange,
    ) -> Result<Self, SummarizerError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SummarizerError::NoDocument);
        }
        Ok(Self {
            text,
            model,
            lengths,
        })
    }
}

/// Result of a successful summarization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOutcome {
    pub summary: String,
    pub model: ModelId,
    /// The input was cut to [`MAX_INPUT_WORDS`] before submission.
    pub truncated: bool,
}

impl SummaryOutcome {
    pub fn truncation_warning(&self) -> Option<String> {
        self.truncated.then(truncation_notice)
    }
}

/// User-facing notice shown when input is cut to the word ceiling.
pub fn truncation_notice() -> String {
    format!(
        "The input text exceeds {MAX_INPUT_WORDS} words. Truncating to fit the model's limits."
    )
}

/// Connection settings for the hosted summarization models.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub endpoint: String,
    pub api_token: Option<String>,
    pub timeout: Duration,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_INFERENCE_ENDPOINT.to_string(),
            api_token: None,
            timeout: Duration::from_secs(120),
        }
    }
}

/// Resolved runtime configuration shared by the CLI and the web server.
#[derive(Debug, Clone)]
pub struct Config {
    pub inference: InferenceConfig,
    pub default_model: ModelId,
    pub default_lengths: LengthRange,
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inference: InferenceConfig::default(),
            default_model: ModelId::default(),
            default_lengths: LengthRange::default(),
            host: "127.0.0.1".to_string(),
            port: 8501,
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}
