//! Summarization model trait and the set of selectable models.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The summarization models a user can pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModelId {
    /// Small general-purpose model.
    #[default]
    #[serde(rename = "t5-small")]
    T5Small,
    /// Large model fine-tuned on news articles.
    #[serde(rename = "facebook/bart-large-cnn")]
    BartLargeCnn,
}

impl ModelId {
    pub const ALL: [ModelId; 2] = [ModelId::T5Small, ModelId::BartLargeCnn];

    /// Hugging Face repository id.
    pub fn repo_id(&self) -> &'static str {
        match self {
            ModelId::T5Small => "t5-small",
            ModelId::BartLargeCnn => "facebook/bart-large-cnn",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.repo_id())
    }
}

impl FromStr for ModelId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelId::ALL
            .into_iter()
            .find(|m| m.repo_id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::UnknownModel(s.to_string()))
    }
}

/// Generation bounds passed to the model. Decoding is always greedy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationParams {
    pub min_length: u32,
    pub max_length: u32,
}

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("unknown model: {0}")]
    UnknownModel(String),
    #[error("model {model} is unavailable: {message}")]
    Unavailable { model: String, message: String },
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("model returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected model response: {0}")]
    MalformedResponse(String),
    #[error("model returned no summary")]
    EmptyResponse,
}

/// A summarization model backend.
pub trait SummarizationModel: Send + Sync {
    /// The model id this handle serves (e.g. "t5-small").
    fn name(&self) -> &str;

    /// Summarize `text`, returning the first generated summary.
    fn summarize<'a>(
        &'a self,
        text: &'a str,
        params: GenerationParams,
    ) -> Pin<Box<dyn Future<Output = Result<String, ModelError>> + Send + 'a>>;
}
