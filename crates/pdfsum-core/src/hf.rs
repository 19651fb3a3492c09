//! Hugging Face inference API backend.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::InferenceConfig;
use crate::model::{GenerationParams, ModelError, ModelId, SummarizationModel};

#[derive(Serialize)]
struct SummarizationRequest<'a> {
    inputs: &'a str,
    parameters: Parameters,
}

#[derive(Serialize)]
struct Parameters {
    min_length: u32,
    max_length: u32,
    do_sample: bool,
}

#[derive(Deserialize)]
struct SummaryItem {
    summary_text: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// A summarization model hosted behind the Hugging Face inference API.
pub struct HuggingFaceModel {
    client: reqwest::Client,
    model: ModelId,
    url: String,
    api_token: Option<String>,
    timeout: Duration,
}

impl fmt::Debug for HuggingFaceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuggingFaceModel")
            .field("model", &self.model.repo_id())
            .field("url", &self.url)
            .field("api_token", &self.api_token.as_deref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HuggingFaceModel {
    pub fn new(model: ModelId, config: &InferenceConfig, client: reqwest::Client) -> Self {
        let url = format!(
            "{}/{}",
            config.endpoint.trim_end_matches('/'),
            model.repo_id()
        );
        Self {
            client,
            model,
            url,
            api_token: config.api_token.clone(),
            timeout: config.timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SummarizationModel for HuggingFaceModel {
    fn name(&self) -> &str {
        self.model.repo_id()
    }

    fn summarize<'a>(
        &'a self,
        text: &'a str,
        params: GenerationParams,
    ) -> Pin<Box<dyn Future<Output = Result<String, ModelError>> + Send + 'a>> {
        Box::pin(async move {
            let body = SummarizationRequest {
                inputs: text,
                parameters: Parameters {
                    min_length: params.min_length,
                    max_length: params.max_length,
                    do_sample: false,
                },
            };

            let mut req = self.client.post(&self.url).timeout(self.timeout).json(&body);
            if let Some(ref token) = self.api_token {
                req = req.bearer_auth(token);
            }

            let resp = req.send().await?;
            let status = resp.status();
            if !status.is_success() {
                let raw = resp.text().await.unwrap_or_default();
                let message = error_message(&raw);
                tracing::warn!(model = self.name(), status = status.as_u16(), %message, "model request failed");
                return Err(match status.as_u16() {
                    404 | 503 => ModelError::Unavailable {
                        model: self.name().to_string(),
                        message,
                    },
                    code => ModelError::Status {
                        status: code,
                        message,
                    },
                });
            }

            let raw = resp.text().await?;
            let items: Vec<SummaryItem> = serde_json::from_str(&raw)
                .map_err(|e| ModelError::MalformedResponse(e.to_string()))?;

            items
                .into_iter()
                .next()
                .map(|item| item.summary_text)
                .ok_or(ModelError::EmptyResponse)
        })
    }
}

/// Pull the `error` field out of an API error body, falling back to the
/// (shortened) raw body.
fn error_message(raw: &str) -> String {
    if let Ok(body) = serde_json::from_str::<ErrorBody>(raw) {
        return body.error;
    }
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "no response body".to_string();
    }
    trimmed.chars().take(200).collect()
}
