//! Scripted summarization model for tests.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::model::{GenerationParams, ModelError, SummarizationModel};

/// A configurable mock response for [`MockModel`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Return this summary.
    Summary(String),
    /// Return the first `n` words of the input.
    Lead(usize),
    /// Fail as if the model could not be reached.
    Unavailable(String),
}

/// A call recorded by [`MockModel`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    pub text: String,
    pub params: GenerationParams,
}

/// A hand-rolled mock implementing [`SummarizationModel`].
///
/// Returns a fixed response, or a sequence of responses (the last one
/// repeats once exhausted), and records every call.
pub struct MockModel {
    name: String,
    responses: Mutex<Vec<MockResponse>>,
    fallback: MockResponse,
    calls: Mutex<Vec<RecordedCall>>,
    call_count: AtomicUsize,
}

impl MockModel {
    /// Create a mock that always returns `response`.
    pub fn new(name: impl Into<String>, response: MockResponse) -> Self {
        Self {
            name: name.into(),
            responses: Mutex::new(Vec::new()),
            fallback: response,
            calls: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Create a mock that returns responses in order, repeating the last one.
    pub fn with_sequence(name: impl Into<String>, mut responses: Vec<MockResponse>) -> Self {
        assert!(
            !responses.is_empty(),
            "sequence must have at least one response"
        );
        // Reverse so we can pop() from the front cheaply.
        responses.reverse();
        let fallback = responses[0].clone();
        Self {
            name: name.into(),
            responses: Mutex::new(responses),
            fallback,
            calls: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn next_response(&self) -> MockResponse {
        let mut seq = match self.responses.lock() {
            Ok(seq) => seq,
            Err(poisoned) => poisoned.into_inner(),
        };
        seq.pop().unwrap_or_else(|| self.fallback.clone())
    }
}

impl SummarizationModel for MockModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn summarize<'a>(
        &'a self,
        text: &'a str,
        params: GenerationParams,
    ) -> Pin<Box<dyn Future<Output = Result<String, ModelError>> + Send + 'a>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                text: text.to_string(),
                params,
            });
        }
        let response = self.next_response();

        Box::pin(async move {
            match response {
                MockResponse::Summary(s) => Ok(s),
                MockResponse::Lead(n) => {
                    Ok(text.split_whitespace().take(n).collect::<Vec<_>>().join(" "))
                }
                MockResponse::Unavailable(message) => Err(ModelError::Unavailable {
                    model: self.name.clone(),
                    message,
                }),
            }
        })
    }
}
