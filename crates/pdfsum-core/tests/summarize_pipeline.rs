//! Integration tests for summarization: truncation, model selection, error
//! surfacing, and the Hugging Face client against a local stub server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use serde_json::{Value, json};

use pdfsum_core::mock::{MockModel, MockResponse};
use pdfsum_core::{
    InferenceConfig, LengthRange, MAX_INPUT_WORDS, ModelError, ModelId, ModelRegistry,
    SummarizationModel, SummarizerError, SummaryRequest, summarize_text,
};

const ALICE: &str = "Alice went to the market. She bought apples and bread.";

fn registry_with(model: Arc<MockModel>) -> ModelRegistry {
    let model: Arc<dyn SummarizationModel> = model;
    ModelRegistry::fixed(model)
}

#[tokio::test]
async fn short_text_is_summarized_without_truncation() {
    let mock = Arc::new(MockModel::new("t5-small", MockResponse::Lead(4)));
    let registry = registry_with(mock.clone());

    let request = SummaryRequest::new(ALICE, ModelId::T5Small, LengthRange::new(30, 100).unwrap())
        .unwrap();
    let outcome = summarize_text(&registry, &request).await.unwrap();

    assert!(!outcome.summary.is_empty());
    assert!(outcome.summary.len() < ALICE.len());
    assert!(!outcome.truncated);
    assert_eq!(outcome.model, ModelId::T5Small);

    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].text, ALICE);
    assert_eq!(calls[0].params.min_length, 30);
    assert_eq!(calls[0].params.max_length, 100);
}

#[tokio::test]
async fn long_text_reaches_model_with_exactly_the_word_limit() {
    let mock = Arc::new(MockModel::new("t5-small", MockResponse::Summary("short".into())));
    let registry = registry_with(mock.clone());

    let text = "lorem ipsum ".repeat(900);
    let request = SummaryRequest::new(text, ModelId::T5Small, LengthRange::default()).unwrap();
    let outcome = summarize_text(&registry, &request).await.unwrap();

    assert!(outcome.truncated);
    assert!(outcome.truncation_warning().is_some());
    let sent = &mock.calls()[0].text;
    assert_eq!(sent.split_whitespace().count(), MAX_INPUT_WORDS);
}

#[tokio::test]
async fn bounds_at_extremes_are_accepted() {
    let mock = Arc::new(MockModel::new("m", MockResponse::Summary("fine".into())));
    let registry = registry_with(mock.clone());

    for (min, max) in [(50, 200), (50, 50), (200, 200)] {
        let lengths = LengthRange::bounded(min, max).unwrap();
        let request = SummaryRequest::new(ALICE, ModelId::BartLargeCnn, lengths).unwrap();
        let outcome = summarize_text(&registry, &request).await.unwrap();
        assert_eq!(outcome.summary, "fine");
    }
    assert_eq!(mock.call_count(), 3);
}

#[tokio::test]
async fn model_failure_surfaces_as_model_error() {
    let mock = Arc::new(MockModel::new(
        "t5-small",
        MockResponse::Unavailable("loading".into()),
    ));
    let registry = registry_with(mock);

    let request =
        SummaryRequest::new(ALICE, ModelId::T5Small, LengthRange::default()).unwrap();
    let err = summarize_text(&registry, &request).await.unwrap_err();
    assert!(matches!(err, SummarizerError::Model(ModelError::Unavailable { .. })));
    assert_eq!(err.kind(), "model");
}

#[tokio::test]
async fn model_sequence_is_not_retried() {
    let mock = Arc::new(MockModel::with_sequence(
        "t5-small",
        vec![
            MockResponse::Unavailable("down".into()),
            MockResponse::Summary("recovered".into()),
        ],
    ));
    let registry = registry_with(mock.clone());
    let request =
        SummaryRequest::new(ALICE, ModelId::T5Small, LengthRange::default()).unwrap();

    assert!(summarize_text(&registry, &request).await.is_err());
    assert_eq!(mock.call_count(), 1);

    let outcome = summarize_text(&registry, &request).await.unwrap();
    assert_eq!(outcome.summary, "recovered");
}

// ── Hugging Face client against a stub server ──────────────────────────

type Captured = Arc<Mutex<Vec<(String, Value)>>>;

async fn stub_ok(
    State(captured): State<Captured>,
    Path(model): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    captured.lock().unwrap().push((model, body));
    Json(json!([{ "summary_text": "Alice bought food." }]))
}

async fn stub_loading() -> (StatusCode, Json<Value>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "error": "Model facebook/bart-large-cnn is currently loading" })),
    )
}

async fn stub_empty() -> Json<Value> {
    Json(json!([]))
}

async fn spawn_stub(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn inference_config(base: &str, path: &str) -> InferenceConfig {
    InferenceConfig {
        endpoint: format!("{base}/{path}"),
        api_token: Some("hf_test".into()),
        timeout: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn hugging_face_request_shape() {
    let captured: Captured = Arc::default();
    let router = axum::Router::new()
        .route("/ok/{*model}", post(stub_ok))
        .with_state(captured.clone());
    let base = spawn_stub(router).await;

    let registry =
        ModelRegistry::hugging_face(inference_config(&base, "ok"), reqwest::Client::new());
    let request = SummaryRequest::new(
        ALICE,
        ModelId::BartLargeCnn,
        LengthRange::new(30, 100).unwrap(),
    )
    .unwrap();

    let outcome = summarize_text(&registry, &request).await.unwrap();
    assert_eq!(outcome.summary, "Alice bought food.");
    assert!(registry.is_loaded(ModelId::BartLargeCnn));

    let captured = captured.lock().unwrap();
    let (model, body) = &captured[0];
    assert_eq!(model, "facebook/bart-large-cnn");
    assert_eq!(body["inputs"], ALICE);
    assert_eq!(body["parameters"]["min_length"], 30);
    assert_eq!(body["parameters"]["max_length"], 100);
    assert_eq!(body["parameters"]["do_sample"], false);
}

#[tokio::test]
async fn hugging_face_loading_is_unavailable() {
    let router = axum::Router::new().route("/loading/{*model}", post(stub_loading));
    let base = spawn_stub(router).await;

    let registry =
        ModelRegistry::hugging_face(inference_config(&base, "loading"), reqwest::Client::new());
    let request =
        SummaryRequest::new(ALICE, ModelId::BartLargeCnn, LengthRange::default()).unwrap();

    match summarize_text(&registry, &request).await {
        Err(SummarizerError::Model(ModelError::Unavailable { model, message })) => {
            assert_eq!(model, "facebook/bart-large-cnn");
            assert!(message.contains("currently loading"));
        }
        other => panic!("expected unavailable model, got {other:?}"),
    }
}

#[tokio::test]
async fn hugging_face_empty_result_is_an_error() {
    let router = axum::Router::new().route("/empty/{*model}", post(stub_empty));
    let base = spawn_stub(router).await;

    let registry =
        ModelRegistry::hugging_face(inference_config(&base, "empty"), reqwest::Client::new());
    let request = SummaryRequest::new(ALICE, ModelId::T5Small, LengthRange::default()).unwrap();

    let err = summarize_text(&registry, &request).await.unwrap_err();
    assert!(matches!(err, SummarizerError::Model(ModelError::EmptyResponse)));
}
