use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use axum::response::sse::{Event, KeepAlive, Sse};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use pdfsum_core::{BackendError, Document, ExtractedText, PdfBackend, SummarizerError};

use crate::models::*;
use crate::state::AppState;
use crate::upload;

type Tx = mpsc::Sender<Result<Event, Infallible>>;

enum StreamError {
    Disconnected,
    Failed(SummarizerError),
}

impl From<SummarizerError> for StreamError {
    fn from(e: SummarizerError) -> Self {
        StreamError::Failed(e)
    }
}

/// Upload a PDF and stream extraction progress as Server-Sent Events:
/// `started`, one `page` per page, then `extracted` or `error`.
pub async fn extract(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> impl IntoResponse {
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(64);

    tokio::spawn(async move {
        match handle_extract(state, multipart, tx.clone()).await {
            Ok(()) => {}
            Err(StreamError::Disconnected) => {
                tracing::debug!("client disconnected during extraction");
            }
            Err(StreamError::Failed(e)) => {
                tracing::warn!(kind = e.kind(), error = %e, "extraction failed");
                let _ = tx.send(Ok(sse_event("error", &ErrorEvent::from(&e)))).await;
            }
        }
    });

    Sse::new(ReceiverStream::new(rx)).keep_alive(KeepAlive::default())
}

async fn handle_extract(
    state: Arc<AppState>,
    multipart: Multipart,
    tx: Tx,
) -> Result<(), StreamError> {
    let document = upload::parse_multipart(multipart).await?;
    tracing::info!(filename = %document.filename, bytes = document.data.len(), "PDF uploaded");

    send(
        &tx,
        "started",
        &StartedEvent {
            filename: document.filename.clone(),
            bytes: document.data.len(),
        },
    )
    .await?;

    let text = extract_blocking(state.backend.clone(), document, tx.clone()).await?;
    send(&tx, "extracted", &ExtractedEvent::from(text)).await
}

/// Run extraction on the blocking pool (MuPDF is not async).
async fn extract_blocking(
    backend: Arc<dyn PdfBackend>,
    document: Document,
    tx: Tx,
) -> Result<ExtractedText, SummarizerError> {
    tokio::task::spawn_blocking(move || {
        let mut connected = true;
        pdfsum_core::extract_text_from_bytes(&document.data, backend.as_ref(), &mut |progress| {
            // Waits for the client to drain the channel; stops once it hangs up.
            if connected
                && tx
                    .blocking_send(Ok(sse_event("page", &PageEvent::from(progress))))
                    .is_err()
            {
                connected = false;
            }
        })
    })
    .await
    .map_err(|e| SummarizerError::Extraction(BackendError::Worker(e.to_string())))?
}

/// Send an SSE event, returning Err if the client disconnected.
async fn send<T: serde::Serialize>(tx: &Tx, event_type: &str, data: &T) -> Result<(), StreamError> {
    tx.send(Ok(sse_event(event_type, data)))
        .await
        .map_err(|_| StreamError::Disconnected)
}
