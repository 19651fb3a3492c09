use std::sync::Arc;

use pdfsum_core::{Config, ModelRegistry, PdfBackend};

/// Shared application state accessible from all handlers.
///
/// Documents are not kept here: the page holds the extracted text and
/// sends it back with each summarize request.
pub struct AppState {
    pub config: Config,
    pub backend: Arc<dyn PdfBackend>,
    pub models: ModelRegistry,
}
