use std::path::Path;

use thiserror::Error;

use crate::PageProgress;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to read page {page}: {message}")]
    PageError { page: usize, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The thread running the backend panicked or was cancelled.
    #[error("extraction worker failed: {0}")]
    Worker(String),
}

/// Trait for PDF text extraction backends.
///
/// Implementors return the text of every page, in page order, and call
/// `on_page` after each page is read. A failure on any page fails the whole
/// document; backends never return a partial page list.
pub trait PdfBackend: Send + Sync {
    fn extract_pages(
        &self,
        path: &Path,
        on_page: &mut dyn FnMut(PageProgress),
    ) -> Result<Vec<String>, BackendError>;
}
