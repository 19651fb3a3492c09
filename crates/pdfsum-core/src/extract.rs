//! PDF text extraction on top of a [`PdfBackend`].

use std::io::Write;
use std::path::Path;

use crate::{BackendError, ExtractedText, PageProgress, PdfBackend, SummarizerError};

/// Extract the full text of the PDF at `path`.
///
/// Pages are read once, in order, and concatenated with no separator.
/// Returns [`SummarizerError::EmptyDocument`] when no page yields a
/// non-whitespace character and [`SummarizerError::Extraction`] when the
/// backend fails; nothing partial is returned in either case.
pub fn extract_text_from_pdf(
    path: &Path,
    backend: &dyn PdfBackend,
    on_page: &mut dyn FnMut(PageProgress),
) -> Result<ExtractedText, SummarizerError> {
    tracing::debug!(path = %path.display(), "extracting text");

    let pages = backend.extract_pages(path, on_page)?;
    let page_count = pages.len();
    let text = ExtractedText::from_pages(pages).inspect_err(|_| {
        tracing::warn!(path = %path.display(), pages = page_count, "no readable text");
    })?;

    tracing::info!(
        pages = text.pages(),
        words = text.word_count(),
        "text extraction complete"
    );
    Ok(text)
}

/// Extract text from an in-memory PDF.
///
/// The bytes are written to a temporary file (removed on return) because
/// backends open documents by path.
pub fn extract_text_from_bytes(
    data: &[u8],
    backend: &dyn PdfBackend,
    on_page: &mut dyn FnMut(PageProgress),
) -> Result<ExtractedText, SummarizerError> {
    let mut file = tempfile::Builder::new()
        .prefix("pdfsum-")
        .suffix(".pdf")
        .tempfile()
        .map_err(BackendError::Io)?;
    file.write_all(data).map_err(BackendError::Io)?;
    file.flush().map_err(BackendError::Io)?;

    extract_text_from_pdf(file.path(), backend, on_page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serves fixed page texts, or fails at a given page.
    struct StaticBackend {
        pages: Vec<&'static str>,
        fail_at: Option<usize>,
        seen_bytes: Mutex<Option<Vec<u8>>>,
    }

    impl StaticBackend {
        fn new(pages: Vec<&'static str>) -> Self {
            Self {
                pages,
                fail_at: None,
                seen_bytes: Mutex::new(None),
            }
        }
    }

    impl PdfBackend for StaticBackend {
        fn extract_pages(
            &self,
            path: &Path,
            on_page: &mut dyn FnMut(PageProgress),
        ) -> Result<Vec<String>, BackendError> {
            *self.seen_bytes.lock().unwrap() = Some(std::fs::read(path)?);
            let total = self.pages.len();
            let mut out = Vec::with_capacity(total);
            for (i, page) in self.pages.iter().enumerate() {
                if self.fail_at == Some(i + 1) {
                    return Err(BackendError::PageError {
                        page: i + 1,
                        message: "unsupported encoding".into(),
                    });
                }
                out.push(page.to_string());
                on_page(PageProgress { page: i + 1, total });
            }
            Ok(out)
        }
    }

    #[test]
    fn concatenates_pages_in_order() {
        let backend = StaticBackend::new(vec!["Alpha. ", "Beta. ", "Gamma."]);
        let mut progress = Vec::new();
        let text =
            extract_text_from_bytes(b"%PDF-1.4 fake", &backend, &mut |p| progress.push(p))
                .unwrap();

        assert_eq!(text.as_str(), "Alpha. Beta. Gamma.");
        assert_eq!(text.pages(), 3);
        assert_eq!(
            progress,
            vec![
                PageProgress { page: 1, total: 3 },
                PageProgress { page: 2, total: 3 },
                PageProgress { page: 3, total: 3 },
            ]
        );
    }

    #[test]
    fn bytes_reach_backend_through_temp_file() {
        let backend = StaticBackend::new(vec!["x"]);
        extract_text_from_bytes(b"%PDF-1.7 payload", &backend, &mut |_| {}).unwrap();
        let seen = backend.seen_bytes.lock().unwrap().clone().unwrap();
        assert_eq!(seen, b"%PDF-1.7 payload");
    }

    #[test]
    fn blank_pages_are_empty_document() {
        let backend = StaticBackend::new(vec!["", "  \n ", "\t"]);
        let err = extract_text_from_bytes(b"%PDF-", &backend, &mut |_| {}).unwrap_err();
        assert!(matches!(err, SummarizerError::EmptyDocument));
        assert_eq!(err.to_string(), "The uploaded PDF has no readable text.");
    }

    #[test]
    fn page_failure_returns_no_partial_text() {
        let backend = StaticBackend {
            fail_at: Some(2),
            ..StaticBackend::new(vec!["first page text", "second", "third"])
        };
        let err = extract_text_from_bytes(b"%PDF-", &backend, &mut |_| {}).unwrap_err();
        match err {
            SummarizerError::Extraction(BackendError::PageError { page, .. }) => {
                assert_eq!(page, 2)
            }
            other => panic!("expected extraction error, got {other:?}"),
        }
    }

    #[test]
    fn extraction_error_message_wraps_cause() {
        let err = SummarizerError::from(BackendError::OpenError("no objects found".into()));
        assert_eq!(
            err.to_string(),
            "Failed to extract text from PDF: failed to open PDF: no objects found"
        );
        assert_eq!(err.kind(), "extraction");
    }
}
