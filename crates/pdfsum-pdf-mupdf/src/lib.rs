use std::path::Path;

use mupdf::{Document, TextPageFlags};

use pdfsum_core::{BackendError, PageProgress, PdfBackend};

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency
/// (which is AGPL-3.0) so that the rest of the workspace does not
/// transitively depend on it.
///
/// Each page's text is its lines in block order, every line terminated by
/// a newline. Typographic ligatures are expanded unless disabled.
#[derive(Debug, Clone)]
pub struct MupdfBackend {
    expand_ligatures: bool,
}

impl Default for MupdfBackend {
    fn default() -> Self {
        Self {
            expand_ligatures: true,
        }
    }
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep ligature code points (U+FB00..U+FB06) as MuPDF reports them.
    pub fn with_raw_ligatures(mut self) -> Self {
        self.expand_ligatures = false;
        self
    }
}

impl PdfBackend for MupdfBackend {
    fn extract_pages(
        &self,
        path: &Path,
        on_page: &mut dyn FnMut(PageProgress),
    ) -> Result<Vec<String>, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))?;

        let total = document
            .page_count()
            .map_err(|e| BackendError::OpenError(e.to_string()))?;
        let total = usize::try_from(total).unwrap_or(0);
        if total == 0 {
            return Err(BackendError::OpenError("document has no pages".into()));
        }
        tracing::debug!(pages = total, "opened PDF");

        let mut pages_text = Vec::with_capacity(total);
        for index in 0..total {
            let page_number = index + 1;
            let page_err = |e: mupdf::Error| BackendError::PageError {
                page: page_number,
                message: e.to_string(),
            };

            let page = document.load_page(index as i32).map_err(page_err)?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(page_err)?;

            let mut page_text = String::new();
            for block in text_page.blocks() {
                for line in block.lines() {
                    let line_text: String = line
                        .chars()
                        .map(|c| c.char().unwrap_or('\u{FFFD}'))
                        .collect();
                    page_text.push_str(&line_text);
                    page_text.push('\n');
                }
            }

            if self.expand_ligatures {
                page_text = expand_ligatures(&page_text);
            }
            pages_text.push(page_text);
            on_page(PageProgress {
                page: page_number,
                total,
            });
        }

        Ok(pages_text)
    }
}

/// Expand common typographic ligatures found in PDFs.
pub fn expand_ligatures(text: &str) -> String {
    text.replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .replace(['\u{FB05}', '\u{FB06}'], "st")
}
