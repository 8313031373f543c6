use std::io::Write;
use std::path::Path;

use mupdf::{Document, TextPageFlags};

use doctext_core::{BackendError, TextBackend};

/// MuPDF-based implementation of [`TextBackend`] for PDF documents.
///
/// The mupdf dependency (AGPL-3.0) lives only in this crate; the OOXML
/// backends do not depend on it.
///
/// Each page yields one unit built from MuPDF's structured text: every line
/// of every block, in reading order, followed by `'\n'`.
#[derive(Debug, Default)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }

    /// Extract per-page text from a PDF on disk.
    pub fn extract_pages(&self, path: &Path) -> Result<Vec<String>, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))?;

        let mut pages_text = Vec::new();

        for page_result in document
            .pages()
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?
        {
            let page = page_result.map_err(|e| BackendError::ExtractionError(e.to_string()))?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| BackendError::ExtractionError(e.to_string()))?;

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
            pages_text.push(page_text);
        }

        Ok(pages_text)
    }
}

impl TextBackend for MupdfBackend {
    fn extract_units(&self, data: &[u8]) -> Result<Vec<String>, BackendError> {
        // MuPDF opens by path; stage the upload in a temp file removed on drop
        let mut temp_file = tempfile::Builder::new().suffix(".pdf").tempfile()?;
        temp_file.write_all(data)?;
        temp_file.flush()?;

        let pages = self.extract_pages(temp_file.path())?;
        tracing::debug!(pages = pages.len(), bytes = data.len(), "PDF pages extracted");
        Ok(pages)
    }
}
