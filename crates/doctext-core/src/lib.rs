use serde::Serialize;
use thiserror::Error;

pub mod backend;
pub mod config_file;
pub mod format;

// Re-export for convenience
pub use backend::{BackendError, TextBackend};
pub use format::{DOCX_MIME, FormatTag, PDF_MIME, PPTX_MIME, classify};

/// Message returned for any declared content type other than the three supported ones.
pub const UNSUPPORTED_MESSAGE: &str = "Only PDF, DOCX, or PPTX files are supported";

/// A document received from a caller, held fully in memory for one request.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    /// Caller-declared MIME type. Trusted as-is; never sniffed.
    pub content_type: String,
    pub data: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }
}

/// Plain-text content extracted from a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub filename: String,
    pub content: String,
}

/// Coarse classification of an [`ExtractionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unsupported,
    ParseFailure,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("{}", UNSUPPORTED_MESSAGE)]
    Unsupported,
    /// The declared format matched but the bytes could not be decoded.
    #[error("{0}")]
    ParseFailure(String),
}

impl ExtractionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractionError::Unsupported => ErrorKind::Unsupported,
            ExtractionError::ParseFailure(_) => ErrorKind::ParseFailure,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<BackendError> for ExtractionError {
    fn from(e: BackendError) -> Self {
        ExtractionError::ParseFailure(e.to_string())
    }
}

/// Join extracted text units the way the given format expects, then trim.
///
/// PDF pages already carry their own line layout and are concatenated as-is.
/// DOCX paragraphs and PPTX shapes are each followed by `"\n"`. Only the final
/// string is trimmed; inner whitespace is preserved.
pub fn assemble<I, S>(tag: FormatTag, units: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let terminator = tag.unit_terminator();
    let mut text = String::new();
    for unit in units {
        text.push_str(unit.as_ref());
        text.push_str(terminator);
    }
    text.trim().to_string()
}
