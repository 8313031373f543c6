use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open document: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for format-specific text extraction backends.
///
/// Implementors decode one document format and return its text units in
/// document order: one per page for PDF, one per paragraph for DOCX, one per
/// text-bearing shape for PPTX. Joining the units is the caller's job (see
/// [`crate::assemble`]), so backends never insert separators of their own.
pub trait TextBackend: Send + Sync {
    /// Extract the text units of an in-memory document.
    fn extract_units(&self, data: &[u8]) -> Result<Vec<String>, BackendError>;
}
