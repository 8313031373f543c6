use std::collections::HashMap;
use std::sync::Arc;

use doctext_ooxml::{DocxBackend, PptxBackend};

// Re-export domain types for convenience
pub use doctext_core::{
    BackendError, ErrorKind, ExtractionError, ExtractionResult, FormatTag, TextBackend,
    UploadedDocument, assemble, classify,
};

/// Routes an uploaded document to the backend bound to its declared format.
///
/// Classification only looks at the declared content type. Backend failures
/// come back as [`ExtractionError::ParseFailure`]; nothing a malformed upload
/// contains is allowed to escape as anything else.
#[derive(Clone)]
pub struct Dispatcher {
    backends: HashMap<FormatTag, Arc<dyn TextBackend>>,
}

impl Default for Dispatcher {
    /// DOCX and PPTX always; PDF when the `pdf` feature (MuPDF) is enabled.
    fn default() -> Self {
        let dispatcher = Self::empty()
            .with_backend(FormatTag::Docx, Arc::new(DocxBackend::new()))
            .with_backend(FormatTag::Pptx, Arc::new(PptxBackend::new()));
        with_pdf(dispatcher)
    }
}

#[cfg(feature = "pdf")]
fn with_pdf(dispatcher: Dispatcher) -> Dispatcher {
    dispatcher.with_backend(
        FormatTag::Pdf,
        Arc::new(doctext_pdf_mupdf::MupdfBackend::new()),
    )
}

#[cfg(not(feature = "pdf"))]
fn with_pdf(dispatcher: Dispatcher) -> Dispatcher {
    dispatcher
}

impl Dispatcher {
    /// A dispatcher with no backends bound.
    pub fn empty() -> Self {
        Self {
            backends: HashMap::new(),
        }
    }

    /// Bind (or replace) the backend for a format.
    pub fn with_backend(mut self, tag: FormatTag, backend: Arc<dyn TextBackend>) -> Self {
        self.backends.insert(tag, backend);
        self
    }

    pub fn supports(&self, tag: FormatTag) -> bool {
        tag != FormatTag::Unsupported && self.backends.contains_key(&tag)
    }

    pub fn extract(&self, doc: &UploadedDocument) -> Result<ExtractionResult, ExtractionError> {
        let tag = classify(&doc.content_type);
        if tag == FormatTag::Unsupported {
            tracing::warn!(
                filename = %doc.filename,
                content_type = %doc.content_type,
                "Rejected unsupported content type"
            );
            return Err(ExtractionError::Unsupported);
        }

        let backend = self.backends.get(&tag).ok_or_else(|| {
            ExtractionError::ParseFailure(format!(
                "{} extraction is not available in this build",
                tag
            ))
        })?;

        let units = backend.extract_units(&doc.data).map_err(|e| {
            tracing::warn!(filename = %doc.filename, format = %tag, error = %e, "Extraction failed");
            ExtractionError::from(e)
        })?;

        let unit_count = units.len();
        let content = assemble(tag, units);
        tracing::info!(
            filename = %doc.filename,
            format = %tag,
            bytes = doc.data.len(),
            units = unit_count,
            chars = content.chars().count(),
            "Extracted document text"
        );

        Ok(ExtractionResult {
            filename: doc.filename.clone(),
            content,
        })
    }
}

/// Extract text with the default backends.
pub fn extract(doc: &UploadedDocument) -> Result<ExtractionResult, ExtractionError> {
    Dispatcher::default().extract(doc)
}
