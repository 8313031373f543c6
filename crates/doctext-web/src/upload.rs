use axum::extract::Multipart;

use doctext_ingest::UploadedDocument;

use crate::models::ApiError;

/// Name of the form field carrying the document.
pub const FILE_FIELD: &str = "file";

/// Read the `file` field of a multipart upload fully into memory.
///
/// A missing filename or content type becomes the empty string; the latter
/// then classifies as unsupported. Extra fields are read and discarded, and
/// only the first `file` field is used.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<UploadedDocument, ApiError> {
    let mut document: Option<UploadedDocument> = None;

    while let Some(field) = multipart.next_field().await? {
        if document.is_none() && field.name() == Some(FILE_FIELD) {
            let filename = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let data = field.bytes().await?;
            document = Some(UploadedDocument::new(filename, content_type, data.to_vec()));
        } else {
            // Ignore unknown fields
            let _ = field.bytes().await?;
        }
    }

    document.ok_or(ApiError::NoFile)
}
