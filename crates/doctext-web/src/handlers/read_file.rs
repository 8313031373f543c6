use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::multipart::{Multipart, MultipartRejection};

use doctext_ingest::{ExtractionError, ExtractionResult};

use crate::models::ApiError;
use crate::state::AppState;
use crate::upload;

/// `POST /read-file/`: return the plain text of an uploaded PDF, DOCX or PPTX.
///
/// The upload is read fully into memory, then extracted on the blocking pool
/// under the configured timeout. An extractor that panics is reported as a
/// parse failure for this request only.
#[tracing::instrument(skip(state, multipart))]
pub async fn read_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractionResult>, ApiError> {
    let document = upload::parse_multipart(multipart?).await?;

    tracing::debug!(
        filename = %document.filename,
        content_type = %document.content_type,
        bytes = document.data.len(),
        "File data received"
    );

    let dispatcher = Arc::clone(&state.dispatcher);
    let task = tokio::task::spawn_blocking(move || dispatcher.extract(&document));

    // On timeout the blocking task is detached and runs to completion unobserved
    let result = match tokio::time::timeout(state.extraction_timeout, task).await {
        Err(_) => {
            tracing::warn!(timeout = ?state.extraction_timeout, "Extraction timed out");
            return Err(ApiError::Timeout);
        }
        Ok(Err(join_error)) => {
            tracing::error!(error = %join_error, "Extraction task failed");
            return Err(ExtractionError::ParseFailure(format!(
                "extraction aborted: {}",
                join_error
            ))
            .into());
        }
        Ok(Ok(result)) => result?,
    };

    Ok(Json(result))
}
