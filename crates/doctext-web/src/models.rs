use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use doctext_ingest::{ErrorKind, ExtractionError};

/// Error body, shaped `{"detail": "..."}` for every failure.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Everything a `/read-file/` request can fail with.
#[derive(Debug)]
pub enum ApiError {
    Extraction(ExtractionError),
    /// The form had no `file` field.
    NoFile,
    /// The body was not a readable multipart form (including over-limit bodies).
    Multipart { status: StatusCode, detail: String },
    Timeout,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            // Parse failures stay 400 alongside unsupported types
            ApiError::Extraction(e) => match e.kind() {
                ErrorKind::Unsupported | ErrorKind::ParseFailure => StatusCode::BAD_REQUEST,
            },
            ApiError::NoFile => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Multipart { status, .. } => *status,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            ApiError::Extraction(e) => e.message(),
            ApiError::NoFile => "No file uploaded".to_string(),
            ApiError::Multipart { detail, .. } => detail.clone(),
            ApiError::Timeout => "Extraction timed out".to_string(),
        }
    }
}

impl From<ExtractionError> for ApiError {
    fn from(e: ExtractionError) -> Self {
        ApiError::Extraction(e)
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        ApiError::Multipart {
            status: e.status(),
            detail: e.body_text(),
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(e: MultipartRejection) -> Self {
        ApiError::Multipart {
            status: e.status(),
            detail: e.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorResponse {
                detail: self.detail(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_errors_are_bad_request() {
        let unsupported = ApiError::from(ExtractionError::Unsupported);
        assert_eq!(unsupported.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            unsupported.detail(),
            "Only PDF, DOCX, or PPTX files are supported"
        );

        let parse = ApiError::from(ExtractionError::ParseFailure("bad zip".into()));
        assert_eq!(parse.status(), StatusCode::BAD_REQUEST);
        assert_eq!(parse.detail(), "bad zip");
    }

    #[test]
    fn other_failures() {
        assert_eq!(ApiError::NoFile.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ApiError::Timeout.status(), StatusCode::REQUEST_TIMEOUT);
        let multipart = ApiError::Multipart {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            detail: "too big".into(),
        };
        assert_eq!(multipart.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(multipart.detail(), "too big");
    }
}
