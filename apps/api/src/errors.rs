use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::retry::Retryable;
use crate::llm_client::LlmError;
use crate::reader::MIN_TEXT_CHARS;

/// Raw bytes could not be turned into usable text.
/// Always a caller-correctable condition; never retried.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Empty file")]
    EmptyFile,

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Cannot extract text from PDF: {0}")]
    Pdf(String),

    #[error("PDF contains no readable pages")]
    NoPages,

    /// Heuristic only: a text layer under the minimum usually means a scanned document.
    #[error(
        "PDF contains insufficient text ({chars} characters, minimum {min}); \
        it is probably a scanned document without a text layer",
        min = MIN_TEXT_CHARS
    )]
    ScannedPdf { chars: usize },

    #[error("Cannot extract text from DOCX: {0}")]
    Docx(String),

    #[error("{origin} too short ({chars} characters, minimum {min} required)", min = MIN_TEXT_CHARS)]
    InsufficientContent { origin: &'static str, chars: usize },

    #[error("Document reader failed: {0}")]
    Worker(String),
}

/// The completion service could not be made to produce valid structured data.
#[derive(Debug, Error)]
pub enum LlmExtractionError {
    #[error("completion service call failed: {0}")]
    Upstream(#[from] LlmError),

    #[error("reply is not structured data: {0}")]
    Unstructured(String),

    #[error("invalid JSON in reply: {0}")]
    InvalidJson(String),

    #[error("data validation failed: {0}")]
    Schema(String),

    #[error("ranking response did not match expected schema: {0}")]
    InvalidRanking(String),

    #[error("failed to build prompt: {0}")]
    Prompt(#[from] serde_json::Error),

    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<LlmExtractionError>,
    },
}

impl Retryable for LlmExtractionError {
    fn is_retryable(&self) -> bool {
        match self {
            LlmExtractionError::Upstream(e) => e.is_retryable(),
            LlmExtractionError::Unstructured(_) | LlmExtractionError::InvalidJson(_) => true,
            _ => false,
        }
    }

    fn exhausted(attempts: u32, last: Self) -> Self {
        LlmExtractionError::RetriesExhausted {
            attempts,
            last: Box::new(last),
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] LlmExtractionError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Document(e) => {
                tracing::warn!("Document error: {e}");
                (StatusCode::BAD_REQUEST, "DOCUMENT_ERROR", e.to_string())
            }
            AppError::Extraction(e) => {
                tracing::error!("Extraction error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXTRACTION_ERROR",
                    format!("Extraction failed: {e}"),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_error_maps_to_bad_request() {
        let response = AppError::from(DocumentError::EmptyFile).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_extraction_error_maps_to_server_error() {
        let err = LlmExtractionError::Schema("missing field `header`".to_string());
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_schema_violation_is_not_retryable() {
        assert!(!LlmExtractionError::Schema("bad".into()).is_retryable());
        assert!(LlmExtractionError::InvalidJson("eof".into()).is_retryable());
        assert!(LlmExtractionError::Upstream(LlmError::EmptyContent).is_retryable());
    }

    #[test]
    fn test_client_status_is_not_retryable() {
        let err = LlmExtractionError::Upstream(LlmError::Api {
            status: 401,
            message: "invalid x-api-key".into(),
        });
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_scanned_pdf_message_mentions_heuristic() {
        let msg = DocumentError::ScannedPdf { chars: 12 }.to_string();
        assert!(msg.contains("scanned"));
        assert!(msg.contains("12"));
    }
}
