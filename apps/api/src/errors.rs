use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::batch::archive::ArchiveError;
use crate::batch::exporter::ExportError;
use crate::batch::pipeline::BatchError;
use crate::extract::ExtractionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("Extraction failed for '{entry}': {source}")]
    Extraction {
        entry: String,
        #[source]
        source: ExtractionError,
    },

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<BatchError> for AppError {
    fn from(err: BatchError) -> Self {
        match err {
            BatchError::Archive(e) => AppError::Archive(e),
            BatchError::Entry { entry, source } => AppError::Extraction { entry, source },
            BatchError::Unpacker(e) => AppError::Internal(anyhow::Error::new(e)),
        }
    }
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Archive(_) => "ARCHIVE_ERROR",
            AppError::Extraction { .. } => "EXTRACTION_ERROR",
            AppError::Export(_) => "EXPORT_ERROR",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Archive(e) => {
                tracing::error!("Archive error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The uploaded archive could not be read".to_string(),
                )
            }
            AppError::Extraction { entry, source } => {
                tracing::error!(entry = %entry, "Extraction error: {source}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A resume in the archive could not be processed".to_string(),
                )
            }
            AppError::Export(e) => {
                tracing::error!("Export error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The spreadsheet could not be generated".to_string(),
                )
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
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
