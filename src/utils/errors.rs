use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use super::json_response;

/// Errors raised by the flat-file storage layer
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("File I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced by services and mapped onto HTTP responses
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad input from the caller (400)
    #[error("{0}")]
    Validation(String),
    /// Unknown endpoint or resource (404)
    #[error("{0}")]
    NotFound(String),
    /// Ledger or settings file could not be read or written (500)
    #[error("Storage error: {0}")]
    Storage(#[from] LedgerError),
    /// Anything else that is our fault (500)
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("❌ Request failed: {}", self);
        }

        json_response(
            status,
            json!({
                "success": false,
                "message": self.to_string(),
            }),
        )
    }
}
