use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

use leafscan_core::AnalyzeError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    AuthFailed(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("analysis error: {0}")]
    Analyze(#[from] AnalyzeError),

    #[error("ledger error: {0}")]
    Ledger(#[from] leafscan_ledger::LedgerError),

    #[error("record store error: {0}")]
    Records(#[from] leafscan_records::RecordError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) | Self::Analyze(AnalyzeError::EmptyImage) => {
                StatusCode::BAD_REQUEST
            }
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::AuthFailed(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ServerError::InvalidInput("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ServerError::Analyze(AnalyzeError::EmptyImage).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::PayloadTooLarge("x".into()).status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(ServerError::AuthFailed("x".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(ServerError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ServerError::Ledger(leafscan_ledger::LedgerError::LockPoisoned).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn auth_message_is_passed_through() {
        assert_eq!(ServerError::AuthFailed("Invalid API key".into()).to_string(), "Invalid API key");
    }
}
