//! Server error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use diagnohero_metrics::{
    ERROR_CONFIG, ERROR_IO, ERROR_UNAUTHORIZED, ERROR_VALIDATION, record_error,
};
use diagnohero_store::StoreError;
use serde_json::json;
use tracing::error;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("config: {0}")]
    Config(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("{0}")]
    BadRequest(String),
}

impl ServerError {
    /// Get the error type string for metrics.
    pub fn error_type(&self) -> &'static str {
        match self {
            ServerError::Io(_) => ERROR_IO,
            ServerError::Store(e) => e.error_type(),
            ServerError::Config(_) => ERROR_CONFIG,
            ServerError::Unauthorized => ERROR_UNAUTHORIZED,
            ServerError::BadRequest(_) => ERROR_VALIDATION,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ServerError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            ServerError::Store(StoreError::Conflict | StoreError::AlreadyExists) => {
                StatusCode::CONFLICT
            }
            ServerError::Store(StoreError::Invalid(_)) | ServerError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ServerError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServerError::Store(StoreError::Backend(_))
            | ServerError::Io(_)
            | ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        record_error(self.error_type());

        let message = if status.is_server_error() {
            error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ServerError::Store(StoreError::NotFound), StatusCode::NOT_FOUND),
            (ServerError::Store(StoreError::Conflict), StatusCode::CONFLICT),
            (
                ServerError::Store(StoreError::invalid("title is required")),
                StatusCode::BAD_REQUEST,
            ),
            (ServerError::Unauthorized, StatusCode::UNAUTHORIZED),
            (
                ServerError::Store(StoreError::backend("db down")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_error_type() {
        assert_eq!(ServerError::Unauthorized.error_type(), ERROR_UNAUTHORIZED);
        assert_eq!(
            ServerError::BadRequest("bad".into()).error_type(),
            ERROR_VALIDATION
        );
    }
}
