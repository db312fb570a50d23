//! HTTP error mapping
//!
//! Every failure leaves the API as `{"error": message, "code": CODE}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use toxiguard_core::Error;

/// Application-level error type for HTTP handlers
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain error from the workflow, store or reporter
    #[error(transparent)]
    Core(#[from] Error),

    /// Missing or invalid admin session, or bad credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A bad request with a human-readable message
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(core) => match core {
                Error::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
                Error::DraftNotFound(id) => (
                    StatusCode::NOT_FOUND,
                    "DRAFT_NOT_FOUND",
                    format!("draft {id} not found"),
                ),
                Error::ClassificationUnavailable(msg) => {
                    tracing::warn!(error = %msg, "Classification unavailable");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "CLASSIFICATION_UNAVAILABLE",
                        "classification is unavailable, nothing was saved".to_string(),
                    )
                }
                Error::StoreWrite(msg) => {
                    tracing::error!(error = %msg, "Store write failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "STORE_WRITE_ERROR",
                        "could not save comment".to_string(),
                    )
                }
                other => {
                    tracing::error!(error = %other, "Internal error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_and_code(err: AppError) -> (StatusCode, &'static str) {
        let (status, code, _) = err.parts();
        (status, code)
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_and_code(Error::validation("empty").into()),
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        );
        assert_eq!(
            status_and_code(Error::draft_not_found("x").into()),
            (StatusCode::NOT_FOUND, "DRAFT_NOT_FOUND")
        );
        assert_eq!(
            status_and_code(Error::classification_unavailable("down").into()),
            (StatusCode::SERVICE_UNAVAILABLE, "CLASSIFICATION_UNAVAILABLE")
        );
        assert_eq!(
            status_and_code(Error::store_write("disk full").into()),
            (StatusCode::INTERNAL_SERVER_ERROR, "STORE_WRITE_ERROR")
        );
        assert_eq!(
            status_and_code(AppError::Unauthorized("no".into())),
            (StatusCode::UNAUTHORIZED, "UNAUTHORIZED")
        );
    }

    #[test]
    fn test_store_write_message_hides_details() {
        let (_, _, message) = AppError::from(Error::store_write("/var/data: disk full")).parts();
        assert_eq!(message, "could not save comment");
    }
}
